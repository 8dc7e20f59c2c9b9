//! Per-park site profiles
//!
//! A profile bundles everything that differs between the Seoul and Busan boards:
//! list endpoint, page size and markup selectors.

use std::num::NonZeroU32;

use crate::domain::Province;
use crate::infrastructure::config::lotteworld;
use crate::infrastructure::parsing::LostItemSelectors;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteProfile {
    pub province: Province,
    pub list_url: String,
    pub items_per_page: NonZeroU32,
    pub selectors: LostItemSelectors,
}

impl SiteProfile {
    pub fn seoul() -> Self {
        Self {
            province: Province::Seoul,
            list_url: lotteworld::SEOUL_LIST_URL.to_string(),
            items_per_page: NonZeroU32::new(lotteworld::SEOUL_ITEMS_PER_PAGE).unwrap_or(NonZeroU32::MIN),
            selectors: LostItemSelectors::seoul(),
        }
    }

    pub fn busan() -> Self {
        Self {
            province: Province::Busan,
            list_url: lotteworld::BUSAN_LIST_URL.to_string(),
            items_per_page: NonZeroU32::new(lotteworld::BUSAN_ITEMS_PER_PAGE).unwrap_or(NonZeroU32::MIN),
            selectors: LostItemSelectors::busan(),
        }
    }

    pub fn for_province(province: Province) -> Self {
        match province {
            Province::Seoul => Self::seoul(),
            Province::Busan => Self::busan(),
        }
    }

    /// Same board, different host (mirrors and local test servers)
    pub fn with_list_url(mut self, list_url: impl Into<String>) -> Self {
        self.list_url = list_url.into();
        self
    }
}
