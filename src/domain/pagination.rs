//! Pagination domain logic centralization.
//!
//! Responsibility:
//! - 1-based page index (0 이하의 페이지 번호는 만들 수 없음)
//! - 결과 개수 → 마지막 페이지 번호 계산
//! - 배치 라운드에서 사용할 연속 페이지 범위 생성

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

/// A page of the remote board's pagination, always >= 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageIndex(NonZeroU32);

impl PageIndex {
    pub const FIRST: Self = Self(NonZeroU32::MIN);

    /// `None` for 0
    pub const fn new(page: u32) -> Option<Self> {
        match NonZeroU32::new(page) {
            Some(page) => Some(Self(page)),
            None => None,
        }
    }

    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for PageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<NonZeroU32> for PageIndex {
    fn from(page: NonZeroU32) -> Self {
        Self(page)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationCalculator {
    items_per_page: NonZeroU32,
}

impl PaginationCalculator {
    pub const fn new(items_per_page: NonZeroU32) -> Self {
        Self { items_per_page }
    }

    pub const fn items_per_page(&self) -> u32 {
        self.items_per_page.get()
    }

    /// `ceil(number_of_results / items_per_page)`; 0 results need no page at all
    pub const fn last_page_for(&self, number_of_results: u32) -> u32 {
        number_of_results.div_ceil(self.items_per_page.get())
    }

    /// Pages `1..=last_page_for(number_of_results)` in ascending order
    pub fn pages_for(&self, number_of_results: u32) -> Vec<PageIndex> {
        (1..=self.last_page_for(number_of_results))
            .filter_map(PageIndex::new)
            .collect()
    }
}

/// The `size` consecutive pages following `cursor` (cursor 0 = nothing tried yet)
pub fn batch_after(cursor: u32, size: NonZeroU32) -> Vec<PageIndex> {
    (1..=size.get())
        .filter_map(|offset| cursor.checked_add(offset).and_then(PageIndex::new))
        .collect()
}
