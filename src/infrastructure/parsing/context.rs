//! Parsing context for list-page extraction

use std::num::NonZeroU32;

use crate::domain::{PageIndex, Province};

/// Context information for parsing one list page
#[derive(Debug, Clone, Copy)]
pub struct ParseContext {
    /// Page being parsed
    pub page: PageIndex,

    /// Park the page belongs to
    pub province: Province,

    /// Items the board renders per full page
    pub expected_items_per_page: NonZeroU32,
}

impl ParseContext {
    pub fn new(page: PageIndex, province: Province, expected_items_per_page: NonZeroU32) -> Self {
        Self {
            page,
            province,
            expected_items_per_page,
        }
    }
}
