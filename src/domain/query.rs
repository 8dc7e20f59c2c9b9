//! Search filter accepted by both lost-property boards

use serde::{Deserialize, Serialize};

use crate::domain::pagination::PageIndex;

/// Query parameter names shared by the Seoul and Busan boards
pub mod params {
    pub const PAGE_INDEX: &str = "pageIndex";
    pub const CATEGORY: &str = "acqrCategCd";
    pub const KEYWORD: &str = "q";
    pub const START_DATE: &str = "startDt";
    pub const END_DATE: &str = "endDt";
}

/// Optional filter for page fetches; an empty filter lists everything
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LostItemQuery {
    /// 검색어
    pub keyword: Option<String>,
    /// 물품 분류 코드 (예: A2001, A2002)
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl LostItemQuery {
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_date_range(mut self, start: Option<String>, end: Option<String>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// Every parameter is always sent; absent values go out as empty strings.
    pub fn to_query_pairs(&self, page: PageIndex) -> Vec<(&'static str, String)> {
        vec![
            (params::PAGE_INDEX, page.to_string()),
            (params::CATEGORY, self.category.clone().unwrap_or_default()),
            (params::KEYWORD, self.keyword.clone().unwrap_or_default()),
            (params::START_DATE, self.start_date.clone().unwrap_or_default()),
            (params::END_DATE, self.end_date.clone().unwrap_or_default()),
        ]
    }
}
