//! Lost item value objects shared by every park's crawler
//!
//! 두 사이트(서울/부산)의 목록 마크업은 다르지만, 파싱 결과는 모두 이 형태로 정규화됩니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder stored in a field whose markup anchor is missing or empty
pub const UNKNOWN_FIELD: &str = "알 수 없음";

/// Date format used by both boards for the "found at" column
pub const FOUND_DATE_FORMAT: &str = "%Y.%m.%d";

/// One normalized lost-property listing
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LostItem {
    /// 유실물 이름 (없으면 빈 문자열)
    pub name: String,
    /// Category text as displayed on the board, not the category code
    pub category: String,
    /// "보관중" | "방문수령" | "택배발송" and whatever else the boards add later
    pub state: String,
    /// `YYYY.MM.DD`
    pub when_found: String,
    /// Attraction or spot where the item was found
    pub where_found: String,
}

impl LostItem {
    /// Build a record from independently extracted fragments.
    ///
    /// Each fragment falls back on its own: a missing `category` never touches `state`.
    pub fn from_fragments(
        name: Option<String>,
        category: Option<String>,
        state: Option<String>,
        when_found: Option<String>,
        where_found: Option<String>,
    ) -> Self {
        Self {
            name: name.unwrap_or_default(),
            category: or_unknown(category),
            state: or_unknown(state),
            when_found: or_unknown(when_found),
            where_found: or_unknown(where_found),
        }
    }

    /// Parse `when_found` into a calendar date, `None` for the sentinel or odd formats
    pub fn found_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.when_found.trim(), FOUND_DATE_FORMAT).ok()
    }
}

fn or_unknown(fragment: Option<String>) -> String {
    fragment
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| UNKNOWN_FIELD.to_string())
}

/// Records parsed from a single page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    pub records: Vec<LostItem>,
    pub count: usize,
}

impl PageResult {
    pub fn new(records: Vec<LostItem>) -> Self {
        let count = records.len();
        Self { records, count }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Flattened result of a bounded query or a full crawl
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    pub records: Vec<LostItem>,
    pub count: usize,
}

/// A crawl produces the same shape; only the ordering guarantee differs.
pub type CrawlResult = QueryResult;

impl QueryResult {
    pub fn new(records: Vec<LostItem>) -> Self {
        let count = records.len();
        Self { records, count }
    }

    /// Concatenate page results in the order given
    pub fn from_pages<I>(pages: I) -> Self
    where
        I: IntoIterator<Item = PageResult>,
    {
        let records = pages
            .into_iter()
            .flat_map(|page| page.records)
            .collect::<Vec<_>>();
        Self::new(records)
    }
}

/// Park a listing came from; also the `province` column of stored rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Province {
    Seoul,
    Busan,
}

impl Province {
    /// Korean label used by the boards and stored with each row
    pub const fn label(self) -> &'static str {
        match self {
            Self::Seoul => "서울",
            Self::Busan => "부산",
        }
    }
}

impl fmt::Display for Province {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Row shape handed to persistence sinks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredLostItem {
    pub name: String,
    pub category: String,
    pub state: String,
    pub when_found: Option<NaiveDate>,
    pub where_found: String,
    pub province: String,
}

impl StoredLostItem {
    pub fn from_item(item: &LostItem, province: Province) -> Self {
        Self {
            name: item.name.clone(),
            category: item.category.clone(),
            state: item.state.clone(),
            when_found: item.found_date(),
            where_found: item.where_found.clone(),
            province: province.label().to_string(),
        }
    }
}
