//! Category catalogue and distinct-value helpers
//!
//! 크롤링 결과에서 분류/발견 장소 목록을 뽑아 검색 필터 UI 등에 사용합니다.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::lost_item::LostItem;

/// Category option offered by the board's search form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Code sent as `acqrCategCd`
    pub id: String,
    /// Display name
    pub name: String,
}

/// Distinct `category` values in first-seen order
pub fn distinct_categories(items: &[LostItem]) -> Vec<String> {
    distinct_by(items, |item| item.category.as_str())
}

/// Distinct `where_found` values in first-seen order
pub fn distinct_found_spots(items: &[LostItem]) -> Vec<String> {
    distinct_by(items, |item| item.where_found.as_str())
}

fn distinct_by<'a, F>(items: &'a [LostItem], field: F) -> Vec<String>
where
    F: Fn(&'a LostItem) -> &'a str,
{
    let mut seen = HashSet::new();
    items
        .iter()
        .map(field)
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect()
}
