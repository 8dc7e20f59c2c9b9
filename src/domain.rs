//! Domain module - Core lost-item entities and crawling contracts
//!
//! This module contains the value objects, pagination rules and the
//! interfaces the crawler and the storage sinks are written against.

pub mod catalog;
pub mod errors;
pub mod lost_item;
pub mod pagination;
pub mod query;
pub mod repositories;
pub mod services;

// Re-export commonly used items
pub use catalog::{Category, distinct_categories, distinct_found_spots};
pub use errors::{CrawlError, FetchResult};
pub use lost_item::{CrawlResult, LostItem, PageResult, Province, QueryResult, StoredLostItem, UNKNOWN_FIELD};
pub use pagination::{PageIndex, PaginationCalculator};
pub use query::LostItemQuery;
pub use repositories::LostItemSink;
pub use services::LostItemPageSource;
