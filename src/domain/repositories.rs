//! Repository interfaces for crawled lost items
//!
//! Persistence itself lives outside this crate; sinks only have to accept batches.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::lost_item::{LostItem, Province};

/// Destination for normalized records.
///
/// Deduplication and transactionality are the sink's concern: the crawler may hand
/// over the same listing more than once across runs.
#[async_trait]
pub trait LostItemSink: Send + Sync {
    /// Store a batch of records from one park, returning how many rows were written
    async fn insert_lost_items(&self, province: Province, items: &[LostItem]) -> Result<usize>;
}
