//! Crawl error taxonomy
//!
//! Page-level failures are recoverable inside the batch crawler and fatal inside a bounded range query.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::pagination::PageIndex;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrawlError {
    /// Network, HTTP status or markup failure for one page
    #[error("Fetch failed for page {page}: {reason}")]
    FetchFailed { page: PageIndex, reason: String },

    /// A bounded range query lost one of its pages; nothing from the range is returned
    #[error("Range query aborted at page {page}: {reason}")]
    RangeFailed { page: PageIndex, reason: String },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl CrawlError {
    pub fn fetch_failed(page: PageIndex, reason: impl ToString) -> Self {
        Self::FetchFailed {
            page,
            reason: reason.to_string(),
        }
    }

    /// Page index the error is tagged with, if any
    pub const fn page(&self) -> Option<PageIndex> {
        match self {
            Self::FetchFailed { page, .. } | Self::RangeFailed { page, .. } => Some(*page),
            Self::ConfigurationError(_) => None,
        }
    }

    /// Promote a page failure into a whole-range failure
    pub fn into_range_failure(self) -> Self {
        match self {
            Self::FetchFailed { page, reason } => Self::RangeFailed { page, reason },
            other => other,
        }
    }

    /// Retrying the same page may succeed
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::FetchFailed { .. })
    }
}

pub type FetchResult<T> = Result<T, CrawlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_failure_promotes_to_range_failure() {
        let page = PageIndex::new(4).unwrap();
        let err = CrawlError::fetch_failed(page, "HTTP 503").into_range_failure();

        assert!(matches!(err, CrawlError::RangeFailed { .. }));
        assert_eq!(err.page(), Some(page));
        assert!(!err.is_recoverable());
        assert_eq!(err.to_string(), "Range query aborted at page 4: HTTP 503");
    }
}
