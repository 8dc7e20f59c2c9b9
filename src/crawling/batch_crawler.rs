//! Batch crawler with rejected-page retry
//!
//! 라운드 단위로 페이지를 동시에 요청합니다.
//! - 직전 라운드에서 실패한 페이지가 있으면 그 페이지들만 다시 요청 (커서 정지)
//! - 실패가 없으면 커서 다음 `batch_size`개 페이지를 요청
//! - 라운드의 성공 레코드 수가 0이면 종료 (게시판 끝으로 간주)
//!
//! An all-failed round also yields zero records, so an outage looks exactly like
//! the end of the board unless `max_outage_retries` is raised.

use futures::future::join_all;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::pagination::batch_after;
use crate::domain::{
    CrawlError, CrawlResult, FetchResult, LostItem, LostItemPageSource, LostItemQuery, PageIndex,
};
use crate::infrastructure::config::{CrawlingConfig, defaults};

/// Round width and outage handling for a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlPolicy {
    batch_size: NonZeroU32,
    max_outage_retries: u32,
}

impl CrawlPolicy {
    /// Zero-width rounds would never make progress
    pub fn new(batch_size: u32) -> FetchResult<Self> {
        let batch_size = NonZeroU32::new(batch_size).ok_or_else(|| {
            CrawlError::ConfigurationError("batch size must be at least 1".to_string())
        })?;
        Ok(Self {
            batch_size,
            max_outage_retries: defaults::MAX_OUTAGE_RETRIES,
        })
    }

    /// Retry an all-failed round up to `retries` consecutive times before stopping
    pub fn with_max_outage_retries(mut self, retries: u32) -> Self {
        self.max_outage_retries = retries;
        self
    }

    /// Policy for ad-hoc crawls
    pub fn from_config(config: &CrawlingConfig) -> FetchResult<Self> {
        Ok(Self::new(config.batch_size)?.with_max_outage_retries(config.max_outage_retries))
    }

    /// Ad-hoc crawl policy: an explicit batch size wins over `crawling.batch_size`
    pub fn for_crawl(config: &CrawlingConfig, batch_size: Option<u32>) -> FetchResult<Self> {
        match batch_size {
            Some(size) => Ok(Self::new(size)?.with_max_outage_retries(config.max_outage_retries)),
            None => Self::from_config(config),
        }
    }

    /// Policy for the scheduled refresh (wider rounds)
    pub fn refresh_from_config(config: &CrawlingConfig) -> FetchResult<Self> {
        Ok(Self::new(config.refresh_batch_size)?.with_max_outage_retries(config.max_outage_retries))
    }

    pub fn batch_size(&self) -> NonZeroU32 {
        self.batch_size
    }

    pub fn max_outage_retries(&self) -> u32 {
        self.max_outage_retries
    }
}

impl Default for CrawlPolicy {
    fn default() -> Self {
        Self {
            batch_size: NonZeroU32::new(defaults::BATCH_SIZE).unwrap_or(NonZeroU32::MIN),
            max_outage_retries: defaults::MAX_OUTAGE_RETRIES,
        }
    }
}

/// What one round produced, records in the round's page order
#[derive(Debug, Default)]
struct RoundOutcome {
    records: Vec<LostItem>,
    succeeded_pages: usize,
    failed_pages: Vec<PageIndex>,
}

/// Crawls every page of one board, draining failures before moving on
pub struct BatchCrawler<S: LostItemPageSource + 'static> {
    source: Arc<S>,
    policy: CrawlPolicy,
}

impl<S: LostItemPageSource + 'static> BatchCrawler<S> {
    pub fn new(source: Arc<S>, policy: CrawlPolicy) -> Self {
        Self { source, policy }
    }

    pub fn policy(&self) -> CrawlPolicy {
        self.policy
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Crawl until a round yields no records
    pub async fn crawl_all(&self) -> CrawlResult {
        self.crawl_all_with_cancellation(&CancellationToken::new()).await
    }

    /// Same as [`crawl_all`](Self::crawl_all), but stops between rounds once `cancel` fires
    pub async fn crawl_all_with_cancellation(&self, cancel: &CancellationToken) -> CrawlResult {
        let session_id = Uuid::new_v4();
        let started = Instant::now();
        let batch_size = self.policy.batch_size;

        let mut cursor: u32 = 0;
        let mut rejected: Vec<PageIndex> = Vec::new();
        let mut accumulated: Vec<LostItem> = Vec::new();
        let mut consecutive_outages: u32 = 0;
        let mut round: u32 = 0;

        info!(
            "🚀 [{}] Starting batch crawl (batch size {}, outage retries {})",
            session_id, batch_size, self.policy.max_outage_retries
        );

        loop {
            if cancel.is_cancelled() {
                if !rejected.is_empty() {
                    warn!(
                        "[{}] Crawl cancelled; abandoning rejected pages {:?}",
                        session_id,
                        page_numbers(&rejected)
                    );
                }
                info!("🛑 [{}] Crawl cancelled after {} rounds", session_id, round);
                break;
            }

            let retrying = !rejected.is_empty();
            let round_pages = if retrying {
                std::mem::take(&mut rejected)
            } else {
                batch_after(cursor, batch_size)
            };
            if round_pages.is_empty() {
                warn!("[{}] Page index space exhausted at cursor {}", session_id, cursor);
                break;
            }

            round += 1;
            debug!(
                "[{}] Round {} ({}): pages {:?}",
                session_id,
                round,
                if retrying { "retry" } else { "fresh" },
                page_numbers(&round_pages)
            );

            let outcome = self.run_round(&round_pages).await;
            let round_records = outcome.records.len();
            accumulated.extend(outcome.records);
            rejected = outcome.failed_pages;

            info!(
                "[{}] Round {} done: {} records from {}/{} pages, {} rejected",
                session_id,
                round,
                round_records,
                outcome.succeeded_pages,
                round_pages.len(),
                rejected.len()
            );

            if rejected.is_empty() {
                cursor = cursor.saturating_add(batch_size.get());
            }

            if outcome.succeeded_pages > 0 {
                consecutive_outages = 0;
            }

            if round_records == 0 {
                if outcome.succeeded_pages == 0 && consecutive_outages < self.policy.max_outage_retries {
                    consecutive_outages += 1;
                    warn!(
                        "⚠️ [{}] Every page in round {} failed; retrying ({}/{})",
                        session_id, round, consecutive_outages, self.policy.max_outage_retries
                    );
                    continue;
                }
                if !rejected.is_empty() {
                    warn!(
                        "[{}] Stopping with unrecovered pages {:?}",
                        session_id,
                        page_numbers(&rejected)
                    );
                }
                break;
            }
        }

        let result = CrawlResult::new(accumulated);
        info!(
            "✅ [{}] Crawl finished: {} records in {} rounds ({:?})",
            session_id,
            result.count,
            round,
            started.elapsed()
        );
        result
    }

    /// Fetch every page of the round concurrently; each slot stays tagged with its page.
    async fn run_round(&self, pages: &[PageIndex]) -> RoundOutcome {
        let handles = pages.iter().map(|&page| {
            let source = Arc::clone(&self.source);
            tokio::spawn(async move {
                let query = LostItemQuery::default();
                source.fetch_page(page, &query).await
            })
        });
        let results = join_all(handles).await;

        let mut outcome = RoundOutcome::default();
        for (&page, joined) in pages.iter().zip(results) {
            match joined {
                Ok(Ok(page_result)) => {
                    outcome.succeeded_pages += 1;
                    outcome.records.extend(page_result.records);
                }
                Ok(Err(e)) => {
                    warn!("Page {} rejected: {}", page, e);
                    outcome.failed_pages.push(page);
                }
                Err(join_error) => {
                    warn!("Page {} task aborted: {}", page, join_error);
                    outcome.failed_pages.push(page);
                }
            }
        }
        outcome
    }
}

fn page_numbers(pages: &[PageIndex]) -> Vec<u32> {
    pages.iter().map(|page| page.get()).collect()
}
