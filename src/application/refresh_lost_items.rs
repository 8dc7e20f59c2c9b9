//! Refresh use case: crawl one park and hand the rows to a sink

use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::crawling::{BatchCrawler, CrawlPolicy};
use crate::domain::{LostItemPageSource, LostItemSink, Province};

/// Outcome of one refresh run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    pub province: Province,
    /// Records the crawl returned
    pub crawled: usize,
    /// Rows the sink reported as written (0 on a dry run)
    pub stored: usize,
    pub elapsed_ms: u64,
}

impl RefreshReport {
    /// 사용자에게 보여줄 완료 메시지
    pub fn message(&self) -> String {
        format!("{} 지역의 신규 유실물 데이터가 추가되었습니다!", self.province)
    }
}

pub struct RefreshLostItemsUseCase<S: LostItemPageSource + 'static> {
    province: Province,
    crawler: BatchCrawler<S>,
    /// `None` for dry runs
    sink: Option<Arc<dyn LostItemSink>>,
}

impl<S: LostItemPageSource + 'static> RefreshLostItemsUseCase<S> {
    pub fn new(province: Province, source: Arc<S>, policy: CrawlPolicy, sink: Arc<dyn LostItemSink>) -> Self {
        Self {
            province,
            crawler: BatchCrawler::new(source, policy),
            sink: Some(sink),
        }
    }

    /// Crawl only; nothing is stored and the report says `stored: 0`
    pub fn dry_run(province: Province, source: Arc<S>, policy: CrawlPolicy) -> Self {
        Self {
            province,
            crawler: BatchCrawler::new(source, policy),
            sink: None,
        }
    }

    pub async fn execute(&self) -> Result<RefreshReport> {
        self.execute_with_cancellation(&CancellationToken::new()).await
    }

    /// Crawl, tag every row with the park, store the whole batch at once
    pub async fn execute_with_cancellation(&self, cancel: &CancellationToken) -> Result<RefreshReport> {
        let started = Instant::now();
        info!("🔄 Refreshing {} lost items", self.province);

        let crawled = self.crawler.crawl_all_with_cancellation(cancel).await;
        let stored = match &self.sink {
            Some(sink) => sink
                .insert_lost_items(self.province, &crawled.records)
                .await
                .with_context(|| format!("Failed to store {} lost items", self.province))?,
            None => {
                info!("Dry run: skipping storage of {} {} records", crawled.count, self.province);
                0
            }
        };

        let report = RefreshReport {
            province: self.province,
            crawled: crawled.count,
            stored,
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        };
        info!("{} ({} crawled, {} stored)", report.message(), report.crawled, report.stored);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FetchResult, LostItem, LostItemQuery, PageIndex, PageResult};
    use crate::infrastructure::MemoryLostItemSink;
    use async_trait::async_trait;
    use std::num::NonZeroU32;

    /// Two full pages of three items, then nothing
    struct TwoPageSource;

    #[async_trait]
    impl LostItemPageSource for TwoPageSource {
        fn items_per_page(&self) -> NonZeroU32 {
            NonZeroU32::new(3).unwrap()
        }

        async fn fetch_page(&self, page: PageIndex, _query: &LostItemQuery) -> FetchResult<PageResult> {
            if page.get() > 2 {
                return Ok(PageResult::default());
            }
            Ok(PageResult::new(
                (0..3)
                    .map(|i| {
                        LostItem::from_fragments(
                            Some(format!("p{page}-{i}")),
                            Some("가방".into()),
                            Some("보관중".into()),
                            Some("2023.12.24".into()),
                            Some("후렌치 레볼루션".into()),
                        )
                    })
                    .collect(),
            ))
        }
    }

    #[tokio::test]
    async fn refresh_tags_rows_with_province() {
        let sink = Arc::new(MemoryLostItemSink::new());
        let use_case = RefreshLostItemsUseCase::new(
            Province::Busan,
            Arc::new(TwoPageSource),
            CrawlPolicy::new(20).unwrap(),
            sink.clone(),
        );

        let report = use_case.execute().await.unwrap();
        assert_eq!(report.crawled, 6);
        assert_eq!(report.stored, 6);
        assert_eq!(report.message(), "부산 지역의 신규 유실물 데이터가 추가되었습니다!");

        let rows = sink.rows().await;
        assert!(rows.iter().all(|row| row.province == "부산"));
        assert_eq!(rows[0].when_found, chrono::NaiveDate::from_ymd_opt(2023, 12, 24));
    }

    #[tokio::test]
    async fn dry_run_crawls_but_stores_nothing() {
        let use_case = RefreshLostItemsUseCase::dry_run(
            Province::Seoul,
            Arc::new(TwoPageSource),
            CrawlPolicy::new(5).unwrap(),
        );

        let report = use_case.execute().await.unwrap();
        assert_eq!(report.crawled, 6);
        assert_eq!(report.stored, 0);
    }

    #[tokio::test]
    async fn repeated_refresh_stores_duplicates() {
        let sink = Arc::new(MemoryLostItemSink::new());
        let use_case = RefreshLostItemsUseCase::new(
            Province::Seoul,
            Arc::new(TwoPageSource),
            CrawlPolicy::new(5).unwrap(),
            sink.clone(),
        );

        use_case.execute().await.unwrap();
        use_case.execute().await.unwrap();
        assert_eq!(sink.len().await, 12);
    }
}
