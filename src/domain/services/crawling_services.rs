//! 크롤링 서비스 레이어 트레이트 정의
//!
//! 이 모듈은 BatchCrawler가 의존하는 페이지 소스 인터페이스를 정의합니다.
//! 실제 HTTP 구현은 infrastructure::page_fetcher에 있습니다.

use async_trait::async_trait;
use futures::future::try_join_all;
use std::num::NonZeroU32;
use tracing::debug;

use crate::domain::errors::{CrawlError, FetchResult};
use crate::domain::lost_item::{PageResult, QueryResult};
use crate::domain::pagination::{PageIndex, PaginationCalculator};
use crate::domain::query::LostItemQuery;

/// 유실물 목록 페이지 소스
#[async_trait]
pub trait LostItemPageSource: Send + Sync {
    /// 사이트의 페이지 당 유실물 수 (부산 8, 서울 10)
    fn items_per_page(&self) -> NonZeroU32;

    /// 단일 페이지 조회: 요청 1회, 재시도 없음
    async fn fetch_page(&self, page: PageIndex, query: &LostItemQuery) -> FetchResult<PageResult>;

    /// 결과 수 기준 복수 페이지 조회
    ///
    /// Pages `1..=ceil(n / items_per_page)` are fetched concurrently. The first
    /// failing page aborts the whole range with [`CrawlError::RangeFailed`].
    async fn fetch_range(
        &self,
        number_of_results: u32,
        query: &LostItemQuery,
    ) -> FetchResult<QueryResult> {
        let pages = PaginationCalculator::new(self.items_per_page()).pages_for(number_of_results);
        debug!(
            "Range query for {} results spans {} pages",
            number_of_results,
            pages.len()
        );

        let page_results = try_join_all(pages.into_iter().map(|page| async move {
            self.fetch_page(page, query)
                .await
                .map_err(CrawlError::into_range_failure)
        }))
        .await?;

        Ok(QueryResult::from_pages(page_results))
    }
}
