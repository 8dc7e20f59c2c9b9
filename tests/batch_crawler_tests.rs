//! Batch crawler and range query behaviour against scripted page sources
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use lost_items_lib::application::RefreshLostItemsUseCase;
use lost_items_lib::crawling::{BatchCrawler, CrawlPolicy};
use lost_items_lib::domain::{
    CrawlError, FetchResult, LostItem, LostItemPageSource, LostItemQuery, PageIndex, PageResult,
    Province,
};
use lost_items_lib::infrastructure::MemoryLostItemSink;

/// `total` items over pages of `per_page`; pages listed in `failures` fail that many times first
struct ScriptedSource {
    total: u32,
    per_page: NonZeroU32,
    failures: Mutex<HashMap<u32, u32>>,
    requests: Mutex<Vec<u32>>,
    cancel_on_first_fetch: Option<CancellationToken>,
    /// Each fetch holds its slot this long
    latency: Option<Duration>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl ScriptedSource {
    fn new(total: u32, per_page: u32) -> Self {
        Self {
            total,
            per_page: NonZeroU32::new(per_page).unwrap(),
            failures: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
            cancel_on_first_fetch: None,
            latency: None,
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    fn failing(self, pages: &[u32], times: u32) -> Self {
        self.failures
            .lock()
            .unwrap()
            .extend(pages.iter().map(|&page| (page, times)));
        self
    }

    fn cancelling(mut self, token: CancellationToken) -> Self {
        self.cancel_on_first_fetch = Some(token);
        self
    }

    fn slow(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn requests(&self) -> Vec<u32> {
        self.requests.lock().unwrap().clone()
    }

    /// Most fetches that were ever outstanding at once
    fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LostItemPageSource for ScriptedSource {
    fn items_per_page(&self) -> NonZeroU32 {
        self.per_page
    }

    async fn fetch_page(&self, page: PageIndex, _query: &LostItemQuery) -> FetchResult<PageResult> {
        self.requests.lock().unwrap().push(page.get());
        if let Some(token) = &self.cancel_on_first_fetch {
            token.cancel();
        }

        if let Some(latency) = self.latency {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(latency).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }

        {
            let mut failures = self.failures.lock().unwrap();
            if let Some(remaining) = failures.get_mut(&page.get()) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(CrawlError::fetch_failed(page, "503 Service Unavailable"));
                }
            }
        }

        let start = (page.get() - 1) * self.per_page.get();
        let end = (start + self.per_page.get()).min(self.total);
        let records = (start..end)
            .map(|i| LostItem::from_fragments(Some(format!("item-{i}")), None, None, None, None))
            .collect();
        Ok(PageResult::new(records))
    }
}

fn names(records: &[LostItem]) -> Vec<String> {
    records.iter().map(|r| r.name.clone()).collect()
}

fn position_of_nth(requests: &[u32], page: u32, nth: usize) -> usize {
    requests
        .iter()
        .enumerate()
        .filter(|(_, p)| **p == page)
        .nth(nth)
        .map(|(i, _)| i)
        .unwrap()
}

#[tokio::test]
async fn rejected_pages_are_drained_before_advancing() {
    let source = Arc::new(ScriptedSource::new(30, 2).failing(&[3, 7], 1));
    let crawler = BatchCrawler::new(source.clone(), CrawlPolicy::new(5).unwrap());

    let result = crawler.crawl_all().await;

    assert_eq!(result.count, 30);
    let unique: HashSet<_> = names(&result.records).into_iter().collect();
    assert_eq!(unique.len(), 30);

    let requests = source.requests();
    let retry_of_3 = position_of_nth(&requests, 3, 1);
    assert!(requests[retry_of_3 + 1..].iter().all(|&p| p >= 6));
    assert!(requests[..retry_of_3].iter().all(|&p| p <= 5));

    let retry_of_7 = position_of_nth(&requests, 7, 1);
    assert!(requests[retry_of_7 + 1..].iter().all(|&p| p >= 11));
    assert!(requests[..retry_of_7].iter().all(|&p| p <= 10));

    // four fresh rounds plus two retries; 16..=20 is empty and ends the crawl
    assert_eq!(requests.len(), 20 + 2);
}

#[tokio::test]
async fn crawl_stops_at_first_empty_round() {
    let source = Arc::new(ScriptedSource::new(12, 8));
    let crawler = BatchCrawler::new(source.clone(), CrawlPolicy::new(5).unwrap());

    let result = crawler.crawl_all().await;

    assert_eq!(result.count, 12);
    assert_eq!(result.records.len(), 12);
    let mut requests = source.requests();
    requests.sort_unstable();
    assert_eq!(requests, (1..=10).collect::<Vec<_>>());
}

#[tokio::test]
async fn outage_is_indistinguishable_from_end_of_board_by_default() {
    let source = Arc::new(ScriptedSource::new(40, 4).failing(&[1, 2, 3, 4, 5], 1));
    let crawler = BatchCrawler::new(source.clone(), CrawlPolicy::new(5).unwrap());

    let result = crawler.crawl_all().await;

    assert_eq!(result.count, 0);
    assert_eq!(source.requests().len(), 5);
}

#[tokio::test]
async fn outage_retries_recover_an_all_failed_round() {
    let source = Arc::new(ScriptedSource::new(10, 2).failing(&[1, 2, 3, 4, 5], 2));
    let policy = CrawlPolicy::new(5).unwrap().with_max_outage_retries(2);
    let crawler = BatchCrawler::new(source.clone(), policy);

    let result = crawler.crawl_all().await;

    assert_eq!(result.count, 10);
    // three attempts at 1..=5, then the empty 6..=10 round
    assert_eq!(source.requests().len(), 15 + 5);
}

#[tokio::test]
async fn outage_retries_are_bounded() {
    let source = Arc::new(ScriptedSource::new(10, 2).failing(&[1, 2, 3, 4, 5], 2));
    let policy = CrawlPolicy::new(5).unwrap().with_max_outage_retries(1);
    let crawler = BatchCrawler::new(source.clone(), policy);

    let result = crawler.crawl_all().await;

    assert_eq!(result.count, 0);
    assert_eq!(source.requests().len(), 10);
}

#[tokio::test]
async fn unrecovered_page_in_a_zero_record_round_ends_the_crawl() {
    // page 1 never recovers, page 2 holds the only two items
    let source = Arc::new(ScriptedSource::new(4, 2).failing(&[1], u32::MAX));
    let crawler = BatchCrawler::new(source.clone(), CrawlPolicy::new(2).unwrap());

    let result = crawler.crawl_all().await;

    assert_eq!(names(&result.records), vec!["item-2", "item-3"]);
    assert_eq!(source.requests().iter().filter(|&&p| p == 1).count(), 2);
}

#[tokio::test]
async fn cancellation_stops_between_rounds() {
    let token = CancellationToken::new();
    let source = Arc::new(ScriptedSource::new(100, 10).cancelling(token.clone()));
    let crawler = BatchCrawler::new(source.clone(), CrawlPolicy::new(3).unwrap());

    let result = crawler.crawl_all_with_cancellation(&token).await;

    assert_eq!(result.count, 30);
    assert_eq!(source.requests().len(), 3);
}

#[tokio::test]
async fn range_query_fetches_just_enough_pages_in_order() {
    let source = ScriptedSource::new(100, 8);

    let result = source.fetch_range(3 * 8, &LostItemQuery::default()).await.unwrap();

    assert_eq!(source.requests().len(), 3);
    assert_eq!(result.count, 24);
    let expected: Vec<String> = (0..24).map(|i| format!("item-{i}")).collect();
    assert_eq!(names(&result.records), expected);
}

#[tokio::test]
async fn partial_last_page_still_needs_a_whole_request() {
    let source = ScriptedSource::new(100, 8);

    let result = source.fetch_range(17, &LostItemQuery::default()).await.unwrap();

    assert_eq!(source.requests().len(), 3);
    assert_eq!(result.count, 24);
}

#[tokio::test]
async fn range_query_fetches_every_page_at_once() {
    let source = ScriptedSource::new(100, 5).slow(Duration::from_millis(30));

    let result = source.fetch_range(3 * 5, &LostItemQuery::default()).await.unwrap();

    assert_eq!(result.count, 15);
    assert_eq!(source.peak_in_flight(), 3);
}

#[tokio::test]
async fn crawl_round_keeps_batch_size_pages_in_flight() {
    let source = Arc::new(ScriptedSource::new(8, 2).slow(Duration::from_millis(30)));
    let crawler = BatchCrawler::new(source.clone(), CrawlPolicy::new(4).unwrap());

    let result = crawler.crawl_all().await;

    assert_eq!(result.count, 8);
    // 1..=4 then the empty 5..=8 round; never more than one round at a time
    assert_eq!(source.requests().len(), 8);
    assert_eq!(source.peak_in_flight(), 4);
}

#[tokio::test]
async fn range_query_for_zero_results_sends_nothing() {
    let source = ScriptedSource::new(100, 10);

    let result = source.fetch_range(0, &LostItemQuery::default()).await.unwrap();

    assert_eq!(result.count, 0);
    assert!(source.requests().is_empty());
}

#[tokio::test]
async fn range_query_fails_as_a_whole() {
    let source = ScriptedSource::new(100, 10).failing(&[2], 1);

    let err = source
        .fetch_range(30, &LostItemQuery::default())
        .await
        .unwrap_err();

    assert!(matches!(err, CrawlError::RangeFailed { .. }));
    assert_eq!(err.page(), PageIndex::new(2));
}

#[tokio::test]
async fn refresh_over_an_unstable_board_keeps_overlapping_rows() {
    // page 3 fails once during the first crawl only
    let source = Arc::new(ScriptedSource::new(10, 2).failing(&[3], 1));
    let sink = Arc::new(MemoryLostItemSink::new());
    let use_case = RefreshLostItemsUseCase::new(
        Province::Seoul,
        source.clone(),
        CrawlPolicy::new(5).unwrap(),
        sink.clone(),
    );

    let first = use_case.execute().await.unwrap();
    let second = use_case.execute().await.unwrap();
    assert_eq!((first.stored, second.stored), (10, 10));

    let rows = sink.rows().await;
    assert_eq!(rows.len(), 20);
    let (first_rows, second_rows) = rows.split_at(10);

    // the retried page lands after the rest of its round the first time
    let first_names: Vec<_> = first_rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(&first_names[8..], ["item-4", "item-5"]);
    let second_names: Vec<_> = second_rows.iter().map(|r| r.name.as_str()).collect();
    let in_order: Vec<String> = (0..10).map(|i| format!("item-{i}")).collect();
    assert_eq!(second_names, in_order);

    // same records twice over, nothing merged away
    let mut a = first_rows.to_vec();
    let mut b = second_rows.to_vec();
    a.sort_by(|x, y| x.name.cmp(&y.name));
    b.sort_by(|x, y| x.name.cmp(&y.name));
    assert_eq!(a, b);
    assert!(rows.iter().all(|row| row.province == "서울"));
}
