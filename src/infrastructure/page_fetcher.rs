//! Page fetchers for the lost-property boards
//!
//! `LostItemPageFetcher` is the HTTP-backed [`LostItemPageSource`]: one GET per
//! page, parsed with the site's selectors. No retry happens here; the batch
//! crawler decides what to do with a failed page.

use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::Html;
use std::num::NonZeroU32;
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::{
    Category, CrawlError, FetchResult, LostItemPageSource, LostItemQuery, PageIndex, PageResult,
    Province,
};
use crate::infrastructure::config::lotteworld;
use crate::infrastructure::http_client::HttpClient;
use crate::infrastructure::parsing::{
    CategoryParser, CategorySelectors, ContextualParser, HtmlParser, LostItemListParser,
    ParseContext,
};
use crate::infrastructure::site_profile::SiteProfile;

/// HTTP page source for one park
#[derive(Debug, Clone)]
pub struct LostItemPageFetcher {
    client: HttpClient,
    province: Province,
    list_url: Url,
    items_per_page: NonZeroU32,
    parser: LostItemListParser,
}

impl LostItemPageFetcher {
    pub fn new(client: HttpClient, profile: SiteProfile) -> Result<Self> {
        let list_url = Url::parse(&profile.list_url)
            .with_context(|| format!("Invalid list URL for {}: {}", profile.province, profile.list_url))?;
        let parser = LostItemListParser::new(&profile.selectors)
            .with_context(|| format!("Invalid selectors for {}", profile.province))?;

        Ok(Self {
            client,
            province: profile.province,
            list_url,
            items_per_page: profile.items_per_page,
            parser,
        })
    }

    /// Fetcher for a park on the process-wide shared client
    pub fn shared(province: Province) -> Result<Self> {
        Self::new(HttpClient::shared()?, SiteProfile::for_province(province))
    }

    pub fn province(&self) -> Province {
        self.province
    }
}

#[async_trait]
impl LostItemPageSource for LostItemPageFetcher {
    fn items_per_page(&self) -> NonZeroU32 {
        self.items_per_page
    }

    async fn fetch_page(&self, page: PageIndex, query: &LostItemQuery) -> FetchResult<PageResult> {
        debug!("Fetching {} page {}", self.province, page);

        let body = self
            .client
            .get_text_with_query(self.list_url.as_str(), &query.to_query_pairs(page))
            .await
            .map_err(|e| {
                warn!("❌ {} page {} failed: {:#}", self.province, page, e);
                CrawlError::fetch_failed(page, format!("{e:#}"))
            })?;

        let context = ParseContext::new(page, self.province, self.items_per_page);
        let records = {
            let document = Html::parse_document(&body);
            self.parser
                .parse_with_context(&document, &context)
                .map_err(|e| CrawlError::fetch_failed(page, e))?
        };

        Ok(PageResult::new(records))
    }
}

/// Reads the category drop-down from the Seoul board's search form
#[derive(Debug, Clone)]
pub struct CategoryCatalogFetcher {
    client: HttpClient,
    page_url: Url,
    parser: CategoryParser,
}

impl CategoryCatalogFetcher {
    pub fn new(client: HttpClient) -> Result<Self> {
        Self::with_page_url(client, lotteworld::CATEGORY_PAGE_URL)
    }

    pub fn with_page_url(client: HttpClient, page_url: &str) -> Result<Self> {
        Ok(Self {
            client,
            page_url: Url::parse(page_url)
                .with_context(|| format!("Invalid category page URL: {page_url}"))?,
            parser: CategoryParser::new(&CategorySelectors::default())
                .context("Invalid category selectors")?,
        })
    }

    /// 분류 코드 목록 ('전체' 제외)
    pub async fn fetch_categories(&self) -> Result<Vec<Category>> {
        let body = self
            .client
            .get_text(self.page_url.as_str())
            .await
            .context("Failed to fetch category page")?;

        let categories = {
            let document = Html::parse_document(&body);
            self.parser.parse(&document)?
        };

        info!("📂 Loaded {} lost-item categories", categories.len());
        Ok(categories)
    }
}
