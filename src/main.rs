//! `lost-items` command line front end
//!
//! Results are printed to stdout as JSON; logs go to stderr (and optionally a file).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use lost_items_lib::application::RefreshLostItemsUseCase;
use lost_items_lib::crawling::CrawlPolicy;
use lost_items_lib::domain::{
    LostItemPageSource, LostItemQuery, LostItemSink, PageIndex, Province, distinct_categories,
    distinct_found_spots,
};
use lost_items_lib::infrastructure::logging::log_system_info;
use lost_items_lib::infrastructure::{
    AppConfig, CategoryCatalogFetcher, ConfigLoadOutcome, ConfigManager, HttpClient, HttpClientConfig,
    JsonLinesLostItemSink, LostItemPageFetcher, init_logging_with_config,
};

#[derive(Parser)]
#[command(name = "lost-items")]
#[command(about = "Lotte World lost-property board crawler", version)]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Site {
    Seoul,
    Busan,
}

impl From<Site> for Province {
    fn from(site: Site) -> Self {
        match site {
            Site::Seoul => Self::Seoul,
            Site::Busan => Self::Busan,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl every page of a board and store the rows
    Crawl {
        site: Site,
        /// Pages per round (defaults to `crawling.batch_size`)
        #[arg(long)]
        batch_size: Option<u32>,
        /// Append rows to this NDJSON file
        #[arg(long, required_unless_present = "dry_run", conflicts_with = "dry_run")]
        output: Option<PathBuf>,
        /// Crawl without storing anything; the report shows `stored: 0`
        #[arg(long)]
        dry_run: bool,
    },

    /// Scheduled refresh: crawl with `crawling.refresh_batch_size` and append to NDJSON
    Refresh {
        site: Site,
        #[arg(long)]
        output: PathBuf,
    },

    /// Fetch the first pages needed for N results
    Query {
        site: Site,
        #[arg(long)]
        results: u32,
        #[arg(long)]
        keyword: Option<String>,
        /// Category code, see `categories`
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        end_date: Option<String>,
    },

    /// Fetch a single page
    Page {
        site: Site,
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },

    /// List category codes from the Seoul board
    Categories,
}

#[derive(Serialize)]
struct QueryOutput<T: Serialize> {
    province: Province,
    #[serde(flatten)]
    result: T,
    categories: Vec<String>,
    found_spots: Vec<String>,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output")?
    );
    Ok(())
}

/// Load the config without logging yet; the outcome is logged once the subscriber is up
async fn load_config(cli: &Cli) -> Result<(AppConfig, ConfigLoadOutcome, PathBuf)> {
    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    let (mut config, outcome) = manager.load_config_with_outcome().await?;
    if let Some(level) = &cli.log_level {
        config.logging.level.clone_from(level);
    }
    Ok((config, outcome, manager.config_path().to_path_buf()))
}

/// Where crawled rows go
enum Storage {
    DryRun,
    JsonLines(PathBuf),
}

async fn run_crawl(province: Province, policy: CrawlPolicy, storage: Storage) -> Result<()> {
    let source = Arc::new(LostItemPageFetcher::shared(province)?);
    let use_case = match storage {
        Storage::DryRun => RefreshLostItemsUseCase::dry_run(province, source, policy),
        Storage::JsonLines(path) => {
            let sink: Arc<dyn LostItemSink> = Arc::new(JsonLinesLostItemSink::new(path));
            RefreshLostItemsUseCase::new(province, source, policy, sink)
        }
    };

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Ctrl-C received, finishing the current round");
            ctrl_c.cancel();
        }
    });

    let report = use_case.execute_with_cancellation(&cancel).await?;
    print_json(&report)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, outcome, config_path) = load_config(&cli).await?;

    init_logging_with_config(config.logging.clone())?;
    outcome.log(&config_path);
    log_system_info();

    let client = HttpClient::init_shared(HttpClientConfig::from_http_config(&config.http))?;

    match cli.command {
        Commands::Crawl {
            site,
            batch_size,
            output,
            dry_run,
        } => {
            let policy = CrawlPolicy::for_crawl(&config.crawling, batch_size)?;
            let storage = match output {
                Some(path) if !dry_run => Storage::JsonLines(path),
                _ => Storage::DryRun,
            };
            run_crawl(site.into(), policy, storage).await?;
        }
        Commands::Refresh { site, output } => {
            let policy = CrawlPolicy::refresh_from_config(&config.crawling)?;
            info!("Refresh batch size {}", policy.batch_size());
            run_crawl(site.into(), policy, Storage::JsonLines(output)).await?;
        }
        Commands::Query {
            site,
            results,
            keyword,
            category,
            start_date,
            end_date,
        } => {
            let query = LostItemQuery {
                keyword,
                category,
                start_date,
                end_date,
            };
            let fetcher = LostItemPageFetcher::shared(site.into())?;
            let result = fetcher.fetch_range(results, &query).await?;
            print_json(&QueryOutput {
                province: site.into(),
                categories: distinct_categories(&result.records),
                found_spots: distinct_found_spots(&result.records),
                result,
            })?;
        }
        Commands::Page { site, page } => {
            let page = PageIndex::new(page).context("Page numbers start at 1")?;
            let fetcher = LostItemPageFetcher::shared(site.into())?;
            let result = fetcher.fetch_page(page, &LostItemQuery::default()).await?;
            print_json(&result)?;
        }
        Commands::Categories => {
            let categories = CategoryCatalogFetcher::new(client)?.fetch_categories().await?;
            print_json(&categories)?;
        }
    }

    Ok(())
}
