//! Infrastructure layer: HTTP, HTML parsing, storage sinks, configuration and logging
//!
//! Concrete implementations of the domain's page-source and sink interfaces.

pub mod config; // Configuration file and constants
pub mod http_client;
pub mod logging; // Logging infrastructure
pub mod lost_item_sinks;
pub mod page_fetcher;
pub mod parsing;
pub mod site_profile;

// Re-export commonly used items
pub use config::{AppConfig, ConfigLoadOutcome, ConfigManager, lotteworld};
pub use http_client::{HttpClient, HttpClientConfig};
pub use logging::{get_log_directory, init_logging, init_logging_with_config};
pub use lost_item_sinks::{JsonLinesLostItemSink, MemoryLostItemSink};
pub use page_fetcher::{CategoryCatalogFetcher, LostItemPageFetcher};
pub use parsing::{LostItemListParser, LostItemSelectors, ParsingError, ParsingResult};
pub use site_profile::SiteProfile;
