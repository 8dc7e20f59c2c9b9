//! Configuration infrastructure
//!
//! Contains configuration loading and management for the lost-item crawlers.
//!
//! Configuration is organized into three sections:
//! 1. Crawling (batch size, refresh batch size, outage retries)
//! 2. HTTP client (timeout, user agent, redirects)
//! 3. Logging

#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub crawling: CrawlingConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

/// Batch crawler settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlingConfig {
    /// Pages per round for ad-hoc crawls (concurrency width and retry granularity)
    pub batch_size: u32,

    /// Pages per round used by the refresh use case
    pub refresh_batch_size: u32,

    /// Consecutive all-failed rounds to retry before treating one as end-of-data (0 = stop at once)
    pub max_outage_retries: u32,
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    pub request_timeout_seconds: u64,

    pub user_agent: String,

    pub follow_redirects: bool,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted file logs
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Directory for log files; defaults to `logs/` next to the executable
    pub log_directory: Option<PathBuf>,

    /// Number of log files to keep (older files will be deleted)
    pub max_files: u32,

    /// Enable automatic log cleanup on startup
    pub auto_cleanup_logs: bool,

    /// Module-specific log level filters (e.g., "reqwest": "info")
    pub module_filters: HashMap<String, String>,
}

impl Default for CrawlingConfig {
    fn default() -> Self {
        Self {
            batch_size: defaults::BATCH_SIZE,
            refresh_batch_size: defaults::REFRESH_BATCH_SIZE,
            max_outage_retries: defaults::MAX_OUTAGE_RETRIES,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            user_agent: defaults::USER_AGENT.to_string(),
            follow_redirects: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            log_directory: None,
            max_files: defaults::LOG_MAX_FILES,
            auto_cleanup_logs: defaults::LOG_AUTO_CLEANUP,
            module_filters: {
                let mut filters = HashMap::new();
                filters.insert("reqwest".to_string(), "info".to_string());
                filters.insert("hyper".to_string(), "warn".to_string());
                filters.insert("html5ever".to_string(), "warn".to_string());
                filters.insert("lost_items_lib".to_string(), "info".to_string());
                filters
            },
        }
    }
}

/// How [`ConfigManager::load_config_with_outcome`] produced its configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLoadOutcome {
    /// Existing file parsed
    Loaded,
    /// No file yet; defaults were written
    CreatedDefault,
    /// File did not parse; defaults were written over it
    ResetCorrupted {
        reason: String,
        /// `*.json.corrupted` copy, if the backup succeeded
        backup: Option<PathBuf>,
    },
}

impl ConfigLoadOutcome {
    /// Report the outcome through `tracing`; call once a subscriber is installed
    pub fn log(&self, config_path: &Path) {
        match self {
            Self::Loaded => info!("Loaded configuration from: {:?}", config_path),
            Self::CreatedDefault => info!("Created default configuration: {:?}", config_path),
            Self::ResetCorrupted { reason, backup } => {
                warn!("⚠️  Configuration {:?} was unreadable ({}); reset to defaults", config_path, reason);
                match backup {
                    Some(path) => warn!("⚠️  Previous file kept at {:?}", path),
                    None => warn!("⚠️  Previous file could not be backed up"),
                }
            }
        }
    }
}

/// Configuration manager for loading and saving settings
pub struct ConfigManager {
    pub config_path: PathBuf,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get user config directory")?
            .join("lost-items");

        Ok(config_dir)
    }

    /// Configuration manager rooted in the platform config directory
    pub fn new() -> Result<Self> {
        let config_path = Self::get_config_dir()?.join("lost_items_config.json");
        Ok(Self { config_path })
    }

    /// Configuration manager for an explicit file
    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// Load configuration from file, creating default if it doesn't exist
    pub async fn load_config(&self) -> Result<AppConfig> {
        self.load_config_with_outcome().await.map(|(config, _)| config)
    }

    /// Load configuration and report how it was obtained.
    ///
    /// Callers that load before logging is installed log the outcome afterwards.
    pub async fn load_config_with_outcome(&self) -> Result<(AppConfig, ConfigLoadOutcome)> {
        if !self.config_path.exists() {
            info!("Configuration file not found, creating default: {:?}", self.config_path);
            let default_config = AppConfig::default();
            self.save_config(&default_config).await?;
            return Ok((default_config, ConfigLoadOutcome::CreatedDefault));
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .context("Failed to read configuration file")?;

        match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => {
                info!("Loaded configuration from: {:?}", self.config_path);
                Ok((config, ConfigLoadOutcome::Loaded))
            }
            Err(parse_error) => {
                warn!("⚠️  Configuration parse error: {}", parse_error);
                warn!("⚠️  Resetting to default configuration");

                // Create backup of corrupted config
                let backup_path = self.config_path.with_extension("json.corrupted");
                let backup = match fs::copy(&self.config_path, &backup_path).await {
                    Ok(_) => {
                        info!("Backed up corrupted config to: {:?}", backup_path);
                        Some(backup_path)
                    }
                    Err(e) => {
                        warn!("Failed to create backup of corrupted config: {}", e);
                        None
                    }
                };

                let default_config = AppConfig::default();
                self.save_config(&default_config)
                    .await
                    .context("Failed to save default configuration")?;
                Ok((
                    default_config,
                    ConfigLoadOutcome::ResetCorrupted {
                        reason: parse_error.to_string(),
                        backup,
                    },
                ))
            }
        }
    }

    /// Save configuration to file
    pub async fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create config directory")?;
        }

        let content =
            serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;

        fs::write(&self.config_path, content)
            .await
            .context("Failed to write configuration file")?;

        info!("Saved configuration to: {:?}", self.config_path);
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

/// Lotte World lost-property board URLs
pub mod lotteworld {
    /// 서울 롯데월드 어드벤처 유실물 목록
    pub const SEOUL_LIST_URL: &str =
        "https://adventure.lotteworld.com/kor/communication/lost-property/list.do";

    /// 부산 롯데월드 어드벤처 유실물 목록 (부분 렌더링 엔드포인트)
    pub const BUSAN_LIST_URL: &str =
        "https://adventurebusan.lotteworld.com/kor/customer/lost-property/listPart.do";

    /// Page hosting the category drop-down
    pub const CATEGORY_PAGE_URL: &str = SEOUL_LIST_URL;

    /// 페이지 당 유실물 수
    pub const SEOUL_ITEMS_PER_PAGE: u32 = 10;
    pub const BUSAN_ITEMS_PER_PAGE: u32 = 8;
}

/// Default crawling configuration values
pub mod defaults {
    /// Default pages per crawl round
    pub const BATCH_SIZE: u32 = 5;

    /// Pages per round for the scheduled refresh
    pub const REFRESH_BATCH_SIZE: u32 = 20;

    /// Reproduce "zero records ends the crawl" unless configured otherwise
    pub const MAX_OUTAGE_RETRIES: u32 = 0;

    /// Default request timeout in seconds
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

    pub const USER_AGENT: &str = "lost-items/0.2 (+lost-property notification service)";

    /// Default log level
    pub const LOG_LEVEL: &str = "info";

    pub const LOG_JSON_FORMAT: bool = false;

    pub const LOG_CONSOLE_OUTPUT: bool = true;

    pub const LOG_FILE_OUTPUT: bool = false;

    /// Default maximum log files to keep
    pub const LOG_MAX_FILES: u32 = 5;

    pub const LOG_AUTO_CLEANUP: bool = true;
}
