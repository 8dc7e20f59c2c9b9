//! Storage sinks for crawled lost items
//!
//! - `MemoryLostItemSink`: 드라이런/테스트용 메모리 저장소 (중복 제거 없음)
//! - `JsonLinesLostItemSink`: 한 줄에 한 건씩 JSON으로 이어 쓰기

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::info;

use crate::domain::{LostItem, LostItemSink, Province, StoredLostItem};

fn to_rows(province: Province, items: &[LostItem]) -> Vec<StoredLostItem> {
    items
        .iter()
        .map(|item| StoredLostItem::from_item(item, province))
        .collect()
}

/// Keeps every row it receives, duplicates included
#[derive(Debug, Clone, Default)]
pub struct MemoryLostItemSink {
    rows: Arc<RwLock<Vec<StoredLostItem>>>,
}

impl MemoryLostItemSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything stored so far, in insertion order
    pub async fn rows(&self) -> Vec<StoredLostItem> {
        self.rows.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl LostItemSink for MemoryLostItemSink {
    async fn insert_lost_items(&self, province: Province, items: &[LostItem]) -> Result<usize> {
        let new_rows = to_rows(province, items);
        let inserted = new_rows.len();
        self.rows.write().await.extend(new_rows);

        info!("Stored {} {} rows in memory", inserted, province);
        Ok(inserted)
    }
}

/// Appends rows to a newline-delimited JSON file
#[derive(Debug, Clone)]
pub struct JsonLinesLostItemSink {
    path: PathBuf,
}

impl JsonLinesLostItemSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LostItemSink for JsonLinesLostItemSink {
    async fn insert_lost_items(&self, province: Province, items: &[LostItem]) -> Result<usize> {
        let rows = to_rows(province, items);

        // 한 번에 직렬화한 뒤 한 번에 기록 (중간 실패 시 일부만 기록되는 것 방지)
        let mut buffer = String::new();
        for row in &rows {
            buffer.push_str(&serde_json::to_string(row).context("Failed to serialize lost item")?);
            buffer.push('\n');
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create output directory {:?}", parent))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open output file {:?}", self.path))?;
        file.write_all(buffer.as_bytes())
            .await
            .with_context(|| format!("Failed to write output file {:?}", self.path))?;
        file.flush().await.context("Failed to flush output file")?;

        info!("💾 Appended {} {} rows to {:?}", rows.len(), province, self.path);
        Ok(rows.len())
    }
}
