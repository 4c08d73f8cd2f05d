use std::sync::Arc;

use crate::services::device::{BrowserType, DeviceType};
use crate::storages::Storage;

/// One drained buffer entry: how often a code was clicked by a given
/// device/browser combination since the last flush
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickUpdate {
    pub code: String,
    pub device: DeviceType,
    pub browser: BrowserType,
    pub count: u64,
}

#[async_trait::async_trait]
pub trait ClickSink: Send + Sync {
    async fn flush_clicks(&self, updates: Vec<ClickUpdate>) -> anyhow::Result<()>;
}

/// Flushes buffered clicks into the storage backend
pub struct StorageSink {
    storage: Arc<dyn Storage>,
}

impl StorageSink {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        StorageSink { storage }
    }
}

#[async_trait::async_trait]
impl ClickSink for StorageSink {
    async fn flush_clicks(&self, updates: Vec<ClickUpdate>) -> anyhow::Result<()> {
        // links deleted between buffering and flush are dropped by the backend
        self.storage.increment_clicks(updates).await?;
        Ok(())
    }
}
