use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::config::Config;
use crate::errors::{Result, SmartlinkError};
use crate::services::device::{BrowserType, DeviceType};

pub mod click;
pub mod file;
pub mod memory;
pub mod models;

pub use click::ClickUpdate;
pub use models::{BrowserClicks, DeviceClicks, Link, LinkAnalytics};

#[async_trait]
pub trait Storage: Send + Sync {
    async fn get(&self, code: &str) -> Option<Link>;
    async fn load_all(&self) -> HashMap<String, Link>;
    async fn set(&self, link: Link) -> Result<()>;

    /// Soft delete: flips `is_active`, the record stays in the store
    async fn remove(&self, code: &str) -> Result<()>;

    /// Bump click counters and `last_clicked_at` by `count` clicks
    async fn increment_click(
        &self,
        code: &str,
        device: DeviceType,
        browser: BrowserType,
        count: u64,
    ) -> Result<()>;

    /// Apply a drained click batch
    ///
    /// Updates for links removed since buffering are dropped with a warning.
    /// Backends that persist on every mutation override this to write once
    /// per batch instead of once per entry.
    async fn increment_clicks(&self, updates: Vec<ClickUpdate>) -> Result<()> {
        for update in updates {
            if let Err(e) = self
                .increment_click(&update.code, update.device, update.browser, update.count)
                .await
            {
                warn!(
                    "Dropping {} buffered clicks for {}: {}",
                    update.count, update.code, e
                );
            }
        }
        Ok(())
    }

    async fn reload(&self) -> Result<()>;
    async fn get_backend_name(&self) -> String;
}

pub struct StorageFactory;

impl StorageFactory {
    pub fn create(config: &Config) -> Result<Arc<dyn Storage>> {
        let boxed: Box<dyn Storage> = match config.storage_backend.as_str() {
            "memory" => Box::new(memory::MemoryStorage::new()),
            "file" => Box::new(file::FileStorage::new(&config.links_file)?),
            other => {
                return Err(SmartlinkError::storage_backend_not_found(format!(
                    "Unknown storage backend: {}",
                    other
                )));
            }
        };

        Ok(Arc::from(boxed))
    }
}
