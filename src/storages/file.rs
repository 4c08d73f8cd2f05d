//! JSON-file storage backend
//!
//! The whole link table is held in an in-process cache and written back as a
//! JSON array on every mutation. Fine for the intended scale (hundreds of
//! links, single process).

use std::collections::HashMap;
use std::fs;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{error, info, warn};

use super::{ClickUpdate, Link, Storage};
use crate::errors::{Result, SmartlinkError};
use crate::services::device::{BrowserType, DeviceType};

pub struct FileStorage {
    file_path: String,
    cache: RwLock<HashMap<String, Link>>,
}

impl FileStorage {
    pub fn new(file_path: &str) -> Result<Self> {
        let storage = FileStorage {
            file_path: file_path.to_string(),
            cache: RwLock::new(HashMap::new()),
        };

        let links = storage.load_from_file()?;
        {
            let mut cache = storage.cache.write().unwrap();
            *cache = links;
            info!(
                "FileStorage initialized with {} links from {}",
                cache.len(),
                file_path
            );
        }

        Ok(storage)
    }

    fn load_from_file(&self) -> Result<HashMap<String, Link>> {
        match fs::read_to_string(&self.file_path) {
            Ok(content) => {
                let links: Vec<Link> = serde_json::from_str(&content).map_err(|e| {
                    error!("Failed to parse links file {}: {}", self.file_path, e);
                    SmartlinkError::serialization(format!("Failed to parse links file: {}", e))
                })?;

                Ok(links
                    .into_iter()
                    .map(|link| (link.code.clone(), link))
                    .collect())
            }
            Err(_) => {
                info!("Links file not found, creating empty store");
                fs::write(&self.file_path, "[]").map_err(|e| {
                    SmartlinkError::file_operation(format!("Failed to create links file: {}", e))
                })?;
                Ok(HashMap::new())
            }
        }
    }

    fn save_to_file(&self, cache: &HashMap<String, Link>) -> Result<()> {
        let mut links: Vec<&Link> = cache.values().collect();
        links.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        let content = serde_json::to_string_pretty(&links)?;
        fs::write(&self.file_path, content).map_err(|e| {
            error!("Failed to write links file {}: {}", self.file_path, e);
            SmartlinkError::file_operation(format!("Failed to write links file: {}", e))
        })
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn get(&self, code: &str) -> Option<Link> {
        self.cache.read().unwrap().get(code).cloned()
    }

    async fn load_all(&self) -> HashMap<String, Link> {
        self.cache.read().unwrap().clone()
    }

    async fn set(&self, link: Link) -> Result<()> {
        let mut cache = self.cache.write().unwrap();
        cache.insert(link.code.clone(), link);
        self.save_to_file(&cache)
    }

    async fn remove(&self, code: &str) -> Result<()> {
        let mut cache = self.cache.write().unwrap();
        match cache.get_mut(code) {
            Some(link) => {
                link.is_active = false;
            }
            None => {
                return Err(SmartlinkError::not_found(format!(
                    "Link not found: {}",
                    code
                )));
            }
        }
        self.save_to_file(&cache)
    }

    async fn increment_click(
        &self,
        code: &str,
        device: DeviceType,
        browser: BrowserType,
        count: u64,
    ) -> Result<()> {
        let mut cache = self.cache.write().unwrap();
        match cache.get_mut(code) {
            Some(link) => {
                link.analytics.record(device, browser, count);
                link.last_clicked_at = Some(Utc::now());
            }
            None => {
                return Err(SmartlinkError::not_found(format!(
                    "Link not found: {}",
                    code
                )));
            }
        }
        self.save_to_file(&cache)
    }

    // one file write per batch, not one per drained buffer entry
    async fn increment_clicks(&self, updates: Vec<ClickUpdate>) -> Result<()> {
        let mut cache = self.cache.write().unwrap();
        for update in &updates {
            match cache.get_mut(&update.code) {
                Some(link) => {
                    link.analytics.record(update.device, update.browser, update.count);
                    link.last_clicked_at = Some(Utc::now());
                }
                None => {
                    warn!(
                        "Dropping {} buffered clicks for {}: link not found",
                        update.count, update.code
                    );
                }
            }
        }
        self.save_to_file(&cache)
    }

    async fn reload(&self) -> Result<()> {
        let links = self.load_from_file()?;
        let mut cache = self.cache.write().unwrap();
        *cache = links;
        info!("FileStorage reloaded, {} links", cache.len());
        Ok(())
    }

    async fn get_backend_name(&self) -> String {
        "file".to_string()
    }
}
