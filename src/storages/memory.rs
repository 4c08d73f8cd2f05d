//! In-memory storage backend
//!
//! Links live in a `DashMap` and vanish on restart. Useful for local
//! development and as the storage under the integration tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tracing::debug;

use super::{Link, Storage};
use crate::errors::{Result, SmartlinkError};
use crate::services::device::{BrowserType, DeviceType};

#[derive(Default)]
pub struct MemoryStorage {
    links: DashMap<String, Link>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage {
            links: DashMap::new(),
        }
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, code: &str) -> Option<Link> {
        self.links.get(code).map(|entry| entry.value().clone())
    }

    async fn load_all(&self) -> HashMap<String, Link> {
        self.links
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    async fn set(&self, link: Link) -> Result<()> {
        debug!("MemoryStorage: storing link {}", link.code);
        self.links.insert(link.code.clone(), link);
        Ok(())
    }

    async fn remove(&self, code: &str) -> Result<()> {
        match self.links.get_mut(code) {
            Some(mut entry) => {
                entry.is_active = false;
                Ok(())
            }
            None => Err(SmartlinkError::not_found(format!(
                "Link not found: {}",
                code
            ))),
        }
    }

    async fn increment_click(
        &self,
        code: &str,
        device: DeviceType,
        browser: BrowserType,
        count: u64,
    ) -> Result<()> {
        match self.links.get_mut(code) {
            Some(mut entry) => {
                entry.analytics.record(device, browser, count);
                entry.last_clicked_at = Some(Utc::now());
                Ok(())
            }
            None => Err(SmartlinkError::not_found(format!(
                "Link not found: {}",
                code
            ))),
        }
    }

    async fn reload(&self) -> Result<()> {
        Ok(())
    }

    async fn get_backend_name(&self) -> String {
        "memory".to_string()
    }
}
