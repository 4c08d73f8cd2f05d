use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use dashmap::DashMap;
use once_cell::sync::Lazy;
use tokio::time::{Duration, sleep};
use tracing::debug;

use super::sink::{ClickSink, ClickUpdate};
use crate::services::device::{BrowserType, DeviceType};

type ClickKey = (String, DeviceType, BrowserType);

// Global buffer of not-yet-flushed clicks
pub static CLICK_BUFFER: Lazy<DashMap<ClickKey, u64>> = Lazy::new(DashMap::new);

// Guards against overlapping flushes
static CLICK_UPDATE_LOCK: AtomicBool = AtomicBool::new(false);

/// Buffers click counts in memory and flushes them to a sink periodically,
/// so the redirect path never waits on the storage backend.
pub struct ClickManager {
    sink: Arc<dyn ClickSink>,
    flush_interval: Duration,
}

impl ClickManager {
    pub fn new(sink: Arc<dyn ClickSink>, flush_interval: Duration) -> Self {
        Self {
            sink,
            flush_interval,
        }
    }

    /// Count one click (thread-safe, lock-free)
    pub fn increment(&self, code: &str, device: DeviceType, browser: BrowserType) {
        *CLICK_BUFFER
            .entry((code.to_string(), device, browser))
            .or_insert(0) += 1;
    }

    /// Periodic flush loop, run as a background task
    pub async fn start_background_task(&self) {
        loop {
            sleep(self.flush_interval).await;

            debug!("ClickManager: triggering flush to storage");
            self.flush_inner().await;
        }
    }

    pub async fn flush(&self) {
        debug!("ClickManager: manual flush triggered");
        self.flush_inner().await;
    }

    async fn flush_inner(&self) {
        if CLICK_UPDATE_LOCK.swap(true, Ordering::SeqCst) {
            debug!("ClickManager: flush already in progress, skipping");
            return;
        }

        let result = {
            let keys: Vec<ClickKey> = CLICK_BUFFER
                .iter()
                .map(|entry| entry.key().clone())
                .collect();

            if keys.is_empty() {
                debug!("ClickManager: no clicks to flush");
                CLICK_UPDATE_LOCK.store(false, Ordering::SeqCst);
                return;
            }

            // drain per key: clicks landing after the snapshot stay buffered
            // for the next flush
            let updates: Vec<ClickUpdate> = keys
                .into_iter()
                .filter_map(|key| CLICK_BUFFER.remove(&key))
                .map(|((code, device, browser), count)| ClickUpdate {
                    code,
                    device,
                    browser,
                    count,
                })
                .collect();

            self.sink.flush_clicks(updates).await
        };

        if let Err(e) = result {
            debug!("ClickManager: flush_clicks failed: {}", e);
        }

        CLICK_UPDATE_LOCK.store(false, Ordering::SeqCst);
        debug!("ClickManager: flush completed");
    }
}
