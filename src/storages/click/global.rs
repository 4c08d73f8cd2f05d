use std::sync::{Arc, OnceLock};

use tracing::warn;

use super::manager::ClickManager;

static GLOBAL_CLICK_MANAGER: OnceLock<Arc<ClickManager>> = OnceLock::new();

/// Install the global click manager (once, during startup)
pub fn set_global_click_manager(manager: Arc<ClickManager>) {
    if GLOBAL_CLICK_MANAGER.set(manager).is_err() {
        warn!("Click manager already initialized");
    }
}

/// The global click manager, if the server has installed one
pub fn get_click_manager() -> Option<Arc<ClickManager>> {
    GLOBAL_CLICK_MANAGER.get().cloned()
}
