//! Store Settings
//!
//! Resolves the store configuration: a JSON blob in localStorage wins,
//! then the URL baked in at build time, then the local default.

use board_core::StoreConfig;

/// localStorage key holding a JSON `StoreConfig`
pub const STORAGE_KEY: &str = "taskboard.store";
const DEFAULT_STORE_URL: &str = "http://127.0.0.1:9000";

pub fn load_store_config() -> StoreConfig {
    if let Some(raw) = read_local_storage(STORAGE_KEY) {
        match StoreConfig::from_json(&raw) {
            Ok(config) => {
                log::info!("[APP] store config from localStorage: {}", config.normalized_base());
                return config;
            }
            Err(e) => log::warn!("[APP] ignoring stored config: {}", e),
        }
    }
    let config = StoreConfig::new(option_env!("TASKBOARD_STORE_URL").unwrap_or(DEFAULT_STORE_URL));
    if let Err(e) = config.validate() {
        log::warn!("[APP] {}; falling back to {}", e, DEFAULT_STORE_URL);
        return StoreConfig::new(DEFAULT_STORE_URL);
    }
    config
}

fn read_local_storage(key: &str) -> Option<String> {
    web_sys::window()?.local_storage().ok()??.get_item(key).ok()?
}
