//! Configuration types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::engine::DEFAULT_CHANNEL_SIZE;

/// One strategy's setting block: field name to value
pub type ConfigBlock = serde_json::Map<String, serde_json::Value>;

/// Every strategy's setting block, keyed by strategy name
pub type GlobalSetting = HashMap<String, ConfigBlock>;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

/// What `buy`/`sell` do when the price cannot be aligned to the tick grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceFallback {
    /// Submit with the caller's price unchanged
    #[default]
    UseRawPrice,
    /// Return the regularization error without submitting
    Reject,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Path of the per-strategy setting file (JSON or TOML)
    #[serde(default = "default_setting_path")]
    pub setting_path: String,
    /// Order price policy when regularization fails
    #[serde(default)]
    pub price_fallback: PriceFallback,
    /// Buffer size of the event channel
    #[serde(default = "default_channel_size")]
    pub channel_size: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            setting_path: default_setting_path(),
            price_fallback: PriceFallback::default(),
            channel_size: default_channel_size(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_setting_path() -> String {
    "setting.json".to_string()
}

fn default_channel_size() -> usize {
    DEFAULT_CHANNEL_SIZE
}
