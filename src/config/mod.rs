//! Configuration module - application settings and per-strategy setting blocks

pub mod fields;
pub mod loader;
pub mod types;

pub use fields::{FieldSet, load_setting};
pub use loader::{
    apply_setting_overrides, load_config, load_global_setting, load_global_setting_from_str,
    SettingFormat, SETTING_ENV_PREFIX,
};
pub use types::{AppConfig, AppSettings, ConfigBlock, GlobalSetting, PriceFallback};
