//! Configuration loader

use config::{Config, Environment, File};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

use super::types::{AppConfig, ConfigBlock, GlobalSetting};
use crate::common::errors::{Result, StrateError};

/// Prefix of environment variables overriding single setting fields
pub const SETTING_ENV_PREFIX: &str = "TINYQUANT__";

/// Load application configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with APP__)
/// 2. Configuration file (TOML format)
/// 3. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("APP")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    Ok(config.try_deserialize()?)
}

/// Encoding of a strategy setting file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingFormat {
    Json,
    Toml,
}

impl SettingFormat {
    /// Format implied by the file extension; anything but `.toml` is JSON
    pub fn from_path(path: &str) -> Self {
        match Path::new(path).extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => SettingFormat::Toml,
            _ => SettingFormat::Json,
        }
    }
}

/// Load every strategy's setting block
///
/// The file (JSON or TOML, picked by extension) maps strategy names to
/// field blocks. Strategy and field names keep their case.
/// `TINYQUANT__<strategy>__<field>` environment variables override single
/// fields, matched case-sensitively.
pub fn load_global_setting(path: &str) -> Result<GlobalSetting> {
    if !Path::new(path).exists() {
        return Err(StrateError::Configuration(format!(
            "setting file '{}' not found",
            path
        )));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| StrateError::Configuration(format!("reading '{}': {}", path, e)))?;
    let mut setting = load_global_setting_from_str(&content, SettingFormat::from_path(path))?;
    let applied = apply_setting_overrides(&mut setting, std::env::vars());

    debug!(path, strategies = setting.len(), overrides = applied, "loaded global setting");
    Ok(setting)
}

/// Parse a global setting held in memory
pub fn load_global_setting_from_str(content: &str, format: SettingFormat) -> Result<GlobalSetting> {
    let setting = match format {
        SettingFormat::Json => serde_json::from_str(content)?,
        SettingFormat::Toml => toml::from_str(content)?,
    };
    Ok(setting)
}

/// Apply `TINYQUANT__<strategy>__<field>=<value>` pairs to `setting`.
///
/// Values are read as JSON when they parse, as plain strings otherwise.
/// Variables without both a strategy and a field part are ignored.
/// Returns the number of fields set.
pub fn apply_setting_overrides<I>(setting: &mut GlobalSetting, vars: I) -> usize
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut applied = 0;
    for (key, raw) in vars {
        let Some(rest) = key.strip_prefix(SETTING_ENV_PREFIX) else {
            continue;
        };
        let Some((strategy, field)) = rest.split_once("__") else {
            warn!(key, "setting override needs a strategy and a field");
            continue;
        };
        if strategy.is_empty() || field.is_empty() {
            warn!(key, "setting override needs a strategy and a field");
            continue;
        }

        let value = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
        setting
            .entry(strategy.to_string())
            .or_insert_with(ConfigBlock::new)
            .insert(field.to_string(), value);
        applied += 1;
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::PriceFallback;
    use serde_json::json;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_global_setting_from_json() {
        let setting = load_global_setting_from_str(
            r#"{
                "tiny_strate_sample": {
                    "symbol_pools": ["HK.00700", "HK.00001"],
                    "param1": 20,
                    "param2": 100
                }
            }"#,
            SettingFormat::Json,
        )
        .unwrap();

        let block = &setting["tiny_strate_sample"];
        assert_eq!(block["param1"], json!(20));
        assert_eq!(block["symbol_pools"], json!(["HK.00700", "HK.00001"]));
    }

    #[test]
    fn test_global_setting_from_toml() {
        let setting = load_global_setting_from_str(
            r#"
            [tiny_strate_sample]
            param1 = 5
            param2 = 200
            "#,
            SettingFormat::Toml,
        )
        .unwrap();

        assert_eq!(setting.len(), 1);
        assert_eq!(setting["tiny_strate_sample"]["param2"], json!(200));
    }

    #[test]
    fn test_setting_keys_keep_their_case() {
        let setting = load_global_setting_from_str(
            r#"{"MyStrate": {"symbolPools": ["HK.00700"], "Param1": 3}}"#,
            SettingFormat::Json,
        )
        .unwrap();
        assert!(setting.contains_key("MyStrate"));
        assert!(!setting.contains_key("mystrate"));
        assert_eq!(setting["MyStrate"]["symbolPools"], json!(["HK.00700"]));
        assert_eq!(setting["MyStrate"]["Param1"], json!(3));

        let setting = load_global_setting_from_str(
            "[MyStrate]\nParam1 = 3\n",
            SettingFormat::Toml,
        )
        .unwrap();
        assert_eq!(setting["MyStrate"]["Param1"], json!(3));
    }

    #[test]
    fn test_setting_format_from_extension() {
        assert_eq!(SettingFormat::from_path("demos/setting.toml"), SettingFormat::Toml);
        assert_eq!(SettingFormat::from_path("setting.json"), SettingFormat::Json);
        assert_eq!(SettingFormat::from_path("setting"), SettingFormat::Json);
    }

    #[test]
    fn test_overrides_set_single_fields() {
        let mut setting =
            load_global_setting_from_str(r#"{"MyStrate": {"Param1": 3}}"#, SettingFormat::Json)
                .unwrap();

        let applied = apply_setting_overrides(
            &mut setting,
            vars(&[
                ("TINYQUANT__MyStrate__Param1", "7"),
                ("TINYQUANT__MyStrate__symbolPools", r#"["HK.00001"]"#),
                ("TINYQUANT__other__label", "plain text"),
                ("TINYQUANT__broken", "1"),
                ("HOME", "/root"),
            ]),
        );

        assert_eq!(applied, 3);
        assert_eq!(setting["MyStrate"]["Param1"], json!(7));
        assert_eq!(setting["MyStrate"]["symbolPools"], json!(["HK.00001"]));
        assert_eq!(setting["other"]["label"], json!("plain text"));
        assert!(!setting.contains_key("mystrate"));
    }

    #[test]
    fn test_load_global_setting_reads_environment_overrides() {
        let path = std::env::temp_dir().join(format!("tiny_quant_setting_{}.json", std::process::id()));
        std::fs::write(&path, r#"{"EnvStrate": {"Param1": 3, "param2": 100}}"#).unwrap();
        std::env::set_var("TINYQUANT__EnvStrate__Param1", "9");

        let setting = load_global_setting(path.to_str().unwrap()).unwrap();
        std::env::remove_var("TINYQUANT__EnvStrate__Param1");
        std::fs::remove_file(&path).unwrap();

        assert_eq!(setting["EnvStrate"]["Param1"], json!(9));
        assert_eq!(setting["EnvStrate"]["param2"], json!(100));
    }

    #[test]
    fn test_missing_setting_file_is_a_configuration_error() {
        let err = load_global_setting("/definitely/not/here/setting.json").unwrap_err();
        assert!(matches!(err, StrateError::Configuration(_)));
    }

    #[test]
    fn test_app_config_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.settings.setting_path, "setting.json");
        assert_eq!(config.settings.price_fallback, PriceFallback::UseRawPrice);
    }
}
