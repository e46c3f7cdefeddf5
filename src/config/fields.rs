//! Declared strategy fields and the setting overlay
//!
//! A strategy declares the fields it reads from its setting block. Each field
//! is either unset (must come from configuration) or carries a default set
//! by code. [`load_setting`] overlays the strategy's block onto the declared
//! fields and then checks that nothing is left unset.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::types::{ConfigBlock, GlobalSetting};
use crate::common::errors::{Result, StrateError};

/// One declared field
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: Option<Value>,
}

/// Ordered set of declared fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    fields: Vec<Field>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field that configuration must supply
    pub fn required(mut self, name: impl Into<String>) -> Self {
        self.declare(name.into(), None);
        self
    }

    /// Declare a field with a code-supplied default
    ///
    /// Defaults that serialize to `null` or fail to serialize leave the field
    /// unset, so validation still reports it.
    pub fn with_default<T: Serialize>(mut self, name: impl Into<String>, value: T) -> Self {
        let value = serde_json::to_value(value).ok().filter(|v| !v.is_null());
        self.declare(name.into(), value);
        self
    }

    fn declare(&mut self, name: String, value: Option<Value>) {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => field.value = value,
            None => self.fields.push(Field { name, value }),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.raw(name).is_some()
    }

    /// Raw value of a set field
    pub fn raw(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| f.value.as_ref())
    }

    /// Typed value of a set field
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let value = self.raw(name).ok_or_else(|| {
            StrateError::Configuration(format!("field '{}' is not set", name))
        })?;

        serde_json::from_value(value.clone()).map_err(|e| {
            StrateError::Configuration(format!("field '{}' has an invalid value: {}", name, e))
        })
    }

    /// Overwrite every declared field the block names; other keys are ignored.
    /// An explicit `null` clears the field. Returns how many fields were
    /// overwritten.
    pub fn overlay(&mut self, block: &ConfigBlock) -> usize {
        let mut applied = 0;
        for field in &mut self.fields {
            if let Some(value) = block.get(&field.name) {
                field.value = match value {
                    Value::Null => None,
                    other => Some(other.clone()),
                };
                applied += 1;
            }
        }
        applied
    }

    /// Fail on the first field, in declaration order, that is still unset
    pub fn validate(&self, strategy: &str) -> Result<()> {
        match self.fields.iter().find(|f| f.value.is_none()) {
            Some(field) => Err(StrateError::ConfigIncomplete {
                strategy: strategy.to_string(),
                field: field.name.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Overlay the block named `strategy` onto `fields`, then validate completeness
pub fn load_setting(global: &GlobalSetting, strategy: &str, fields: &mut FieldSet) -> Result<()> {
    let block = global.get(strategy).ok_or_else(|| StrateError::ConfigMissing {
        strategy: strategy.to_string(),
    })?;

    let applied = fields.overlay(block);
    debug!(strategy, applied, declared = fields.len(), "applied setting overlay");

    fields.validate(strategy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn block(value: Value) -> ConfigBlock {
        match value {
            Value::Object(map) => map,
            _ => panic!("block must be an object"),
        }
    }

    fn global(name: &str, value: Value) -> GlobalSetting {
        let mut setting = GlobalSetting::new();
        setting.insert(name.to_string(), block(value));
        setting
    }

    #[test]
    fn test_overlay_then_validate_reports_missing_field() {
        let mut fields = FieldSet::new().required("a").required("b");
        let err = load_setting(&global("demo", json!({"a": 5})), "demo", &mut fields).unwrap_err();

        assert_eq!(fields.get::<i64>("a").unwrap(), 5);
        assert_eq!(
            err,
            StrateError::ConfigIncomplete {
                strategy: "demo".to_string(),
                field: "b".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_block() {
        let mut fields = FieldSet::new().required("a");
        let err = load_setting(&GlobalSetting::new(), "demo", &mut fields).unwrap_err();
        assert_eq!(
            err,
            StrateError::ConfigMissing {
                strategy: "demo".to_string()
            }
        );
    }

    #[test]
    fn test_overlay_satisfies_required_field_and_ignores_unknown_keys() {
        let mut fields = FieldSet::new().required("a").with_default("b", 1);
        let applied = fields.overlay(&block(json!({"a": 0, "zzz": true})));

        assert_eq!(applied, 1);
        assert!(fields.validate("demo").is_ok());
        assert_eq!(fields.get::<i64>("a").unwrap(), 0);
        assert_eq!(fields.get::<i64>("b").unwrap(), 1);
        assert!(!fields.names().any(|n| n == "zzz"));
    }

    #[test]
    fn test_zero_default_is_a_real_value() {
        let fields = FieldSet::new().with_default("threshold", 0);
        assert!(fields.validate("demo").is_ok());
    }

    #[test]
    fn test_config_overrides_default() {
        let mut fields = FieldSet::new().with_default("symbol_pools", vec!["HK.00700"]);
        fields.overlay(&block(json!({"symbol_pools": ["US.AAPL"]})));
        assert_eq!(
            fields.get::<Vec<String>>("symbol_pools").unwrap(),
            vec!["US.AAPL".to_string()]
        );
    }

    #[test]
    fn test_null_in_config_unsets_field() {
        let mut fields = FieldSet::new().with_default("param2", 100);
        let err = load_setting(&global("demo", json!({"param2": null})), "demo", &mut fields)
            .unwrap_err();
        assert!(matches!(err, StrateError::ConfigIncomplete { field, .. } if field == "param2"));
    }

    #[test]
    fn test_typed_get_rejects_wrong_type() {
        let fields = FieldSet::new().with_default("param1", "twenty");
        let err = fields.get::<u32>("param1").unwrap_err();
        assert!(matches!(err, StrateError::Configuration(_)));
    }

    #[test]
    fn test_redeclaring_replaces_value() {
        let fields = FieldSet::new().required("a").with_default("a", 3);
        assert_eq!(fields.len(), 1);
        assert!(fields.is_set("a"));
    }
}
