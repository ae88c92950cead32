//! Parser configuration
//!
//! This module handles the options a parser is built with, read from JSON
//! or from a flat map of context properties.

use ahash::AHashMap;
use serde::Deserialize;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

use crate::error::{Result, SearchError};
use crate::value::{Coercer, ValueType, DEFAULT_DATE_FORMAT, DEFAULT_DATETIME_FORMAT};

/// Property key enabling `=` as a spelling of `==`
pub const SUPPORT_SINGLE_EQUALS: &str = "fiql.support.single.equals.operator";
/// Property key for wildcard case sensitivity
pub const WILDCARD_CASE_SENSITIVE: &str = "search.wildcard.case.sensitive";
/// Property key for the date format
pub const DATE_FORMAT: &str = "search.date-format";
/// Property key for the date-time format
pub const DATETIME_FORMAT: &str = "search.datetime-format";

/// Options fixed at parser construction
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Accept `=` as `==`
    pub support_single_equals: bool,
    pub wildcard_case_sensitive: bool,
    /// chrono format of date literals
    pub date_format: String,
    /// chrono format of date-time literals
    pub datetime_format: String,
    /// Alias to real dotted property path
    pub aliases: AHashMap<String, String>,
    /// Declared types of dynamic bag keys
    pub type_hints: AHashMap<String, ValueType>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            support_single_equals: false,
            wildcard_case_sensitive: true,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            datetime_format: DEFAULT_DATETIME_FORMAT.to_string(),
            aliases: AHashMap::new(),
            type_hints: AHashMap::new(),
        }
    }
}

impl ParserConfig {
    /// Read a configuration from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SearchError::InvalidConfig(e.to_string()))
    }

    /// Read the recognized keys of a context-property map
    ///
    /// Flags are on when their value is `true` in any case. Unknown keys are
    /// ignored.
    pub fn from_properties<K, V, S>(properties: &HashMap<K, V, S>) -> Self
    where
        K: Borrow<str> + Hash + Eq,
        V: AsRef<str>,
        S: BuildHasher,
    {
        let mut config = Self::default();
        if let Some(on) = lookup(properties, SUPPORT_SINGLE_EQUALS).map(is_on) {
            config.support_single_equals = on;
        }
        if let Some(on) = lookup(properties, WILDCARD_CASE_SENSITIVE).map(is_on) {
            config.wildcard_case_sensitive = on;
        }
        if let Some(format) = lookup(properties, DATE_FORMAT) {
            config.date_format = format.to_string();
        }
        if let Some(format) = lookup(properties, DATETIME_FORMAT) {
            config.datetime_format = format.to_string();
        }
        config
    }

    pub fn with_single_equals(mut self, on: bool) -> Self {
        self.support_single_equals = on;
        self
    }

    pub fn with_wildcard_case_sensitive(mut self, on: bool) -> Self {
        self.wildcard_case_sensitive = on;
        self
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    pub fn with_datetime_format(mut self, format: impl Into<String>) -> Self {
        self.datetime_format = format.into();
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), target.into());
        self
    }

    pub fn with_type_hint(mut self, key: impl Into<String>, ty: ValueType) -> Self {
        self.type_hints.insert(key.into(), ty);
        self
    }

    /// Literal coercer using the configured formats
    pub fn coercer(&self) -> Coercer {
        Coercer::new(self.date_format.clone(), self.datetime_format.clone())
    }
}

fn lookup<'m, K, V, S>(properties: &'m HashMap<K, V, S>, key: &str) -> Option<&'m str>
where
    K: Borrow<str> + Hash + Eq,
    V: AsRef<str>,
    S: BuildHasher,
{
    properties.get(key).map(|value| value.as_ref())
}

fn is_on(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ParserConfig::default();
        assert!(!config.support_single_equals);
        assert!(config.wildcard_case_sensitive);
        assert_eq!(config.date_format, "%Y-%m-%d");
        assert_eq!(config.coercer(), Coercer::default());
    }

    #[test]
    fn test_from_json_partial() {
        let config = ParserConfig::from_json(
            r#"{
                "support_single_equals": true,
                "aliases": {"title": "name"},
                "type_hints": {"id": "long", "price": "double"}
            }"#,
        )
        .unwrap();
        assert!(config.support_single_equals);
        assert!(config.wildcard_case_sensitive);
        assert_eq!(config.aliases.get("title").map(String::as_str), Some("name"));
        assert_eq!(config.type_hints.get("id"), Some(&ValueType::I64));
        assert_eq!(config.type_hints.get("price"), Some(&ValueType::F64));
    }

    #[test]
    fn test_from_json_rejects_unknown_type() {
        let err = ParserConfig::from_json(r#"{"type_hints": {"id": "decimal"}}"#).unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_properties() {
        let mut properties = HashMap::new();
        properties.insert(SUPPORT_SINGLE_EQUALS.to_string(), "TRUE".to_string());
        properties.insert(WILDCARD_CASE_SENSITIVE.to_string(), "false".to_string());
        properties.insert(DATE_FORMAT.to_string(), "%d/%m/%Y".to_string());
        properties.insert("unrelated".to_string(), "x".to_string());

        let config = ParserConfig::from_properties(&properties);
        assert!(config.support_single_equals);
        assert!(!config.wildcard_case_sensitive);
        assert_eq!(config.date_format, "%d/%m/%Y");
        assert_eq!(config.datetime_format, DEFAULT_DATETIME_FORMAT);
    }

    #[test]
    fn test_builder() {
        let config = ParserConfig::default()
            .with_single_equals(true)
            .with_alias("street", "address.street")
            .with_type_hint("id", ValueType::I64);
        assert!(config.support_single_equals);
        assert_eq!(config.aliases.len(), 1);
        assert_eq!(config.type_hints.len(), 1);
    }
}
