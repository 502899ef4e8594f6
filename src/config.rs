// Wed Oct 14 2026 - Alex

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Objects a type scan may examine before giving up.
    pub default_budget: u64,
    /// Longest symbol or package name the descriptor will decode.
    pub max_string_length: u64,
    /// Check namespace table answers against the heap before trusting them.
    pub verify_namespace_hits: bool,
    pub log_level: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            default_budget: 1_000_000,
            max_string_length: 1 << 20,
            verify_namespace_hits: true,
            log_level: "info".to_string(),
        }
    }
}

impl ScanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_budget(mut self, budget: u64) -> Self {
        self.default_budget = budget;
        self
    }

    pub fn with_max_string_length(mut self, length: u64) -> Self {
        self.max_string_length = length;
        self
    }

    pub fn with_verify_namespace_hits(mut self, verify: bool) -> Self {
        self.verify_namespace_hits = verify;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, String> {
        let config: Self = serde_json::from_str(json).map_err(|e| format!("Invalid config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read {}: {}", path.as_ref().display(), e))?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.default_budget == 0 {
            return Err("default_budget must be greater than 0".to_string());
        }
        if self.max_string_length == 0 {
            return Err("max_string_length must be greater than 0".to_string());
        }
        match self.log_level.to_lowercase().as_str() {
            "off" | "error" | "warn" | "warning" | "info" | "debug" | "trace" => Ok(()),
            other => Err(format!("unknown log_level '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ScanConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ScanConfig::from_json_str(r#"{ "default_budget": 64, "log_level": "debug" }"#).unwrap();
        assert_eq!(config.default_budget, 64);
        assert_eq!(config.max_string_length, 1 << 20);
        assert!(config.verify_namespace_hits);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ScanConfig::default().with_default_budget(0).validate().is_err());
        assert!(ScanConfig::default().with_max_string_length(0).validate().is_err());
        assert!(ScanConfig::default().with_log_level("loud").validate().is_err());
        assert!(ScanConfig::from_json_str("{ not json").is_err());
    }
}
