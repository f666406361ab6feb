// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Configuration management for tidyup

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::categories::{builtin_categories, CategoryTable, DEFAULT_FALLBACK};

/// Main application configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Categories, in match order
    #[serde(default = "builtin_categories")]
    pub categories: Vec<CategoryConfig>,

    /// Folder for files whose extension no category claims
    #[serde(default = "default_fallback")]
    pub fallback_category: String,

    /// Defaults for sequential renaming
    #[serde(default)]
    pub rename: RenameConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct CategoryConfig {
    pub name: String,
    #[serde(default)]
    pub extensions: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RenameConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_start")]
    pub start: i64,
}

// Default value functions
fn default_fallback() -> String { DEFAULT_FALLBACK.to_string() }
fn default_prefix() -> String { "file_".to_string() }
fn default_start() -> i64 { 1 }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            categories: builtin_categories(),
            fallback_category: default_fallback(),
            rename: RenameConfig::default(),
        }
    }
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            start: default_start(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)
                .map_err(|e| crate::TidyError::Config(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check that the category settings form a usable table
    pub fn validate(&self) -> crate::Result<()> {
        CategoryTable::from_config(self).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = AppConfig::load(&tmp.path().join("absent.json")).unwrap();
        assert_eq!(config.categories, builtin_categories());
        assert_eq!(config.fallback_category, "Others");
        assert_eq!(config.rename.prefix, "file_");
        assert_eq!(config.rename.start, 1);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tidyup.json");
        std::fs::write(&path, r#"{ "rename": { "prefix": "img_" } }"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.rename.prefix, "img_");
        assert_eq!(config.rename.start, 1);
        assert_eq!(config.categories.len(), 6);
    }

    #[test]
    fn test_save_then_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tidyup.json");
        let mut config = AppConfig::default();
        config.fallback_category = "Misc".to_string();
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.fallback_category, "Misc");
        assert_eq!(loaded.categories, config.categories);
    }

    #[test]
    fn test_invalid_tables_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tidyup.json");
        std::fs::write(
            &path,
            r#"{ "categories": [ { "name": "A" }, { "name": "A" } ] }"#,
        )
        .unwrap();
        assert!(matches!(AppConfig::load(&path), Err(crate::TidyError::Config(_))));

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(AppConfig::load(&path), Err(crate::TidyError::Config(_))));
    }
}
