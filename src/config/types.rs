//! Configuration data model.
//!
//! `FileConfig` mirrors the TOML layout; `Config` is the resolved runtime view
//! produced by the loader in `config::mod`.

use serde::Deserialize;
use std::path::PathBuf;

use super::defaults::default_categories;

/// Top-level runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root under which per-user state directories live.
    pub data_dir: PathBuf,
    /// Categories given to users with no saved category list.
    pub default_categories: Vec<String>,
    pub display: DisplayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: super::default_data_dir(),
            default_categories: default_categories(),
            display: DisplayConfig::default(),
        }
    }
}

/// Display / rendering preferences.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Style welcome, warning, and farewell lines.
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

/// `[storage]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct StorageConfig {
    pub(super) data_dir: Option<String>,
}

/// `[categories]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(super) struct CategoriesConfig {
    pub(super) defaults: Vec<String>,
}

impl Default for CategoriesConfig {
    fn default() -> Self {
        Self {
            defaults: default_categories(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(super) struct FileConfig {
    pub(super) storage: StorageConfig,
    pub(super) categories: CategoriesConfig,
    pub(super) display: DisplayConfig,
}
