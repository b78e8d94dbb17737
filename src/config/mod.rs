//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. Environment variables (`RAGALITE_DATA_DIR`, `RAGALITE_NO_COLOR`, `NO_COLOR`)
//! 2. TOML file specified via --config CLI flag
//! 3. ./ragalite.toml in the current directory
//! 4. $XDG_CONFIG_HOME/ragalite/ragalite.toml (or ~/.config/ragalite/ragalite.toml)
//! 5. Built-in defaults

use crate::error::ConfigError;
use std::path::{Path, PathBuf};

mod defaults;
mod types;

use defaults::{APP_DIR_NAME, CONFIG_FILE_NAME, FALLBACK_DATA_DIR};
use types::FileConfig;
pub use types::{Config, DisplayConfig};

/// Where the effective config text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Config loaded from explicit `--config` path.
    Explicit(PathBuf),
    /// Config loaded from `./ragalite.toml`.
    Local,
    /// Config loaded from the per-user config directory.
    Global(PathBuf),
    /// No file found; built-in defaults were used.
    BuiltInDefaults,
}

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from --config flag).
pub fn load_config(path_override: Option<&str>) -> Result<Config, ConfigError> {
    Ok(load_config_with_source(path_override)?.0)
}

/// Load configuration and report which file supplied it.
pub fn load_config_with_source(
    path_override: Option<&str>,
) -> Result<(Config, ConfigSource), ConfigError> {
    load_config_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        config_root_dir,
    )
}

fn load_config_from_sources<FRead, FEnv, FRoot>(
    path_override: Option<&str>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
) -> Result<(Config, ConfigSource), ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let (config_text, source) =
        read_config_text_with_sources(path_override, &read_file, &config_root)?;
    let parsed: FileConfig = toml::from_str(&config_text)?;
    let mut config = resolve_file_config(parsed)?;
    apply_env_overrides(&mut config, &env_lookup)?;
    tracing::debug!(?source, data_dir = %config.data_dir.display(), "configuration loaded");
    Ok((config, source))
}

/// Read config text from the highest-precedence available source.
fn read_config_text_with_sources<FRead, FRoot>(
    path_override: Option<&str>,
    read_file: &FRead,
    config_root: &FRoot,
) -> Result<(String, ConfigSource), ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FRoot: Fn() -> Option<PathBuf>,
{
    // An explicit path must exist; a missing one is an error, not a fallback.
    if let Some(p) = path_override {
        let path = PathBuf::from(p);
        let text = read_file(&path)?;
        return Ok((text, ConfigSource::Explicit(path)));
    }

    if let Ok(text) = read_file(Path::new(CONFIG_FILE_NAME)) {
        return Ok((text, ConfigSource::Local));
    }
    if let Some(dir) = config_root() {
        let global = dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME);
        if let Ok(text) = read_file(&global) {
            return Ok((text, ConfigSource::Global(global)));
        }
    }

    Ok((String::new(), ConfigSource::BuiltInDefaults))
}

fn resolve_file_config(file: FileConfig) -> Result<Config, ConfigError> {
    let data_dir = match file.storage.data_dir {
        Some(dir) => parse_data_dir(&dir, "storage.data_dir")?,
        None => default_data_dir(),
    };
    Ok(Config {
        data_dir,
        default_categories: normalize_categories(file.categories.defaults),
        display: file.display,
    })
}

fn apply_env_overrides<FEnv>(config: &mut Config, env_lookup: &FEnv) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(dir) = env_lookup("RAGALITE_DATA_DIR") {
        config.data_dir = parse_data_dir(&dir, "RAGALITE_DATA_DIR")?;
    }
    let no_color = ["RAGALITE_NO_COLOR", "NO_COLOR"]
        .iter()
        .any(|name| env_lookup(name).is_some_and(|v| !v.trim().is_empty()));
    if no_color {
        config.display.color = false;
    }
    Ok(())
}

fn parse_data_dir(raw: &str, origin: &str) -> Result<PathBuf, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{origin} cannot be empty")));
    }
    Ok(PathBuf::from(trimmed))
}

/// Trim, drop blanks, and drop case-insensitive duplicates, keeping order.
fn normalize_categories(raw: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for category in raw {
        let trimmed = category.trim();
        if trimmed.is_empty() {
            continue;
        }
        let folded = trimmed.to_lowercase();
        if out.iter().any(|c| c.to_lowercase() == folded) {
            continue;
        }
        out.push(trimmed.to_string());
    }
    out
}

/// Default state root (`$XDG_DATA_HOME/ragalite` or platform equivalent).
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
}

/// Resolve the base config directory from env/home conventions.
pub fn config_root_dir() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".config"))
        .or_else(dirs::config_dir)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
