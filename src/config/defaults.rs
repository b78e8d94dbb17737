//! Default configuration constants.

/// Directory name used under the platform data/config roots.
pub(super) const APP_DIR_NAME: &str = "ragalite";
/// Config file name looked up locally and under the config root.
pub(super) const CONFIG_FILE_NAME: &str = "ragalite.toml";
/// Fallback data directory when the platform has no data root.
pub(super) const FALLBACK_DATA_DIR: &str = ".ragalite";

/// Categories offered to users who have none saved yet.
pub(super) fn default_categories() -> Vec<String> {
    ["academic", "social", "physical"]
        .into_iter()
        .map(str::to_string)
        .collect()
}
