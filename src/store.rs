//! Per-user activity state stored under `<data_dir>/users/<name>/`.
//!
//! Each collection lives in its own JSON file wrapped in a versioned envelope
//! carrying a SHA-256 checksum of the items. Loading never fails: a missing
//! file yields the default, and a damaged one is reported, copied aside to a
//! `.bak` file, and replaced by the default. Saving overwrites both files.

use crate::error::StoreError;
use crate::model::{Activity, ActivityBook};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Subdirectory of the data root holding one directory per user.
const USERS_DIR: &str = "users";
const ACTIVITIES_FILE: &str = "activities.json";
const CATEGORIES_FILE: &str = "categories.json";
/// On-disk schema version for [`Envelope`].
pub const STATE_FILE_VERSION: u32 = 1;

/// On-disk payload shape for one collection.
///
/// `version` is checked on the raw JSON before this typed decode.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    /// Hex SHA-256 of the compact JSON encoding of `items`.
    checksum: String,
    items: Vec<T>,
}

/// Borrowed counterpart of [`Envelope`] used when writing.
#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    checksum: String,
    items: &'a [T],
}

/// Why a state file could not be used as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadIssue {
    /// No file yet (first run for this user).
    Missing,
    Unreadable(String),
    Malformed(String),
    UnsupportedVersion(u32),
    ChecksumMismatch,
}

impl fmt::Display for LoadIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "no saved state"),
            Self::Unreadable(e) => write!(f, "unreadable: {e}"),
            Self::Malformed(e) => write!(f, "malformed: {e}"),
            Self::UnsupportedVersion(v) => write!(f, "unsupported file version {v}"),
            Self::ChecksumMismatch => write!(f, "checksum mismatch"),
        }
    }
}

/// One file that fell back to its default during load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub path: PathBuf,
    pub issue: LoadIssue,
    /// Copy of the damaged file, when one was made.
    pub backup: Option<PathBuf>,
}

/// A user's state plus everything that went wrong reading it.
#[derive(Debug, Clone)]
pub struct LoadedUser {
    pub book: ActivityBook,
    pub reports: Vec<LoadReport>,
}

impl LoadedUser {
    /// True when neither file existed.
    pub fn is_new(&self) -> bool {
        self.reports.len() == 2 && self.reports.iter().all(|r| r.issue == LoadIssue::Missing)
    }

    /// Reports other than plain missing files.
    pub fn problems(&self) -> impl Iterator<Item = &LoadReport> {
        self.reports.iter().filter(|r| r.issue != LoadIssue::Missing)
    }
}

/// Filesystem-backed storage for per-user state.
#[derive(Debug, Clone)]
pub struct UserStore {
    users_dir: PathBuf,
}

impl UserStore {
    /// Store rooted under `data_dir`; directories are created on first save.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            users_dir: data_dir.as_ref().join(USERS_DIR),
        }
    }

    /// Load `username`'s state, substituting defaults for unusable files.
    pub fn load(
        &self,
        username: &str,
        default_categories: &[String],
    ) -> Result<LoadedUser, StoreError> {
        let dir = self.user_dir(username)?;
        let mut reports = Vec::new();

        let activities =
            load_items::<Activity>(&dir.join(ACTIVITIES_FILE), &mut reports).unwrap_or_default();
        let categories = load_items::<String>(&dir.join(CATEGORIES_FILE), &mut reports)
            .unwrap_or_else(|| default_categories.to_vec());

        tracing::info!(
            user = username,
            activities = activities.len(),
            categories = categories.len(),
            "loaded user state"
        );
        Ok(LoadedUser {
            book: ActivityBook::new(activities, categories),
            reports,
        })
    }

    /// Persist `book`, overwriting any previous state for `username`.
    pub fn save(&self, username: &str, book: &ActivityBook) -> Result<(), StoreError> {
        let dir = self.user_dir(username)?;
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        write_items(&dir.join(ACTIVITIES_FILE), book.activities())?;
        write_items(&dir.join(CATEGORIES_FILE), book.categories())?;
        tracing::info!(user = username, "saved user state");
        Ok(())
    }

    /// Directory holding `username`'s files.
    pub fn user_dir(&self, username: &str) -> Result<PathBuf, StoreError> {
        validate_username(username).map_err(StoreError::InvalidUsername)?;
        Ok(self.users_dir.join(username))
    }
}

/// Validate a username before it becomes a directory name.
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("username cannot be empty".to_string());
    }
    if username == "." || username == ".." {
        return Err("username cannot be '.' or '..'".to_string());
    }
    if username
        .chars()
        .any(|ch| !(ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.'))
    {
        return Err("username can only contain ASCII letters, numbers, '.', '-', '_'".to_string());
    }
    Ok(())
}

fn checksum<T: Serialize>(items: &[T]) -> Result<String, serde_json::Error> {
    let encoded = serde_json::to_vec(items)?;
    Ok(format!("{:x}", Sha256::digest(&encoded)))
}

/// Read one collection, recording a report and returning `None` on any issue.
fn load_items<T>(path: &Path, reports: &mut Vec<LoadReport>) -> Option<Vec<T>>
where
    T: Serialize + DeserializeOwned,
{
    let issue = match decode_file::<T>(path) {
        Ok(items) => return Some(items),
        Err(issue) => issue,
    };

    let backup = if issue == LoadIssue::Missing {
        None
    } else {
        tracing::warn!(path = %path.display(), %issue, "discarding damaged state file");
        preserve_damaged(path)
    };
    reports.push(LoadReport {
        path: path.to_path_buf(),
        issue,
        backup,
    });
    None
}

fn decode_file<T>(path: &Path) -> Result<Vec<T>, LoadIssue>
where
    T: Serialize + DeserializeOwned,
{
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(LoadIssue::Missing),
        Err(e) => return Err(LoadIssue::Unreadable(e.to_string())),
    };
    let value: serde_json::Value =
        serde_json::from_str(&raw).map_err(|e| LoadIssue::Malformed(e.to_string()))?;
    // Check the version before the typed decode so future schemas are
    // reported as such rather than as malformed.
    let version = value
        .get("version")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| LoadIssue::Malformed("missing version".to_string()))?;
    if version != u64::from(STATE_FILE_VERSION) {
        return Err(LoadIssue::UnsupportedVersion(
            u32::try_from(version).unwrap_or(u32::MAX),
        ));
    }
    let envelope: Envelope<T> =
        serde_json::from_value(value).map_err(|e| LoadIssue::Malformed(e.to_string()))?;
    let expected = checksum(&envelope.items).map_err(|e| LoadIssue::Malformed(e.to_string()))?;
    if expected != envelope.checksum {
        return Err(LoadIssue::ChecksumMismatch);
    }
    Ok(envelope.items)
}

fn write_items<T: Serialize>(path: &Path, items: &[T]) -> Result<(), StoreError> {
    let envelope = EnvelopeRef {
        version: STATE_FILE_VERSION,
        checksum: checksum(items)?,
        items,
    };
    let json = serde_json::to_vec_pretty(&envelope)?;
    // Write to a sibling temporary file first so a partial write never
    // replaces the last good state.
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, json).map_err(|source| StoreError::Io {
        path: tmp_path.clone(),
        source,
    })?;
    fs::rename(&tmp_path, path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Copy a damaged file next to itself so the next save cannot destroy it.
fn preserve_damaged(path: &Path) -> Option<PathBuf> {
    let backup = timestamped_backup_path(path);
    match fs::copy(path, &backup) {
        Ok(_) => Some(backup),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to back up damaged state file");
            None
        }
    }
}

/// Build a non-colliding backup path in the same directory as `path`.
fn timestamped_backup_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|value| value.to_string_lossy().into_owned())
        .unwrap_or_else(|| "state.json".to_string());
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    for suffix in 0..1000usize {
        let candidate_name = if suffix == 0 {
            format!("{file_name}.{timestamp}.bak")
        } else {
            format!("{file_name}.{timestamp}.{suffix}.bak")
        };
        let candidate = path.with_file_name(candidate_name);
        if !candidate.exists() {
            return candidate;
        }
    }
    path.with_file_name(format!(
        "{file_name}.{timestamp}.{}.bak",
        std::process::id()
    ))
}
