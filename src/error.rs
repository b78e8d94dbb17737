//! Unified error types for the tracker.

use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// ConsoleError
// ---------------------------------------------------------------------------

/// Errors raised by the console collaborator.
#[derive(Debug)]
pub enum ConsoleError {
    /// No more input lines are available.
    EndOfInput,
    /// Reading or writing the underlying streams failed.
    Io(std::io::Error),
}

impl ConsoleError {
    /// True when the error only signals exhausted input.
    pub fn is_end_of_input(&self) -> bool {
        matches!(self, Self::EndOfInput)
    }
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndOfInput => write!(f, "end of input"),
            Self::Io(e) => write!(f, "console io: {e}"),
        }
    }
}

impl std::error::Error for ConsoleError {}

impl From<std::io::Error> for ConsoleError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

/// Errors from the per-user state store.
#[derive(Debug)]
pub enum StoreError {
    /// The username cannot be used as a directory name.
    InvalidUsername(String),
    /// Filesystem failure at a specific path.
    Io { path: PathBuf, source: std::io::Error },
    /// Encoding the state envelope failed.
    Encode(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUsername(msg) => write!(f, "invalid username: {msg}"),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Encode(e) => write!(f, "encode: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Encode(e)
    }
}

// ---------------------------------------------------------------------------
// RegistryError
// ---------------------------------------------------------------------------

/// Configuration-time errors when binding command names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Command names must be non-empty.
    EmptyName,
    /// The name differs only in case from an existing binding.
    Ambiguous { name: String, existing: String },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "command name cannot be empty"),
            Self::Ambiguous { name, existing } => {
                write!(f, "command `{name}` is ambiguous with `{existing}`")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

// ---------------------------------------------------------------------------
// AppError (top-level)
// ---------------------------------------------------------------------------

/// Top-level error type for the program.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Console(ConsoleError),
    Registry(RegistryError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Console(e) => write!(f, "console: {e}"),
            Self::Registry(e) => write!(f, "registry: {e}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<ConsoleError> for AppError {
    fn from(e: ConsoleError) -> Self {
        Self::Console(e)
    }
}

impl From<RegistryError> for AppError {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}
