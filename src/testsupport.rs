//! Shared test fixtures for console, store, and session test modules.

use crate::console::{Console, ReadOutcome};
use crate::error::ConsoleError;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary directory fixture with best-effort cleanup.
#[derive(Debug)]
pub struct TestTempDir {
    path: PathBuf,
}

impl TestTempDir {
    /// Create a unique temporary directory with a readable prefix.
    pub fn new(prefix: &str) -> Self {
        let suffix = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let dir = std::env::temp_dir().join(format!(
            "ragalite-{prefix}-{}-{millis}-{suffix}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).expect("failed to create temporary fixture directory");
        Self { path: dir }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write UTF-8 text to a child path, creating parent directories as needed.
    pub fn write_text(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directories for fixture");
        }
        fs::write(&path, content).expect("failed to write fixture file");
        path
    }
}

impl Drop for TestTempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Console fed from a fixed list of lines, recording everything written.
///
/// Returns `Eof` once the script is exhausted.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    lines: VecDeque<String>,
    transcript: String,
    lines_read: usize,
}

impl ScriptedConsole {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Everything written so far.
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// Lines consumed so far (EOF reads are not counted).
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// Lines not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self) -> Result<ReadOutcome, ConsoleError> {
        match self.lines.pop_front() {
            Some(line) => {
                self.lines_read += 1;
                Ok(ReadOutcome::Line(line))
            }
            None => Ok(ReadOutcome::Eof),
        }
    }

    fn write(&mut self, text: &str) -> Result<(), ConsoleError> {
        self.transcript.push_str(text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_dir_fixture_writes_and_resolves_paths() {
        let fixture = TestTempDir::new("fixture");
        let file = fixture.write_text("nested/file.txt", "hello");
        assert_eq!(fs::read_to_string(file).unwrap(), "hello");
    }

    #[test]
    fn scripted_console_replays_then_hits_eof() {
        let mut console = ScriptedConsole::new(["one", "two"]);
        assert_eq!(console.prompt("> ").unwrap(), "one");
        assert_eq!(console.read_line().unwrap(), ReadOutcome::Line("two".into()));
        assert_eq!(console.read_line().unwrap(), ReadOutcome::Eof);
        assert_eq!(console.lines_read(), 2);
        assert_eq!(console.remaining(), 0);
        assert_eq!(console.transcript(), "> ");
    }
}
