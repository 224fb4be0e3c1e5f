use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::WallPolicy;

const APP_DIR_NAME: &str = "snake-evolution";
const STATE_FILE_NAME: &str = "state.json";

/// Durable high score (and wall setting) storage.
///
/// Implementations never fail outward: an unavailable backend behaves like
/// one with nothing stored.
pub trait ScoreStore: fmt::Debug {
    fn high_score(&self) -> u32;

    /// Records `score`; ignored unless it beats the stored value.
    fn set_high_score(&mut self, score: u32);

    fn wall_policy(&self) -> Option<WallPolicy> {
        None
    }

    fn set_wall_policy(&mut self, _policy: WallPolicy) {}
}

/// In-memory store for tests and headless runs.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct MemoryStore {
    high_score: u32,
    wall_policy: Option<WallPolicy>,
}

impl MemoryStore {
    #[must_use]
    pub fn with_high_score(high_score: u32) -> Self {
        Self {
            high_score,
            wall_policy: None,
        }
    }
}

impl ScoreStore for MemoryStore {
    fn high_score(&self) -> u32 {
        self.high_score
    }

    fn set_high_score(&mut self, score: u32) {
        self.high_score = self.high_score.max(score);
    }

    fn wall_policy(&self) -> Option<WallPolicy> {
        self.wall_policy
    }

    fn set_wall_policy(&mut self, policy: WallPolicy) {
        self.wall_policy = Some(policy);
    }
}

/// Failures inside [`FileStore`]; logged, never surfaced to the game.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state file i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("state file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(default)]
    high_score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    wall_policy: Option<WallPolicy>,
}

/// JSON file store, cached in memory and rewritten on every change.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    state: StateFile,
}

/// Returns the platform-correct state file path.
#[must_use]
pub fn state_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(STATE_FILE_NAME);
    base
}

impl FileStore {
    /// Opens the store at the platform default location.
    #[must_use]
    pub fn open_default() -> Self {
        Self::open(state_path())
    }

    /// Opens the store at `path`, falling back to empty state when the file
    /// is missing or unreadable.
    #[must_use]
    pub fn open(path: PathBuf) -> Self {
        let state = match load_state(&path) {
            Ok(state) => state,
            Err(error) => {
                warn!("ignoring stored state at {}: {error}", path.display());
                StateFile::default()
            }
        };

        Self { path, state }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) {
        if let Err(error) = save_state(&self.path, self.state) {
            warn!("failed to save state to {}: {error}", self.path.display());
        }
    }
}

impl ScoreStore for FileStore {
    fn high_score(&self) -> u32 {
        self.state.high_score
    }

    fn set_high_score(&mut self, score: u32) {
        if score <= self.state.high_score {
            return;
        }
        self.state.high_score = score;
        self.persist();
    }

    fn wall_policy(&self) -> Option<WallPolicy> {
        self.state.wall_policy
    }

    fn set_wall_policy(&mut self, policy: WallPolicy) {
        if self.state.wall_policy == Some(policy) {
            return;
        }
        self.state.wall_policy = Some(policy);
        self.persist();
    }
}

fn load_state(path: &Path) -> Result<StateFile, StoreError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(StateFile::default()),
        Err(e) => return Err(e.into()),
    };

    Ok(serde_json::from_str(&raw)?)
}

fn save_state(path: &Path, state: StateFile) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(&state)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use crate::config::WallPolicy;

    use super::{FileStore, MemoryStore, ScoreStore};

    #[test]
    fn memory_store_never_lowers_high_score() {
        let mut store = MemoryStore::with_high_score(10);

        store.set_high_score(4);
        assert_eq!(store.high_score(), 10);

        store.set_high_score(12);
        assert_eq!(store.high_score(), 12);
    }

    #[test]
    fn file_store_persists_across_reopen() {
        let path = unique_test_path("persist");

        let mut store = FileStore::open(path.clone());
        store.set_high_score(42);
        store.set_wall_policy(WallPolicy::Wrapping);

        let reopened = FileStore::open(path.clone());
        assert_eq!(reopened.high_score(), 42);
        assert_eq!(reopened.wall_policy(), Some(WallPolicy::Wrapping));

        cleanup_test_path(&path);
    }

    #[test]
    fn missing_state_file_reads_as_empty() {
        let path = unique_test_path("missing");

        let store = FileStore::open(path);
        assert_eq!(store.high_score(), 0);
        assert_eq!(store.wall_policy(), None);
    }

    #[test]
    fn malformed_state_file_reads_as_empty() {
        let path = unique_test_path("malformed");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(&path, "not-json").expect("test file write should succeed");

        let store = FileStore::open(path.clone());
        assert_eq!(store.high_score(), 0);

        cleanup_test_path(&path);
    }

    #[test]
    fn legacy_file_without_wall_policy_loads() {
        let path = unique_test_path("legacy");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(&path, r#"{ "high_score": 7 }"#).expect("test file write should succeed");

        let store = FileStore::open(path.clone());
        assert_eq!(store.high_score(), 7);
        assert_eq!(store.wall_policy(), None);

        cleanup_test_path(&path);
    }

    fn unique_test_path(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();

        std::env::temp_dir()
            .join("snake-evolution-store-tests")
            .join(format!("{label}-{nanos}.json"))
    }

    fn cleanup_test_path(path: &PathBuf) {
        let _ = fs::remove_file(path);
        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir(parent);
        }
    }
}
