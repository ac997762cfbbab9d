//! Local fallback cache - key-value byte store backed by snapshot files
//!
//! Two keys: the serialized roster snapshot and the serialized log snapshot.
//! Each is overwritten wholesale on every save (no incremental diffing).
//! Writes go through a temp file and rename so a crash mid-write never
//! leaves a torn snapshot behind.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::roster::Person;
use crate::types::{Result, RollbookError};

/// Cache key for the roster snapshot
pub const ROSTER_KEY: &str = "roster";
/// Cache key for the activity log snapshot
pub const LOG_KEY: &str = "activity_log";

/// File-backed key-value store under a cache directory
#[derive(Debug, Clone)]
pub struct LocalCache {
    dir: PathBuf,
}

impl LocalCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Read raw bytes for a key. Missing or unreadable keys are `None`.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        fs::read(self.key_path(key)).ok()
    }

    /// Write raw bytes for a key, atomically replacing any prior value
    pub fn set(&self, key: &str, bytes: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| RollbookError::Cache(format!("create {}: {e}", self.dir.display())))?;

        let tmp = self.dir.join(format!(".{key}.tmp"));
        fs::write(&tmp, bytes)
            .map_err(|e| RollbookError::Cache(format!("write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, self.key_path(key))
            .map_err(|e| RollbookError::Cache(format!("rename {key}: {e}")))?;

        debug!(key = key, bytes = bytes.len(), "Cache key written");
        Ok(())
    }

    /// Remove a key. Returns whether it existed.
    pub fn remove(&self, key: &str) -> bool {
        fs::remove_file(self.key_path(key)).is_ok()
    }

    /// Deserialize the cached roster snapshot, if present and well-formed
    pub fn load_roster(&self) -> Option<Vec<Person>> {
        let bytes = self.get(ROSTER_KEY)?;
        match serde_json::from_slice(&bytes) {
            Ok(roster) => Some(roster),
            Err(e) => {
                warn!(error = %e, "Cached roster snapshot is malformed, ignoring");
                None
            }
        }
    }

    /// Serialize and store the full roster snapshot
    pub fn save_roster(&self, roster: &[Person]) -> Result<()> {
        let bytes = serde_json::to_vec(roster)
            .map_err(|e| RollbookError::Cache(format!("serialize roster: {e}")))?;
        self.set(ROSTER_KEY, &bytes)
    }

    /// Deserialize the cached log snapshot, if present and well-formed
    pub fn load_log(&self) -> Option<Vec<String>> {
        let bytes = self.get(LOG_KEY)?;
        match serde_json::from_slice(&bytes) {
            Ok(log) => Some(log),
            Err(e) => {
                warn!(error = %e, "Cached log snapshot is malformed, ignoring");
                None
            }
        }
    }

    /// Serialize and store the full log snapshot
    pub fn save_log(&self, entries: &[String]) -> Result<()> {
        let bytes = serde_json::to_vec(entries)
            .map_err(|e| RollbookError::Cache(format!("serialize log: {e}")))?;
        self.set(LOG_KEY, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::default_roster;

    #[test]
    fn test_missing_keys_read_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path().join("nested"));
        assert!(cache.get(ROSTER_KEY).is_none());
        assert!(cache.load_roster().is_none());
        assert!(cache.load_log().is_none());
    }

    #[test]
    fn test_roster_snapshot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path());

        let mut roster = default_roster();
        roster[0].notes = "keeps up well".to_string();
        roster[1]
            .admin_notes
            .insert("Alice".to_string(), "watch this one".to_string());

        cache.save_roster(&roster).unwrap();
        let loaded = cache.load_roster().unwrap();
        assert_eq!(loaded, roster);
    }

    #[test]
    fn test_log_snapshot_overwrites_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path());

        cache.save_log(&["a".to_string(), "b".to_string()]).unwrap();
        cache.save_log(&["c".to_string()]).unwrap();
        assert_eq!(cache.load_log().unwrap(), vec!["c".to_string()]);
    }

    #[test]
    fn test_malformed_snapshot_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path());
        cache.set(ROSTER_KEY, b"not json at all").unwrap();
        assert!(cache.load_roster().is_none());
    }

    #[test]
    fn test_remove() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path());
        cache.save_log(&["x".to_string()]).unwrap();
        assert!(cache.remove(LOG_KEY));
        assert!(!cache.remove(LOG_KEY));
        assert!(cache.load_log().is_none());
    }
}
