//! Recently-viewed history with watched marks, persisted as JSON through a
//! pluggable storage backend.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::catalog::Video;

/// Storage key the history list lives under.
pub const HISTORY_KEY: &str = "history";

/// Most recent entries kept; older ones fall off the end.
pub const MAX_HISTORY_SIZE: usize = 5;

// --- Backends ---

/// Keyed text storage. One value per key, read back whole or not at all.
pub trait StorageBackend {
  /// Read the value under `key`. Missing and unreadable both come back `None`.
  fn read(&self, key: &str) -> Option<String>;
  fn write(&mut self, key: &str, value: &str) -> Result<()>;
  fn remove(&mut self, key: &str);
}

/// Backend keeping one `<key>.json` file per key under the platform data dir.
pub struct FileBackend {
  dir: Option<PathBuf>,
}

impl FileBackend {
  pub fn new() -> Self {
    Self { dir: ProjectDirs::from("", "", "vguide").map(|d| d.data_dir().to_path_buf()) }
  }

  #[cfg(test)]
  fn at(dir: PathBuf) -> Self {
    Self { dir: Some(dir) }
  }

  fn path(&self, key: &str) -> Option<PathBuf> {
    self.dir.as_ref().map(|d| d.join(format!("{}.json", key)))
  }
}

impl StorageBackend for FileBackend {
  fn read(&self, key: &str) -> Option<String> {
    std::fs::read_to_string(self.path(key)?).ok()
  }

  fn write(&mut self, key: &str, value: &str) -> Result<()> {
    let Some(path) = self.path(key) else {
      return Err(anyhow!("No data directory available"));
    };
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&path, value).with_context(|| format!("Failed to write {}", path.display()))
  }

  fn remove(&mut self, key: &str) {
    if let Some(path) = self.path(key) {
      let _ = std::fs::remove_file(path);
    }
  }
}

/// In-memory backend for tests.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryBackend {
  map: std::collections::HashMap<String, String>,
  pub fail_writes: bool,
}

#[cfg(test)]
impl StorageBackend for MemoryBackend {
  fn read(&self, key: &str) -> Option<String> {
    self.map.get(key).cloned()
  }

  fn write(&mut self, key: &str, value: &str) -> Result<()> {
    if self.fail_writes {
      return Err(anyhow!("writes disabled"));
    }
    self.map.insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn remove(&mut self, key: &str) {
    self.map.remove(key);
  }
}

// --- Store ---

/// A video the user opened, newest first in the list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
  pub video: Video,
  #[serde(default)]
  pub watched: bool,
  pub viewed_at: DateTime<Utc>,
}

/// Bounded most-recent-first history of opened videos.
///
/// Every mutating call writes through to the backend before returning, so
/// memory and storage never drift apart. Write failures are logged and the
/// in-memory change kept; history is never worth failing an action over.
pub struct HistoryStore {
  backend: Box<dyn StorageBackend>,
  entries: Vec<HistoryEntry>,
  max_entries: usize,
}

impl HistoryStore {
  /// Open the store, reading whatever the backend has. Missing or
  /// undecodable data starts the history empty.
  pub fn open(backend: Box<dyn StorageBackend>, max_entries: usize) -> Self {
    let entries = match backend.read(HISTORY_KEY) {
      Some(raw) => match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
        Ok(entries) => entries,
        Err(e) => {
          warn!(err = %e, "history: stored data undecodable, starting empty");
          Vec::new()
        }
      },
      None => Vec::new(),
    };
    debug!(count = entries.len(), "history loaded");
    Self { backend, entries, max_entries }
  }

  pub fn entries(&self) -> &[HistoryEntry] {
    &self.entries
  }

  /// Record a view. The video moves to (or enters at) the front; its watched
  /// mark survives the move, and brand-new entries start unwatched.
  pub fn add(&mut self, video: &Video) -> &[HistoryEntry] {
    let watched =
      self.entries.iter().find(|e| e.video.public_id == video.public_id).map(|e| e.watched).unwrap_or(false);
    self.entries.retain(|e| e.video.public_id != video.public_id);
    self.entries.insert(0, HistoryEntry { video: video.clone(), watched, viewed_at: Utc::now() });
    self.entries.truncate(self.max_entries);
    self.persist();
    &self.entries
  }

  /// Flip the watched mark on `public_id`. Unknown ids are ignored.
  pub fn toggle_watched(&mut self, public_id: &str) -> &[HistoryEntry] {
    if let Some(entry) = self.entries.iter_mut().find(|e| e.video.public_id == public_id) {
      entry.watched = !entry.watched;
      self.persist();
    }
    &self.entries
  }

  /// Drop every entry, in memory and in storage.
  pub fn clear(&mut self) {
    self.entries.clear();
    self.backend.remove(HISTORY_KEY);
  }

  fn persist(&mut self) {
    match serde_json::to_string(&self.entries) {
      Ok(raw) => {
        if let Err(e) = self.backend.write(HISTORY_KEY, &raw) {
          warn!(err = %e, "history: write failed, keeping in-memory state");
        }
      }
      Err(e) => {
        warn!(err = %e, "history: encode failed");
      }
    }
  }

  #[cfg(test)]
  fn backend(&self) -> &dyn StorageBackend {
    self.backend.as_ref()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn make_video(id: &str) -> Video {
    Video { public_id: id.to_string(), format: "mp4".to_string(), version: 1, context: None }
  }

  fn store() -> HistoryStore {
    HistoryStore::open(Box::new(MemoryBackend::default()), MAX_HISTORY_SIZE)
  }

  fn ids(store: &HistoryStore) -> Vec<&str> {
    store.entries().iter().map(|e| e.video.public_id.as_str()).collect()
  }

  // --- add ---

  #[test]
  fn add_puts_newest_first() {
    let mut store = store();
    store.add(&make_video("a"));
    store.add(&make_video("b"));
    store.add(&make_video("c"));
    assert_eq!(ids(&store), ["c", "b", "a"]);
  }

  #[test]
  fn add_dedupes_and_moves_to_front() {
    let mut store = store();
    store.add(&make_video("a"));
    store.add(&make_video("b"));
    store.add(&make_video("a"));
    assert_eq!(ids(&store), ["a", "b"]);
  }

  #[test]
  fn add_starts_entries_unwatched() {
    let mut store = store();
    store.add(&make_video("a"));
    assert!(!store.entries()[0].watched);
  }

  #[test]
  fn readd_preserves_the_watched_mark() {
    let mut store = store();
    store.add(&make_video("a"));
    store.toggle_watched("a");
    store.add(&make_video("b"));
    store.add(&make_video("a"));
    assert_eq!(ids(&store), ["a", "b"]);
    assert!(store.entries()[0].watched);
    assert!(!store.entries()[1].watched);
  }

  #[test]
  fn oldest_entry_falls_off_at_capacity() {
    let mut store = HistoryStore::open(Box::new(MemoryBackend::default()), 2);
    store.add(&make_video("a"));
    store.add(&make_video("b"));
    store.add(&make_video("c"));
    assert_eq!(ids(&store), ["c", "b"]);
  }

  // --- toggle_watched ---

  #[test]
  fn toggle_flips_and_flips_back() {
    let mut store = store();
    store.add(&make_video("a"));
    store.toggle_watched("a");
    assert!(store.entries()[0].watched);
    store.toggle_watched("a");
    assert!(!store.entries()[0].watched);
  }

  #[test]
  fn toggle_unknown_id_is_a_noop() {
    let mut store = store();
    store.add(&make_video("a"));
    store.toggle_watched("nope");
    assert_eq!(ids(&store), ["a"]);
    assert!(!store.entries()[0].watched);
  }

  // --- persistence ---

  fn persisted(store: &HistoryStore) -> Option<Vec<HistoryEntry>> {
    store.backend().read(HISTORY_KEY).map(|raw| serde_json::from_str(&raw).unwrap())
  }

  #[test]
  fn every_mutation_writes_through() {
    let mut store = store();
    store.add(&make_video("a"));
    store.add(&make_video("b"));
    let stored = persisted(&store).unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].video.public_id, "b");

    store.toggle_watched("a");
    let stored = persisted(&store).unwrap();
    assert!(stored[1].watched);
  }

  #[test]
  fn clear_empties_memory_and_removes_the_key() {
    let mut store = store();
    store.add(&make_video("a"));
    store.clear();
    assert!(store.entries().is_empty());
    assert!(persisted(&store).is_none());
  }

  #[test]
  fn open_reads_back_persisted_entries() {
    let mut backend = MemoryBackend::default();
    {
      let mut seed = HistoryStore::open(Box::new(MemoryBackend::default()), MAX_HISTORY_SIZE);
      seed.add(&make_video("a"));
      seed.toggle_watched("a");
      seed.add(&make_video("b"));
      let raw = seed.backend().read(HISTORY_KEY).unwrap();
      backend.write(HISTORY_KEY, &raw).unwrap();
    }
    let store = HistoryStore::open(Box::new(backend), MAX_HISTORY_SIZE);
    assert_eq!(ids(&store), ["b", "a"]);
    assert!(store.entries()[1].watched);
  }

  #[test]
  fn corrupt_data_starts_empty() {
    let mut backend = MemoryBackend::default();
    backend.write(HISTORY_KEY, "not json at all").unwrap();
    let store = HistoryStore::open(Box::new(backend), MAX_HISTORY_SIZE);
    assert!(store.entries().is_empty());
  }

  #[test]
  fn write_failure_keeps_the_in_memory_change() {
    let backend = MemoryBackend { fail_writes: true, ..Default::default() };
    let mut store = HistoryStore::open(Box::new(backend), MAX_HISTORY_SIZE);
    store.add(&make_video("a"));
    assert_eq!(ids(&store), ["a"]);
    assert!(store.backend().read(HISTORY_KEY).is_none());
  }

  // --- FileBackend ---

  #[test]
  fn file_backend_round_trips_through_disk() {
    let dir = std::env::temp_dir().join(format!("vguide-test-{}", std::process::id()));
    let mut backend = FileBackend::at(dir.clone());
    backend.write(HISTORY_KEY, "[]").unwrap();
    assert_eq!(backend.read(HISTORY_KEY).as_deref(), Some("[]"));
    backend.remove(HISTORY_KEY);
    assert!(backend.read(HISTORY_KEY).is_none());
    let _ = std::fs::remove_dir_all(dir);
  }
}
