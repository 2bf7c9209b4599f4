use std::fs;
use std::path::PathBuf;

use chrono::Utc;

use crate::io::image_io::ImageError;
use crate::io::paths::DataDir;
use crate::model::journal::Journal;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not encode record: {0}")]
    EncodeError(#[from] serde_json::Error),
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Whole-collection store for journal entries.
///
/// The collection is one JSON array in `journal.json`; every mutation
/// loads the full collection, mutates it in memory and rewrites the file.
pub struct JournalStore {
    path: PathBuf,
}

impl JournalStore {
    pub fn new(dir: &DataDir) -> Self {
        JournalStore {
            path: dir.journal_file(),
        }
    }

    /// Load the full ordered collection.
    ///
    /// A missing file yields an empty collection. A decode failure also
    /// yields an empty collection — the failure is logged and the corrupt
    /// file is set aside as `journal.json.bak` first.
    pub fn load(&self) -> Vec<Journal> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("could not read {}: {}", self.path.display(), e);
                }
                return Vec::new();
            }
        };
        match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                crate::io::set_aside_corrupt(&self.path, &e);
                Vec::new()
            }
        }
    }

    /// Serialize the entire collection and atomically replace the file.
    pub fn save(&self, entries: &[Journal]) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(entries)?;
        crate::io::atomic_write(&self.path, content.as_bytes()).map_err(|e| {
            StoreError::WriteError {
                path: self.path.clone(),
                source: e,
            }
        })
    }

    /// Insert or replace by id.
    ///
    /// A matching id replaces the record and refreshes its `updated_at`;
    /// an unknown id appends the entry unchanged. Returns the stored
    /// entry.
    pub fn upsert(&self, mut entry: Journal) -> Result<Journal, StoreError> {
        let mut entries = self.load();
        match entries.iter().position(|e| e.id == entry.id) {
            Some(idx) => {
                entry.updated_at = Utc::now();
                entries[idx] = entry.clone();
            }
            None => entries.push(entry.clone()),
        }
        self.save(&entries)?;
        Ok(entry)
    }

    /// Remove the entry with the given id, returning it for cascade
    /// cleanup. An unknown id is a no-op returning `None` (no write).
    pub fn remove(&self, id: &str) -> Result<Option<Journal>, StoreError> {
        let mut entries = self.load();
        let Some(idx) = entries.iter().position(|e| e.id == id) else {
            return Ok(None);
        };
        let removed = entries.remove(idx);
        self.save(&entries)?;
        Ok(Some(removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(tmp: &TempDir) -> JournalStore {
        let dir = DataDir::new(tmp.path());
        dir.ensure_layout().unwrap();
        JournalStore::new(&dir)
    }

    fn entry(title: &str) -> Journal {
        let mut e = Journal::new();
        e.title = Some(title.to_string());
        e
    }

    #[test]
    fn load_missing_file_returns_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(store(&tmp).load().is_empty());
    }

    #[test]
    fn save_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let entries = vec![entry("one"), entry("two")];
        store.save(&entries).unwrap();
        assert_eq!(store.load(), entries);
    }

    #[test]
    fn load_corrupt_file_returns_empty_and_sets_aside() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        fs::write(&store.path, "not json {{{").unwrap();
        assert!(store.load().is_empty());
        assert!(store.path.with_extension("json.bak").exists());
    }

    #[test]
    fn upsert_unknown_id_appends() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        store.upsert(entry("one")).unwrap();
        let stored = store.upsert(entry("two")).unwrap();
        let entries = store.load();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1], stored);
    }

    #[test]
    fn upsert_known_id_replaces_and_refreshes_updated_at() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let original = store.upsert(entry("draft")).unwrap();

        std::thread::sleep(std::time::Duration::from_millis(5));
        let mut edited = original.clone();
        edited.title = Some("final".to_string());
        let stored = store.upsert(edited).unwrap();

        let entries = store.load();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title.as_deref(), Some("final"));
        assert_eq!(entries[0].created_at, original.created_at);
        assert!(stored.updated_at > original.updated_at);
    }

    #[test]
    fn remove_returns_entry_and_filters_collection() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let keep = store.upsert(entry("keep")).unwrap();
        let gone = store.upsert(entry("gone")).unwrap();

        let removed = store.remove(&gone.id).unwrap().unwrap();
        assert_eq!(removed.id, gone.id);

        let entries = store.load();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, keep.id);
    }

    #[test]
    fn remove_unknown_id_is_a_no_op() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        store.upsert(entry("only")).unwrap();
        assert!(store.remove("no-such-id").unwrap().is_none());
        assert_eq!(store.load().len(), 1);
    }
}
