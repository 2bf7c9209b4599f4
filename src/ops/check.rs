use std::collections::HashSet;

use serde::Serialize;

use crate::io::image_io::ImageStore;
use crate::io::journal_io::JournalStore;
use crate::io::profile_io::ProfileStore;

/// Read-only integrity report over the stored data.
#[derive(Debug, Default, Serialize)]
pub struct CheckReport {
    /// Ids appearing on more than one record. Upsert only ever touches
    /// the first match, so duplicates indicate an external edit.
    pub duplicate_ids: Vec<String>,
    /// Image references whose file is gone (renders as a placeholder).
    pub missing_images: Vec<MissingImage>,
    /// Entries where `updatedAt` predates `createdAt`.
    pub timestamp_violations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MissingImage {
    pub entry_id: String,
    pub filename: String,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.duplicate_ids.is_empty()
            && self.missing_images.is_empty()
            && self.timestamp_violations.is_empty()
    }
}

/// Validate the stored data without modifying it.
pub fn check(journal: &JournalStore, profile: &ProfileStore, images: &ImageStore) -> CheckReport {
    let entries = journal.load();
    let mut report = CheckReport::default();

    let mut seen: HashSet<&str> = HashSet::new();
    let mut flagged: HashSet<&str> = HashSet::new();
    for entry in &entries {
        if !seen.insert(entry.id.as_str()) && flagged.insert(entry.id.as_str()) {
            report.duplicate_ids.push(entry.id.clone());
        }
    }

    for entry in &entries {
        for filename in &entry.images {
            if !images.contains(filename) {
                report.missing_images.push(MissingImage {
                    entry_id: entry.id.clone(),
                    filename: filename.clone(),
                });
            }
        }
        if entry.updated_at < entry.created_at {
            report.timestamp_violations.push(entry.id.clone());
        }
    }

    if let Some(filename) = profile.load().image_filename {
        if !images.contains(&filename) {
            report.missing_images.push(MissingImage {
                entry_id: "profile".to_string(),
                filename,
            });
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::paths::DataDir;
    use crate::model::journal::Journal;
    use chrono::Duration;
    use tempfile::TempDir;

    fn stores(tmp: &TempDir) -> (JournalStore, ProfileStore, ImageStore) {
        let dir = DataDir::new(tmp.path());
        dir.ensure_layout().unwrap();
        (
            JournalStore::new(&dir),
            ProfileStore::new(&dir),
            ImageStore::new(&dir),
        )
    }

    #[test]
    fn clean_store_reports_clean() {
        let tmp = TempDir::new().unwrap();
        let (journal, profile, images) = stores(&tmp);
        journal.upsert(Journal::new()).unwrap();
        assert!(check(&journal, &profile, &images).is_clean());
    }

    #[test]
    fn reports_duplicate_ids_once() {
        let tmp = TempDir::new().unwrap();
        let (journal, profile, images) = stores(&tmp);
        let mut a = Journal::new();
        a.id = "same".to_string();
        let mut b = Journal::new();
        b.id = "same".to_string();
        journal.save(&[a.clone(), b, a]).unwrap();

        let report = check(&journal, &profile, &images);
        assert_eq!(report.duplicate_ids, vec!["same".to_string()]);
    }

    #[test]
    fn reports_missing_image_files() {
        let tmp = TempDir::new().unwrap();
        let (journal, profile, images) = stores(&tmp);
        let mut entry = Journal::new();
        entry.images.push("gone.jpg".to_string());
        let entry = journal.upsert(entry).unwrap();

        let report = check(&journal, &profile, &images);
        assert_eq!(report.missing_images.len(), 1);
        assert_eq!(report.missing_images[0].entry_id, entry.id);
        assert_eq!(report.missing_images[0].filename, "gone.jpg");
    }

    #[test]
    fn reports_timestamp_violations() {
        let tmp = TempDir::new().unwrap();
        let (journal, profile, images) = stores(&tmp);
        let mut entry = Journal::new();
        entry.updated_at = entry.created_at - Duration::seconds(10);
        journal.save(&[entry.clone()]).unwrap();

        let report = check(&journal, &profile, &images);
        assert_eq!(report.timestamp_violations, vec![entry.id]);
    }
}
