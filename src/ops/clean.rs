use std::collections::HashSet;

use crate::io::image_io::ImageStore;
use crate::io::journal_io::JournalStore;
use crate::io::profile_io::ProfileStore;

/// Result of an orphaned-image sweep
#[derive(Debug, Default)]
pub struct SweepResult {
    /// Files in the image store referenced by no entry and not by the
    /// profile.
    pub orphans: Vec<String>,
    /// Whether the orphans were actually deleted (false on dry runs).
    pub deleted: bool,
}

/// Sweep the image store for orphaned files.
///
/// A crash between an image write and the record save leaves a file no
/// entry references; nothing else ever reclaims it. With `dry_run` the
/// orphans are only reported.
pub fn sweep_images(
    journal: &JournalStore,
    profile: &ProfileStore,
    images: &ImageStore,
    dry_run: bool,
) -> SweepResult {
    let mut referenced: HashSet<String> = HashSet::new();
    for entry in journal.load() {
        referenced.extend(entry.images);
    }
    if let Some(filename) = profile.load().image_filename {
        referenced.insert(filename);
    }

    let mut orphans: Vec<String> = images
        .list()
        .into_iter()
        .filter(|f| !referenced.contains(f))
        .collect();
    orphans.sort();

    if !dry_run {
        images.delete_many(&orphans);
    }
    SweepResult {
        orphans,
        deleted: !dry_run,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::paths::DataDir;
    use crate::model::journal::Journal;
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
    fn sweep_removes_only_unreferenced_files() {
        let tmp = TempDir::new().unwrap();
        let (journal, profile, images) = stores(&tmp);

        let referenced = images.save_bytes(b"used", "jpg").unwrap();
        let profile_pic = profile.set_image(b"me", "jpg", &images).unwrap();
        let orphan = images.save_bytes(b"lost", "jpg").unwrap();

        let mut entry = Journal::new();
        entry.images.push(referenced.clone());
        journal.upsert(entry).unwrap();

        let result = sweep_images(&journal, &profile, &images, false);
        assert_eq!(result.orphans, vec![orphan.clone()]);
        assert!(result.deleted);
        assert!(images.contains(&referenced));
        assert!(images.contains(&profile_pic));
        assert!(!images.contains(&orphan));
    }

    #[test]
    fn dry_run_reports_without_deleting() {
        let tmp = TempDir::new().unwrap();
        let (journal, profile, images) = stores(&tmp);
        let orphan = images.save_bytes(b"lost", "jpg").unwrap();

        let result = sweep_images(&journal, &profile, &images, true);
        assert_eq!(result.orphans, vec![orphan.clone()]);
        assert!(!result.deleted);
        assert!(images.contains(&orphan));
    }

    #[test]
    fn clean_store_has_no_orphans() {
        let tmp = TempDir::new().unwrap();
        let (journal, profile, images) = stores(&tmp);
        let result = sweep_images(&journal, &profile, &images, false);
        assert!(result.orphans.is_empty());
    }
}
