use crate::io::image_io::ImageStore;
use crate::io::journal_io::{JournalStore, StoreError};
use crate::model::journal::Journal;

/// Error type for entry operations
#[derive(Debug, thiserror::Error)]
pub enum EntryError {
    #[error("entry not found: {0}")]
    NotFound(String),
    #[error("id prefix \"{0}\" matches more than one entry")]
    AmbiguousId(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Build a new entry from the editor fields. Empty strings are treated as
/// "field left blank".
pub fn new_entry(
    title: Option<String>,
    location: Option<String>,
    content: Option<String>,
) -> Journal {
    let mut entry = Journal::new();
    entry.title = title.and_then(normalize);
    entry.location = location.and_then(normalize);
    entry.content = content.and_then(normalize);
    entry
}

/// Field edits from the editor form. `None` leaves a field untouched; an
/// empty string clears it.
#[derive(Debug, Clone, Default)]
pub struct EntryEdit {
    pub title: Option<String>,
    pub location: Option<String>,
    pub content: Option<String>,
    /// Image-store filenames to append.
    pub add_images: Vec<String>,
    /// Delete the entry's image files and clear the list first.
    pub clear_images: bool,
}

impl EntryEdit {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.location.is_none()
            && self.content.is_none()
            && self.add_images.is_empty()
            && !self.clear_images
    }
}

/// Apply editor-form changes to an entry. Image file deletion happens
/// here; the caller persists the entry via `JournalStore::upsert`, which
/// refreshes `updated_at`.
pub fn apply_edit(entry: &mut Journal, edit: EntryEdit, images: &ImageStore) {
    if edit.clear_images {
        images.delete_many(&entry.images);
        entry.images.clear();
    }
    entry.images.extend(edit.add_images);
    if let Some(title) = edit.title {
        entry.title = normalize(title);
    }
    if let Some(location) = edit.location {
        entry.location = normalize(location);
    }
    if let Some(content) = edit.content {
        entry.content = normalize(content);
    }
}

/// Delete an entry and exactly its listed image files.
pub fn delete_entry(
    store: &JournalStore,
    images: &ImageStore,
    id: &str,
) -> Result<Journal, EntryError> {
    let removed = store
        .remove(id)?
        .ok_or_else(|| EntryError::NotFound(id.to_string()))?;
    images.delete_many(&removed.images);
    Ok(removed)
}

/// Resolve a (possibly abbreviated) entry id against the collection:
/// exact match first, then a unique id prefix.
pub fn resolve_id<'a>(entries: &'a [Journal], id: &str) -> Result<&'a Journal, EntryError> {
    if let Some(entry) = entries.iter().find(|e| e.id == id) {
        return Ok(entry);
    }
    let mut matches = entries.iter().filter(|e| e.id.starts_with(id));
    match (matches.next(), matches.next()) {
        (Some(entry), None) => Ok(entry),
        (Some(_), Some(_)) => Err(EntryError::AmbiguousId(id.to_string())),
        (None, _) => Err(EntryError::NotFound(id.to_string())),
    }
}

fn normalize(s: String) -> Option<String> {
    if s.trim().is_empty() { None } else { Some(s) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::paths::DataDir;
    use tempfile::TempDir;

    fn stores(tmp: &TempDir) -> (JournalStore, ImageStore) {
        let dir = DataDir::new(tmp.path());
        dir.ensure_layout().unwrap();
        (JournalStore::new(&dir), ImageStore::new(&dir))
    }

    #[test]
    fn new_entry_drops_blank_fields() {
        let entry = new_entry(Some("  ".into()), None, Some("text".into()));
        assert!(entry.title.is_none());
        assert!(entry.location.is_none());
        assert_eq!(entry.content.as_deref(), Some("text"));
    }

    #[test]
    fn apply_edit_updates_only_given_fields() {
        let tmp = TempDir::new().unwrap();
        let (_, images) = stores(&tmp);
        let mut entry = new_entry(Some("old title".into()), Some("old place".into()), None);

        apply_edit(
            &mut entry,
            EntryEdit {
                title: Some("new title".into()),
                ..Default::default()
            },
            &images,
        );
        assert_eq!(entry.title.as_deref(), Some("new title"));
        assert_eq!(entry.location.as_deref(), Some("old place"));
    }

    #[test]
    fn apply_edit_empty_string_clears_field() {
        let tmp = TempDir::new().unwrap();
        let (_, images) = stores(&tmp);
        let mut entry = new_entry(Some("title".into()), None, None);
        apply_edit(
            &mut entry,
            EntryEdit {
                title: Some(String::new()),
                ..Default::default()
            },
            &images,
        );
        assert!(entry.title.is_none());
    }

    #[test]
    fn apply_edit_clear_images_deletes_files() {
        let tmp = TempDir::new().unwrap();
        let (_, images) = stores(&tmp);
        let name = images.save_bytes(b"pic", "jpg").unwrap();
        let mut entry = Journal::new();
        entry.images.push(name.clone());

        apply_edit(
            &mut entry,
            EntryEdit {
                clear_images: true,
                add_images: vec!["fresh.jpg".into()],
                ..Default::default()
            },
            &images,
        );
        assert!(!images.contains(&name));
        assert_eq!(entry.images, vec!["fresh.jpg".to_string()]);
    }

    #[test]
    fn delete_entry_cascades_to_exactly_its_images() {
        let tmp = TempDir::new().unwrap();
        let (store, images) = stores(&tmp);

        let mine = images.save_bytes(b"mine", "jpg").unwrap();
        let other = images.save_bytes(b"other", "jpg").unwrap();

        let mut doomed = Journal::new();
        doomed.images.push(mine.clone());
        let doomed = store.upsert(doomed).unwrap();
        let kept = store.upsert(Journal::new()).unwrap();

        delete_entry(&store, &images, &doomed.id).unwrap();

        let remaining = store.load();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, kept.id);
        assert!(!images.contains(&mine));
        assert!(images.contains(&other), "unrelated files must survive");
    }

    #[test]
    fn delete_unknown_entry_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let (store, images) = stores(&tmp);
        assert!(matches!(
            delete_entry(&store, &images, "missing"),
            Err(EntryError::NotFound(_))
        ));
    }

    #[test]
    fn resolve_id_supports_unique_prefixes() {
        let mut a = Journal::new();
        a.id = "aabb0000".to_string();
        let mut b = Journal::new();
        b.id = "aacc0000".to_string();
        let entries = vec![a, b];

        assert_eq!(resolve_id(&entries, "aabb0000").unwrap().id, "aabb0000");
        assert_eq!(resolve_id(&entries, "aab").unwrap().id, "aabb0000");
        assert!(matches!(
            resolve_id(&entries, "aa"),
            Err(EntryError::AmbiguousId(_))
        ));
        assert!(matches!(
            resolve_id(&entries, "zz"),
            Err(EntryError::NotFound(_))
        ));
    }
}
