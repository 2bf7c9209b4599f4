//! Store-level properties, exercised against the fixture document in
//! `tests/fixtures/journal.json`.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use jot::io::image_io::ImageStore;
use jot::io::journal_io::JournalStore;
use jot::io::paths::DataDir;
use jot::model::journal::{Journal, SortMode};
use jot::ops::{entry_ops, search};

/// Seed a temp data dir with the fixture document.
fn fixture_store(tmp: &TempDir) -> (JournalStore, ImageStore) {
    let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/journal.json");
    let dir = DataDir::new(tmp.path());
    dir.ensure_layout().unwrap();
    fs::copy(fixture, dir.journal_file()).unwrap();
    (JournalStore::new(&dir), ImageStore::new(&dir))
}

#[test]
fn fixture_decodes_in_order() {
    let tmp = TempDir::new().unwrap();
    let (store, _) = fixture_store(&tmp);
    let entries = store.load();
    assert_eq!(entries.len(), 4);
    assert_eq!(entries[0].title.as_deref(), Some("Banana bread"));
    assert_eq!(entries[0].images, vec!["f1.jpg".to_string()]);
    assert_eq!(entries[3].title, None);
}

#[test]
fn save_then_load_returns_what_was_saved() {
    let tmp = TempDir::new().unwrap();
    let (store, _) = fixture_store(&tmp);
    let entries = store.load();
    store.save(&entries).unwrap();
    assert_eq!(store.load(), entries);
}

#[test]
fn decode_failure_yields_empty_collection() {
    let tmp = TempDir::new().unwrap();
    let dir = DataDir::new(tmp.path());
    dir.ensure_layout().unwrap();
    fs::write(dir.journal_file(), "garbage, not a journal").unwrap();
    assert!(JournalStore::new(&dir).load().is_empty());
}

#[test]
fn upsert_absent_id_grows_collection_by_one() {
    let tmp = TempDir::new().unwrap();
    let (store, _) = fixture_store(&tmp);
    let before = store.load().len();
    store.upsert(Journal::new()).unwrap();
    assert_eq!(store.load().len(), before + 1);
}

#[test]
fn upsert_present_id_replaces_in_place() {
    let tmp = TempDir::new().unwrap();
    let (store, _) = fixture_store(&tmp);
    let before = store.load();

    std::thread::sleep(std::time::Duration::from_millis(5));
    let mut edited = before[1].clone();
    edited.content = Some("Orchard day, rewritten.".to_string());
    store.upsert(edited.clone()).unwrap();

    let after = store.load();
    assert_eq!(after.len(), before.len());
    assert_eq!(
        after[1].content.as_deref(),
        Some("Orchard day, rewritten.")
    );
    assert_eq!(after[1].created_at, before[1].created_at);
    assert!(after[1].updated_at > before[1].updated_at);
}

#[test]
fn delete_removes_the_record_and_exactly_its_images() {
    let tmp = TempDir::new().unwrap();
    let (store, images) = fixture_store(&tmp);
    // Materialize the referenced file plus a bystander.
    fs::write(tmp.path().join("images/f1.jpg"), b"jpeg").unwrap();
    fs::write(tmp.path().join("images/other.jpg"), b"jpeg").unwrap();

    let doomed_id = "0a1b2c3d-0000-4000-8000-000000000001";
    entry_ops::delete_entry(&store, &images, doomed_id).unwrap();

    let entries = store.load();
    assert_eq!(entries.len(), 3);
    assert!(entries.iter().all(|e| e.id != doomed_id));
    assert!(!images.contains("f1.jpg"));
    assert!(images.contains("other.jpg"));
}

#[test]
fn filtering_returns_a_matching_subset() {
    let tmp = TempDir::new().unwrap();
    let (store, _) = fixture_store(&tmp);
    let entries = store.load();

    for query in ["porto", "BREAD", "day", "no title", "zzz"] {
        let filtered = search::filter_entries(&entries, query);
        assert!(filtered.iter().all(|f| entries.contains(f)), "subset");
        if let Some(re) = search::build_matcher(query) {
            assert!(
                filtered.iter().all(|f| search::matches(f, &re)),
                "every result matches '{}'",
                query
            );
        }
    }

    // OR across fields: "porto" matches by location only.
    let filtered = search::filter_entries(&entries, "porto");
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].location.as_deref(), Some("Porto"));
}

#[test]
fn date_sort_orders_by_creation_date() {
    let tmp = TempDir::new().unwrap();
    let (store, _) = fixture_store(&tmp);
    let mut entries = store.load();

    search::sort_entries(&mut entries, SortMode::DateDesc);
    let dates: Vec<_> = entries.iter().map(|e| e.created_at).collect();
    let mut expected = dates.clone();
    expected.sort_by(|a, b| b.cmp(a));
    assert_eq!(dates, expected);

    search::sort_entries(&mut entries, SortMode::DateAsc);
    for pair in entries.windows(2) {
        assert!(pair[0].created_at <= pair[1].created_at);
    }
}

#[test]
fn title_sort_is_case_insensitive_with_missing_titles_first() {
    let tmp = TempDir::new().unwrap();
    let (store, _) = fixture_store(&tmp);
    let mut entries = store.load();

    search::sort_entries(&mut entries, SortMode::TitleAsc);
    let titles: Vec<&str> = entries.iter().map(|e| e.title_or_empty()).collect();
    assert_eq!(titles, vec!["", "apple picking", "Banana bread", "Cherry season"]);

    search::sort_entries(&mut entries, SortMode::TitleDesc);
    let titles: Vec<&str> = entries.iter().map(|e| e.title_or_empty()).collect();
    assert_eq!(titles, vec!["Cherry season", "Banana bread", "apple picking", ""]);
}
