use std::ops::Range;

use regex::{Regex, RegexBuilder};

use crate::model::journal::{Journal, SortMode};

/// Which field of an entry matched the search text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Title,
    Location,
    Content,
}

impl MatchField {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchField::Title => "title",
            MatchField::Location => "location",
            MatchField::Content => "content",
        }
    }
}

/// A search hit within a single entry
#[derive(Debug, Clone)]
pub struct EntryHit {
    pub entry_id: String,
    pub field: MatchField,
    pub spans: Vec<Range<usize>>,
}

/// Build the matcher for a dashboard search: case-insensitive substring.
///
/// The query is trimmed; an empty query means "match everything" and
/// returns `None`.
pub fn build_matcher(query: &str) -> Option<Regex> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    let re = RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
        .expect("escaped literal is a valid pattern");
    Some(re)
}

/// Does the entry match in at least one of title/location/content?
pub fn matches(entry: &Journal, re: &Regex) -> bool {
    entry.title.as_deref().is_some_and(|t| re.is_match(t))
        || entry.location.as_deref().is_some_and(|l| re.is_match(l))
        || entry.content.as_deref().is_some_and(|c| re.is_match(c))
}

/// Filter the full collection down to entries matching the search text.
/// Recomputed from scratch on every call; no caching of prior results.
pub fn filter_entries(entries: &[Journal], query: &str) -> Vec<Journal> {
    match build_matcher(query) {
        None => entries.to_vec(),
        Some(re) => entries
            .iter()
            .filter(|e| matches(e, &re))
            .cloned()
            .collect(),
    }
}

/// Collect field-level hits (with byte spans for highlighting) across the
/// collection.
pub fn search_entries(entries: &[Journal], re: &Regex) -> Vec<EntryHit> {
    let mut hits = Vec::new();
    for entry in entries {
        search_field(re, entry, MatchField::Title, entry.title.as_deref(), &mut hits);
        search_field(
            re,
            entry,
            MatchField::Location,
            entry.location.as_deref(),
            &mut hits,
        );
        search_field(
            re,
            entry,
            MatchField::Content,
            entry.content.as_deref(),
            &mut hits,
        );
    }
    hits
}

fn search_field(
    re: &Regex,
    entry: &Journal,
    field: MatchField,
    text: Option<&str>,
    hits: &mut Vec<EntryHit>,
) {
    let Some(text) = text else { return };
    let spans: Vec<Range<usize>> = re.find_iter(text).map(|m| m.start()..m.end()).collect();
    if !spans.is_empty() {
        hits.push(EntryHit {
            entry_id: entry.id.clone(),
            field,
            spans,
        });
    }
}

/// Sort the collection in place. The sort is stable; missing titles sort
/// as the empty string.
pub fn sort_entries(entries: &mut [Journal], mode: SortMode) {
    match mode {
        SortMode::DateDesc => entries.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortMode::DateAsc => entries.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortMode::TitleAsc => entries.sort_by(|a, b| title_key(a).cmp(&title_key(b))),
        SortMode::TitleDesc => entries.sort_by(|a, b| title_key(b).cmp(&title_key(a))),
    }
}

fn title_key(entry: &Journal) -> String {
    entry.title_or_empty().to_lowercase()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
