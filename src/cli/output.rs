use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

use crate::model::journal::Journal;
use crate::ops::search::{EntryHit, MatchField};

const PREVIEW_GRAPHEMES: usize = 48;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct SpanJson {
    pub start: usize,
    pub end: usize,
}

#[derive(Serialize)]
pub struct HitJson {
    pub entry_id: String,
    pub field: &'static str,
    pub spans: Vec<SpanJson>,
}

pub fn hits_to_json(hits: &[EntryHit]) -> Vec<HitJson> {
    hits.iter()
        .map(|h| HitJson {
            entry_id: h.entry_id.clone(),
            field: h.field.as_str(),
            spans: h
                .spans
                .iter()
                .map(|s| SpanJson {
                    start: s.start,
                    end: s.end,
                })
                .collect(),
        })
        .collect()
}

#[derive(Serialize)]
pub struct LocateJson {
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

/// First segment of an entry id, enough to address it on the CLI.
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// First line of `text`, truncated to a grapheme budget.
pub fn preview(text: &str, max_graphemes: usize) -> String {
    let first_line = text.lines().next().unwrap_or("");
    let mut graphemes = first_line.graphemes(true);
    let taken: String = graphemes.by_ref().take(max_graphemes).collect();
    if graphemes.next().is_some() || text.lines().nth(1).is_some() {
        format!("{}...", taken.trim_end())
    } else {
        taken
    }
}

/// One dashboard row: date, short id, title, then location and a content
/// preview when present.
pub fn entry_line(entry: &Journal) -> String {
    let mut line = format!(
        "{}  {}  {}",
        entry.created_at.format("%Y-%m-%d"),
        short_id(&entry.id),
        entry.display_title()
    );
    if let Some(location) = entry.location.as_deref() {
        line.push_str("  @ ");
        line.push_str(location);
    }
    if let Some(content) = entry.content.as_deref() {
        let preview = preview(content, PREVIEW_GRAPHEMES);
        if !preview.is_empty() {
            line.push_str("  | ");
            line.push_str(&preview);
        }
    }
    line
}

/// Detail view for `show`.
pub fn print_detail(entry: &Journal) {
    println!("Title:    {}", entry.display_title());
    println!("Id:       {}", entry.id);
    println!("Created:  {}", entry.created_at.format("%Y-%m-%d %H:%M UTC"));
    println!("Updated:  {}", entry.updated_at.format("%Y-%m-%d %H:%M UTC"));
    if let Some(location) = entry.location.as_deref() {
        println!("Location: {}", location);
    }
    if !entry.images.is_empty() {
        println!("Images:   {}", entry.images.join(", "));
    }
    if let Some(content) = entry.content.as_deref() {
        println!();
        println!("{}", content);
    }
}

/// Search hits, one line per matched field.
pub fn print_hits(entries: &[Journal], hits: &[EntryHit]) {
    if hits.is_empty() {
        println!("No matches.");
        return;
    }
    for hit in hits {
        let Some(entry) = entries.iter().find(|e| e.id == hit.entry_id) else {
            continue;
        };
        let text = match hit.field {
            MatchField::Title => entry.title.as_deref(),
            MatchField::Location => entry.location.as_deref(),
            MatchField::Content => entry.content.as_deref(),
        }
        .unwrap_or("");
        println!(
            "{}  {:<8}  {}",
            short_id(&entry.id),
            hit.field.as_str(),
            preview(text, 60)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_id_takes_a_prefix() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn preview_truncates_on_graphemes() {
        assert_eq!(preview("short", 48), "short");
        assert_eq!(preview("one two three", 7), "one two...");
        // Multi-line content always gets an ellipsis.
        assert_eq!(preview("line one\nline two", 48), "line one...");
    }

    #[test]
    fn entry_line_includes_optional_fields() {
        let mut entry = Journal::new();
        entry.title = Some("Walk".to_string());
        entry.location = Some("Lisbon".to_string());
        entry.content = Some("Sun on the river.".to_string());
        let line = entry_line(&entry);
        assert!(line.contains("Walk"));
        assert!(line.contains("@ Lisbon"));
        assert!(line.contains("Sun on the river."));

        let bare = Journal::new();
        let line = entry_line(&bare);
        assert!(line.contains("(untitled)"));
        assert!(!line.contains('@'));
    }
}
