use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single journal entry as persisted in `journal.json`.
///
/// The `id` is the sole join key between the record and its files in the
/// image store, and never changes for the lifetime of the entry. Wire keys
/// are camelCase to match the persisted document format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Journal {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Image-store filenames in display order. Omitted when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

impl Journal {
    /// Create an empty entry with a fresh id and both timestamps set to now.
    pub fn new() -> Self {
        let now = Utc::now();
        Journal {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            title: None,
            location: None,
            content: None,
            images: Vec::new(),
        }
    }

    /// Title as used for sorting and matching — a missing title is the
    /// empty string.
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Title shown in lists and detail views.
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => "(untitled)",
        }
    }
}

impl Default for Journal {
    fn default() -> Self {
        Journal::new()
    }
}

/// Dashboard sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    #[default]
    DateDesc,
    DateAsc,
    TitleAsc,
    TitleDesc,
}

impl SortMode {
    pub fn parse(s: &str) -> Option<SortMode> {
        match s {
            "date-desc" => Some(SortMode::DateDesc),
            "date-asc" => Some(SortMode::DateAsc),
            "title-asc" => Some(SortMode::TitleAsc),
            "title-desc" => Some(SortMode::TitleDesc),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::DateDesc => "date-desc",
            SortMode::DateAsc => "date-asc",
            SortMode::TitleAsc => "title-asc",
            SortMode::TitleDesc => "title-desc",
        }
    }
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
