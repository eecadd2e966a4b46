use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::text_utils::format_iso;

pub mod front_matter;
pub mod normalizer;

/// Category name that stands for "every category" in listings and lookups.
pub const CATCH_ALL_CATEGORY: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Post,
    Snippet,
}

impl ContentKind {
    /// Snippets without a date are stamped with the build time, posts are rejected.
    pub fn allows_default_date(&self) -> bool {
        matches!(self, ContentKind::Snippet)
    }

    /// Posts are addressed by file name, snippets by the slug of their title.
    pub fn identifier_from_title(&self) -> bool {
        matches!(self, ContentKind::Snippet)
    }

    /// Snippet category listings start with the catch-all entry.
    pub fn lists_catch_all(&self) -> bool {
        matches!(self, ContentKind::Snippet)
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Post => write!(f, "post"),
            ContentKind::Snippet => write!(f, "snippet"),
        }
    }
}

/// One post or snippet, fully normalized. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentRecord {
    pub kind: ContentKind,
    pub category: String,
    pub identifier: String,
    /// File name without extension, as found on disk.
    pub file_name: String,
    pub full_path: String,
    pub title: String,
    pub description: String,
    #[serde(serialize_with = "serialize_iso")]
    pub date: DateTime<Utc>,
    pub thumbnail: Option<String>,
    pub language: Option<String>,
    pub code: Option<String>,
    #[serde(skip)]
    pub source_path: PathBuf,
    pub body: String,
}

impl ContentRecord {
    pub fn date_iso(&self) -> String {
        format_iso(&self.date)
    }

    /// Whether title or description contain `term`, which must already be lowercase.
    pub fn matches_term(&self, term: &str) -> bool {
        self.title.to_lowercase().contains(term) || self.description.to_lowercase().contains(term)
    }
}

impl fmt::Display for ContentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({}) date={}", self.kind, self.full_path, self.title, self.date_iso())
    }
}

fn serialize_iso<S: serde::Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_iso(date))
}

pub fn compose_full_path(category: &str, identifier: &str) -> String {
    format!("{}/{}", category, identifier)
}
