use std::path::Path;

use chrono::{DateTime, Utc};

use crate::content::front_matter::FrontMatter;
use crate::content::{compose_full_path, ContentKind, ContentRecord};
use crate::error::{IndexError, Result};
use crate::slug::slugify;
use crate::text_utils::parse_date_time;

/// Where a document was found: its category directory and its file on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLocation<'a> {
    pub category: &'a str,
    pub path: &'a Path,
}

/// Builds the typed record out of a parsed header, the body and the discovered location.
///
/// `now` stands in for a missing snippet date and is captured once per build pass.
pub fn normalize(
    kind: ContentKind,
    header: FrontMatter,
    body: String,
    location: &DocumentLocation,
    now: DateTime<Utc>,
) -> Result<ContentRecord> {
    let path = location.path;
    if location.category.is_empty() {
        return Err(IndexError::validation(path, "document is not inside a category directory"));
    }

    let file_name = file_stem(path)?;
    let title = match header.title.as_deref().map(str::trim) {
        Some(title) if !title.is_empty() => title.to_string(),
        _ => return Err(IndexError::validation(path, "missing required field `title`")),
    };

    let identifier = if kind.identifier_from_title() {
        slugify(&title)
    } else {
        file_name.clone()
    };
    if identifier.is_empty() {
        return Err(IndexError::validation(path, format!("title `{}` yields an empty identifier", title)));
    }

    let date = match header.date.as_deref() {
        Some(date) => parse_date_time(date).map_err(|e| IndexError::validation(path, e))?,
        None if kind.allows_default_date() => now,
        None => return Err(IndexError::validation(path, "missing required field `date`")),
    };

    let description = header.description().unwrap_or_default().to_string();

    Ok(ContentRecord {
        kind,
        category: location.category.to_string(),
        full_path: compose_full_path(location.category, &identifier),
        identifier,
        file_name,
        title,
        description,
        date,
        thumbnail: header.thumbnail,
        language: header.language,
        code: header.code,
        source_path: path.to_path_buf(),
        body,
    })
}

fn file_stem(path: &Path) -> Result<String> {
    match path.file_stem().and_then(|stem| stem.to_str()) {
        Some(stem) if !stem.is_empty() => Ok(stem.to_string()),
        _ => Err(IndexError::validation(path, "file name is not valid UTF-8")),
    }
}
