use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use spdlog::{error, info, warn};

use crate::content::front_matter;
use crate::content::normalizer::{normalize, DocumentLocation};
use crate::content::{ContentKind, ContentRecord, CATCH_ALL_CATEGORY};
use crate::discovery::Discoverer;
use crate::error::{IndexError, Result};

/// All records of one content kind, newest first.
pub struct ContentIndex {
    kind: ContentKind,
    discoverer: Discoverer,
    records: Vec<ContentRecord>,
    // full path, position in records
    by_full_path: HashMap<String, usize>,
    categories: Vec<String>,
    rejected: Vec<(PathBuf, IndexError)>,
    built_at: DateTime<Utc>,
}

impl ContentIndex {
    pub fn build(kind: ContentKind, discoverer: Discoverer) -> Result<ContentIndex> {
        Self::build_at(kind, discoverer, Utc::now())
    }

    /// Same as `build`, with the timestamp given to undated snippets fixed by the caller.
    pub fn build_at(kind: ContentKind, discoverer: Discoverer, now: DateTime<Utc>) -> Result<ContentIndex> {
        let files = discoverer.discover()?;
        let categories = discoverer.list_categories()?;

        let mut records = vec![];
        let mut rejected = vec![];
        for file in files {
            match load_document(kind, &file.category, &file.path, now) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!("Skipping {} {}: {}", kind, file.path.display(), e);
                    rejected.push((file.path, e));
                }
            }
        }

        let records = Self::reject_collisions(records, &mut rejected);

        let mut index = ContentIndex {
            kind,
            discoverer,
            records,
            by_full_path: HashMap::new(),
            categories,
            rejected,
            built_at: now,
        };
        index.sort();

        info!("Indexed {} {}s from {} ({} rejected)",
            index.records.len(), kind, index.discoverer.root().display(), index.rejected.len());
        Ok(index)
    }

    fn reject_collisions(records: Vec<ContentRecord>, rejected: &mut Vec<(PathBuf, IndexError)>) -> Vec<ContentRecord> {
        let mut owners: HashMap<&str, usize> = HashMap::new();
        for record in records.iter() {
            *owners.entry(record.full_path.as_str()).or_insert(0) += 1;
        }
        let colliding: Vec<String> = owners.into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(full_path, _)| full_path.to_string())
            .collect();

        if colliding.is_empty() {
            return records;
        }

        let (kept, dropped): (Vec<ContentRecord>, Vec<ContentRecord>) = records.into_iter()
            .partition(|r| !colliding.contains(&r.full_path));
        for record in dropped {
            error!("Rejecting {}: identifier {} is not unique", record.source_path.display(), record.full_path);
            rejected.push((record.source_path.clone(), IndexError::Collision {
                full_path: record.full_path,
                path: record.source_path,
            }));
        }
        kept
    }

    // Stable, so equal dates keep discovery order
    fn sort(&mut self) {
        self.records.sort_by(|a, b| b.date.cmp(&a.date));
        self.by_full_path = self.records.iter()
            .enumerate()
            .map(|(pos, record)| (record.full_path.clone(), pos))
            .collect();
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    pub fn discoverer(&self) -> &Discoverer {
        &self.discoverer
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// Documents left out of the index and why.
    pub fn rejected(&self) -> &[(PathBuf, IndexError)] {
        &self.rejected
    }

    pub fn list_all(&self) -> &[ContentRecord] {
        &self.records
    }

    /// Records of one category, `all` meaning every category. Unknown categories are empty.
    pub fn list_by_category(&self, category: &str) -> Vec<&ContentRecord> {
        self.records.iter()
            .filter(|r| category == CATCH_ALL_CATEGORY || r.category == category)
            .collect()
    }

    pub fn list_categories(&self) -> Vec<String> {
        let mut categories = Vec::with_capacity(self.categories.len() + 1);
        if self.kind.lists_catch_all() {
            categories.push(CATCH_ALL_CATEGORY.to_string());
        }
        categories.extend(self.categories.iter().cloned());
        categories
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// Categories with their document count, busiest first.
    pub fn category_counts(&self) -> Vec<(String, usize)> {
        let mut count_map: HashMap<&str, usize> = HashMap::new();
        for record in self.records.iter() {
            *count_map.entry(record.category.as_str()).or_insert(0) += 1;
        }

        let mut counts: Vec<(String, usize)> = self.categories.iter()
            .map(|c| (c.clone(), count_map.get(c.as_str()).copied().unwrap_or(0)))
            .collect();
        counts.sort_by(|(_, ca), (_, cb)| cb.cmp(ca));
        counts
    }

    /// Case-insensitive match on title or description, listing order kept.
    pub fn search(&self, term: &str) -> Vec<&ContentRecord> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return self.records.iter().collect();
        }
        self.records.iter()
            .filter(|r| r.matches_term(&term))
            .collect()
    }

    /// `(category, identifier)` of every record, for pre-generating detail pages.
    pub fn static_params(&self) -> Vec<(&str, &str)> {
        self.records.iter()
            .map(|r| (r.category.as_str(), r.identifier.as_str()))
            .collect()
    }

    pub fn get(&self, full_path: &str) -> Option<&ContentRecord> {
        self.by_full_path.get(full_path).map(|pos| &self.records[*pos])
    }
}

/// Reads, parses and normalizes one document file.
pub fn load_document(kind: ContentKind, category: &str, path: &Path, now: DateTime<Utc>) -> Result<ContentRecord> {
    let raw = fs::read_to_string(path).map_err(|e| IndexError::io(path, e))?;
    let doc = front_matter::parse(&raw, path)?;
    let location = DocumentLocation { category, path };
    normalize(kind, doc.header, doc.body, &location, now)
}
