use std::borrow::Cow;

use serde::Serialize;

use crate::config::Config;
use crate::content::{ContentKind, ContentRecord, CATCH_ALL_CATEGORY};
use crate::error::{IndexError, Result};
use crate::index::ContentIndex;
use crate::paginator::Paginator;
use crate::query_string::ListingQuery;
use crate::resolver::Resolver;
use crate::toc::Heading;

/// Posts and snippets of one site, indexed once per build pass.
///
/// This is the read-only surface page code talks to.
pub struct Library {
    posts: ContentIndex,
    snippets: ContentIndex,
    page_size: u32,
}

/// A filtered, paginated listing.
#[derive(Debug, Serialize)]
pub struct Listing<'a> {
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: u32,
    pub page_count: u32,
    pub total: usize,
    pub records: Vec<&'a ContentRecord>,
}

impl Library {
    pub fn load(config: &Config) -> Result<Library> {
        let posts = ContentIndex::build(ContentKind::Post, config.discoverer(ContentKind::Post))?;
        let snippets = ContentIndex::build(ContentKind::Snippet, config.discoverer(ContentKind::Snippet))?;
        Ok(Self::from_indexes(posts, snippets, config.defaults.page_size))
    }

    pub fn from_indexes(posts: ContentIndex, snippets: ContentIndex, page_size: u32) -> Library {
        Library { posts, snippets, page_size }
    }

    pub fn index(&self, kind: ContentKind) -> &ContentIndex {
        match kind {
            ContentKind::Post => &self.posts,
            ContentKind::Snippet => &self.snippets,
        }
    }

    pub fn list_all(&self, kind: ContentKind) -> &[ContentRecord] {
        self.index(kind).list_all()
    }

    pub fn list_by_category(&self, kind: ContentKind, category: &str) -> Vec<&ContentRecord> {
        self.index(kind).list_by_category(category)
    }

    pub fn list_categories(&self, kind: ContentKind) -> Vec<String> {
        self.index(kind).list_categories()
    }

    pub fn category_counts(&self, kind: ContentKind) -> Vec<(String, usize)> {
        self.index(kind).category_counts()
    }

    pub fn search(&self, kind: ContentKind, term: &str) -> Vec<&ContentRecord> {
        self.index(kind).search(term)
    }

    pub fn resolve_by_full_path(&self, kind: ContentKind, full_path: &str) -> Result<&ContentRecord> {
        Resolver::new(self.index(kind)).resolve_by_full_path(full_path)
    }

    pub fn resolve_by_slug_or_title(&self, kind: ContentKind, category: &str, key: &str) -> Option<Cow<'_, ContentRecord>> {
        Resolver::new(self.index(kind)).resolve_by_slug_or_title(category, key)
    }

    pub fn extract_headings(&self, body: &str) -> Vec<Heading> {
        crate::toc::extract_headings(body)
    }

    pub fn slugify(&self, text: &str) -> String {
        crate::slug::slugify(text)
    }

    pub fn static_params(&self, kind: ContentKind) -> Vec<(&str, &str)> {
        self.index(kind).static_params()
    }

    /// Applies a listing request: category filter, search term, then the page.
    ///
    /// An unknown category is `NotFound`; a known category without documents is an empty listing.
    pub fn listing(&self, kind: ContentKind, query: &ListingQuery) -> Result<Listing<'_>> {
        let index = self.index(kind);
        let category = query.get_category().map(str::to_string);
        let search = query.get_search().map(str::to_string);

        if let Some(ref category) = category {
            if category != CATCH_ALL_CATEGORY && !index.has_category(category) {
                return Err(IndexError::NotFound(format!("category {}", category)));
            }
        }

        let mut records = match category {
            Some(ref category) => index.list_by_category(category),
            None => index.list_all().iter().collect(),
        };
        if let Some(ref term) = search {
            let term = term.to_lowercase();
            records.retain(|r| r.matches_term(&term));
        }

        let total = records.len();
        let paginator = Paginator::from(&records, self.page_size);
        let page_count = paginator.page_count();
        let cur_page = match query.get_page() { // Sanity check for current page
            x if x > page_count => 1,
            x => x,
        };
        let page_records = paginator.get_page(cur_page)
            .map(|page| page.items.to_vec())
            .unwrap_or_default();

        Ok(Listing {
            category,
            search,
            page: cur_page,
            page_count,
            total,
            records: page_records,
        })
    }
}
