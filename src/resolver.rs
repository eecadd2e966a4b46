use std::borrow::Cow;

use spdlog::{debug, info};

use crate::content::{ContentRecord, CATCH_ALL_CATEGORY};
use crate::error::{IndexError, Result};
use crate::index::{load_document, ContentIndex};
use crate::query_string::decode_path;
use crate::slug::{is_slug, slugify};

/// Read-only lookups over one index.
pub struct Resolver<'a> {
    index: &'a ContentIndex,
}

impl<'a> Resolver<'a> {
    pub fn new(index: &'a ContentIndex) -> Self {
        Resolver { index }
    }

    /// Finds the record whose `category/identifier` equals the (possibly percent-encoded) path.
    ///
    /// The path is tried as given first, then without a trailing `.<extension>`, so
    /// identifiers that themselves end in the extension stay reachable.
    pub fn resolve_by_full_path(&self, full_path: &str) -> Result<&'a ContentRecord> {
        let decoded = decode_path(full_path);
        let exact = decoded.trim_matches('/');
        if let Some(record) = self.index.get(exact) {
            return Ok(record);
        }

        let stripped = strip_extension(exact, self.index.discoverer().extension());
        match self.index.get(stripped) {
            Some(record) => Ok(record),
            None => {
                debug!("No {} at full path {}", self.index.kind(), exact);
                Err(IndexError::NotFound(exact.to_string()))
            }
        }
    }

    /// Looks a document up by slug, by its file name, or by a freshly typed title.
    ///
    /// Strategies, first hit wins:
    /// 1. `key` is already a slug: match stored identifiers.
    /// 2. `key` names a file inside `category`: load that file.
    /// 3. Match `slugify(key)` against identifiers and slugified titles.
    ///
    /// `category` may be `all` to search every category. `None` means no such document.
    pub fn resolve_by_slug_or_title(&self, category: &str, key: &str) -> Option<Cow<'a, ContentRecord>> {
        let index = self.index;
        let candidates = || index.list_by_category(category).into_iter();

        if is_slug(key) {
            if let Some(record) = candidates().find(|r| r.identifier == key) {
                return Some(Cow::Borrowed(record));
            }
        }

        if let Some(record) = self.load_by_file_name(category, key) {
            return Some(record);
        }

        let wanted = slugify(key);
        if wanted.is_empty() {
            return None;
        }
        let found = candidates().find(|r| r.identifier == wanted || slugify(&r.title) == wanted);
        if found.is_none() {
            info!("No {} matches {}/{}", index.kind(), category, key);
        }
        found.map(Cow::Borrowed)
    }

    fn load_by_file_name(&self, category: &str, file_name: &str) -> Option<Cow<'a, ContentRecord>> {
        if category == CATCH_ALL_CATEGORY {
            return None;
        }
        let path = self.index.discoverer().document_path(category, file_name)?;
        if !path.is_file() {
            return None;
        }

        if let Some(record) = self.index.list_all().iter().find(|r| r.source_path == path) {
            return Some(Cow::Borrowed(record));
        }

        // On disk but not in the index, e.g. it lost an identifier collision
        match load_document(self.index.kind(), category, &path, self.index.built_at()) {
            Ok(record) => Some(Cow::Owned(record)),
            Err(e) => {
                debug!("Direct load of {} failed, falling back to slug match: {}", path.display(), e);
                None
            }
        }
    }
}

fn strip_extension<'p>(path: &'p str, extension: &str) -> &'p str {
    let suffix = format!(".{}", extension);
    path.strip_suffix(suffix.as_str()).unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use crate::content::ContentKind;
    use crate::discovery::Discoverer;
    use crate::test_data::tree::{content_tree, doc, write_file};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()
    }

    fn build(kind: ContentKind, root: &std::path::Path) -> ContentIndex {
        ContentIndex::build_at(kind, Discoverer::new(root, "mdx"), now()).unwrap()
    }

    #[test]
    fn test_full_path() {
        let root = content_tree(&[]);
        write_file(root.path(), "회고/2024-회고.mdx", &doc("2024 회고", "2024-12-31"));
        write_file(root.path(), "rust/traits.mdx", &doc("Traits", "2024-01-01"));
        let index = build(ContentKind::Post, root.path());
        let resolver = Resolver::new(&index);

        assert_eq!(resolver.resolve_by_full_path("rust/traits").unwrap().title, "Traits");
        assert_eq!(resolver.resolve_by_full_path("/rust/traits.mdx").unwrap().title, "Traits");
        let encoded = "%ED%9A%8C%EA%B3%A0/2024-%ED%9A%8C%EA%B3%A0";
        assert_eq!(resolver.resolve_by_full_path(encoded).unwrap().title, "2024 회고");

        let err = resolver.resolve_by_full_path("no/such/path").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_every_static_path_resolves() {
        let root = content_tree(&[
            ("a/x.mdx", doc("Plain", "2024-01-01").as_str()),
            ("a/x.mdx.mdx", doc("Doubled extension", "2024-02-01").as_str()),
            ("b/v1.2.mdx", doc("Dotted", "2024-03-01").as_str()),
            ("회고/2024.mdx", doc("Korean category", "2024-04-01").as_str()),
        ]);
        let index = build(ContentKind::Post, root.path());
        let resolver = Resolver::new(&index);
        assert_eq!(index.static_params().len(), 4);

        for (category, identifier) in index.static_params() {
            let full_path = format!("{}/{}", category, identifier);
            let found = resolver.resolve_by_full_path(&full_path).unwrap();
            assert_eq!((found.category.as_str(), found.identifier.as_str()), (category, identifier));
        }

        assert_eq!(resolver.resolve_by_full_path("a/x.mdx").unwrap().title, "Doubled extension");
        assert_eq!(resolver.resolve_by_full_path("a/x.mdx.mdx").unwrap().title, "Doubled extension");
        assert_eq!(resolver.resolve_by_full_path("a/x").unwrap().title, "Plain");
    }

    #[test]
    fn test_slug_round_trip_for_every_record() {
        let root = content_tree(&[
            ("js/debounce.mdx", "---\ntitle: Debounce Function\ndate: 2024-01-01\n---\n"),
            ("js/fetch.mdx", "---\ntitle: Fetch with Retry!\ndate: 2024-02-01\n---\n"),
            ("react/hooks.mdx", "---\ntitle: 리액트 훅\ndate: 2024-03-01\n---\n"),
        ]);
        for kind in [ContentKind::Post, ContentKind::Snippet] {
            let index = build(kind, root.path());
            let resolver = Resolver::new(&index);
            for record in index.list_all() {
                let found = resolver.resolve_by_slug_or_title(&record.category, &slugify(&record.title))
                    .unwrap_or_else(|| panic!("{} not resolved", record));
                assert_eq!(found.title, record.title);
                assert_eq!(slugify(&found.title), slugify(&record.title));
            }
        }
    }

    #[test]
    fn test_slug_step() {
        let root = content_tree(&[
            ("js/debounce.mdx", "---\ntitle: Debounce Function\ndate: 2024-01-01\n---\n"),
        ]);
        let index = build(ContentKind::Snippet, root.path());
        let resolver = Resolver::new(&index);

        let found = resolver.resolve_by_slug_or_title("js", "debounce-function").unwrap();
        assert!(matches!(found, Cow::Borrowed(_)));
        assert_eq!(found.file_name, "debounce");

        assert!(resolver.resolve_by_slug_or_title("all", "debounce-function").is_some());
        assert!(resolver.resolve_by_slug_or_title("css", "debounce-function").is_none());
    }

    #[test]
    fn test_file_name_step() {
        let root = content_tree(&[
            ("js/Debounce Helper.mdx", "---\ntitle: Debounce Function\ndate: 2024-01-01\n---\n"),
        ]);
        let index = build(ContentKind::Snippet, root.path());
        let resolver = Resolver::new(&index);

        let found = resolver.resolve_by_slug_or_title("js", "Debounce Helper").unwrap();
        assert!(matches!(found, Cow::Borrowed(_)));
        assert_eq!(found.identifier, "debounce-function");
    }

    #[test]
    fn test_file_name_step_loads_unindexed_file() {
        let root = content_tree(&[
            ("js/One.mdx", "---\ntitle: Same\ndate: 2024-01-01\n---\n"),
            ("js/Two.mdx", "---\ntitle: same\ndate: 2024-02-01\n---\n"),
        ]);
        let index = build(ContentKind::Snippet, root.path());
        assert!(index.list_all().is_empty());
        let resolver = Resolver::new(&index);

        let found = resolver.resolve_by_slug_or_title("js", "Two").unwrap();
        assert!(matches!(found, Cow::Owned(_)));
        assert_eq!(found.title, "same");
        assert!(resolver.resolve_by_slug_or_title("js", "Same").is_none());
    }

    #[test]
    fn test_title_step() {
        let root = content_tree(&[
            ("rust/ownership.mdx", "---\ntitle: Ownership & Borrowing\ndate: 2024-01-01\n---\n"),
            ("rust/traits.mdx", "---\ntitle: Traits\ndate: 2024-02-01\n---\n"),
        ]);
        let index = build(ContentKind::Post, root.path());
        let resolver = Resolver::new(&index);

        let found = resolver.resolve_by_slug_or_title("rust", "Ownership & Borrowing").unwrap();
        assert_eq!(found.identifier, "ownership");
        let found = resolver.resolve_by_slug_or_title("all", "OWNERSHIP   borrowing").unwrap();
        assert_eq!(found.identifier, "ownership");

        // Already a slug, but not a stored identifier: later steps still apply
        let found = resolver.resolve_by_slug_or_title("rust", "ownership-borrowing").unwrap();
        assert_eq!(found.identifier, "ownership");
    }

    #[test]
    fn test_not_found_is_not_an_error() {
        let root = content_tree(&[
            ("rust/traits.mdx", doc("Traits", "2024-02-01").as_str()),
        ]);
        let index = build(ContentKind::Post, root.path());
        let resolver = Resolver::new(&index);

        assert!(resolver.resolve_by_slug_or_title("rust", "lifetimes").is_none());
        assert!(resolver.resolve_by_slug_or_title("rust", "???").is_none());
        assert!(resolver.resolve_by_slug_or_title("missing", "traits").is_none());
        assert!(resolver.resolve_by_slug_or_title("rust", "../rust/traits").is_none());
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("a/b.mdx", "mdx"), "a/b");
        assert_eq!(strip_extension("a/b.mdx.mdx", "mdx"), "a/b.mdx");
        assert_eq!(strip_extension("a/bmdx", "mdx"), "a/bmdx");
        assert_eq!(strip_extension("a/c++", "mdx"), "a/c++");
    }
}
