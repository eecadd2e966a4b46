use std::path::{Path, PathBuf};

use spdlog::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::{IndexError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredFile {
    /// Name of the top level directory under the root holding the file.
    pub category: String,
    pub path: PathBuf,
}

/// Walks one content root, `<root>/<category>/**/<name>.<extension>`.
#[derive(Debug, Clone)]
pub struct Discoverer {
    root: PathBuf,
    extension: String,
}

impl Discoverer {
    pub fn new<P: AsRef<Path>>(root: P, extension: &str) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Every document below the root, depth first, siblings in name order.
    ///
    /// Symlinks are followed. A link back to one of its own ancestors is logged and skipped,
    /// as are broken links and unreadable directories.
    pub fn discover(&self) -> Result<Vec<DiscoveredFile>> {
        self.check_root()?;

        let mut files = vec![];
        for entry in self.walker(usize::MAX) {
            let Some(entry) = self.accept(entry)? else {
                continue;
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.into_path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                debug!("Skipping file with a non UTF-8 name {}", path.display());
                continue;
            };
            if !self.is_document(name) {
                debug!("Skipping non document file {}", path.display());
                continue;
            }

            match self.category_of(&path) {
                Some(category) => files.push(DiscoveredFile { category, path }),
                None => debug!("Skipping {} - documents must live inside a category directory", path.display()),
            }
        }

        Ok(files)
    }

    /// Top level directory names in name order, empty ones included.
    pub fn list_categories(&self) -> Result<Vec<String>> {
        self.check_root()?;

        let mut categories = vec![];
        for entry in self.walker(1) {
            let Some(entry) = self.accept(entry)? else {
                continue;
            };
            if !entry.file_type().is_dir() {
                continue;
            }
            match entry.file_name().to_str() {
                Some(name) => categories.push(name.to_string()),
                None => debug!("Skipping category with a non UTF-8 name {}", entry.path().display()),
            }
        }
        Ok(categories)
    }

    /// Location a document named `file_name` would have directly inside `category`.
    pub fn document_path(&self, category: &str, file_name: &str) -> Option<PathBuf> {
        let is_plain_segment = |s: &str| !s.is_empty() && s != "." && s != ".." && !s.contains(['/', '\\']);
        if !is_plain_segment(category) || !is_plain_segment(file_name) {
            return None;
        }
        Some(self.root.join(category).join(format!("{}.{}", file_name, self.extension)))
    }

    fn is_document(&self, file_name: &str) -> bool {
        match file_name.rsplit_once('.') {
            Some((stem, ext)) => !stem.is_empty() && ext == self.extension,
            None => false,
        }
    }

    fn check_root(&self) -> Result<()> {
        if self.root.is_dir() {
            Ok(())
        } else {
            Err(IndexError::config(&self.root, "content root does not exist or is not a directory"))
        }
    }

    fn walker(&self, max_depth: usize) -> impl Iterator<Item = walkdir::Result<DirEntry>> {
        WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_hidden(e))
    }

    // Unreadable entries below the root are skipped, the pass only fails on the root itself
    fn accept(&self, entry: walkdir::Result<DirEntry>) -> Result<Option<DirEntry>> {
        match entry {
            Ok(entry) => Ok(Some(entry)),
            Err(e) if e.loop_ancestor().is_some() => {
                warn!("Skipping symlink loop at {}", e.path().unwrap_or(self.root.as_path()).display());
                Ok(None)
            }
            Err(e) if e.depth() > 0 => {
                warn!("Skipping unreadable entry: {}", e);
                Ok(None)
            }
            Err(e) => {
                let path = e.path().unwrap_or(self.root.as_path()).to_path_buf();
                Err(IndexError::io(path, e.into()))
            }
        }
    }

    // First path component under the root; None for files directly in the root
    fn category_of(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let mut components = relative.components();
        let category = components.next()?.as_os_str().to_str()?;
        components.next()?;
        Some(category.to_string())
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_str().is_some_and(|name| name.starts_with('.'))
}
