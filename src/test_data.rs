#[cfg(test)]
pub const POST_DATA: &str = r##"---
title: React 훅 정리
date: 2024-03-10
desc: useEffect and friends
thumbnail: /images/hooks.png
---

# Intro

Hooks let function components keep state.

## useState

```bash
# not a heading
npm install react
```

### Lazy initial state

#### Too deep for the outline

## useEffect 정리
"##;

#[cfg(test)]
pub const SNIPPET_DATA: &str = r##"---
title: Debounce Function
description: Delay a call until input settles
language: typescript
date: "2024-02-01T09:30:00Z"
code: |
  const debounce = (fn, ms) => {
    let t;
  };
---
"##;

#[cfg(test)]
pub mod tree {
    use std::fs;
    use std::path::Path;

    use tempfile::TempDir;

    /// Writes `(relative path, content)` pairs under a fresh temporary root.
    pub fn content_tree(files: &[(&str, &str)]) -> TempDir {
        let root = TempDir::new().unwrap();
        for (rel, content) in files {
            write_file(root.path(), rel, content);
        }
        root
    }

    pub fn write_file(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn doc(title: &str, date: &str) -> String {
        format!("---\ntitle: {}\ndate: {}\n---\n\n# {}\n", title, date, title)
    }
}
