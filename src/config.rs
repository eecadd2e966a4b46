use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::content::ContentKind;
use crate::discovery::Discoverer;
use crate::error::{IndexError, Result};

const EXE_DIR_VAR: &str = "${exe_dir}";

#[derive(Deserialize, Debug)]
pub struct Paths {
    pub posts_dir: PathBuf,
    pub snippets_dir: PathBuf,
}

#[derive(Deserialize, Debug)]
pub struct Defaults {
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults {
            extension: default_extension(),
            page_size: default_page_size(),
        }
    }
}

fn default_extension() -> String {
    "mdx".to_string()
}

fn default_page_size() -> u32 {
    10
}

#[derive(Deserialize, Debug)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone, Debug, PartialEq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize, Debug)]
pub struct Config {
    pub paths: Paths,
    #[serde(default)]
    pub defaults: Defaults,
    pub log: Option<Log>,
}

impl Config {
    /// Configuration for the two roots, with default settings.
    pub fn with_roots<P: AsRef<Path>>(posts_dir: P, snippets_dir: P) -> Config {
        Config {
            paths: Paths {
                posts_dir: posts_dir.as_ref().to_path_buf(),
                snippets_dir: snippets_dir.as_ref().to_path_buf(),
            },
            defaults: Defaults::default(),
            log: None,
        }
    }

    pub fn content_root(&self, kind: ContentKind) -> &Path {
        match kind {
            ContentKind::Post => &self.paths.posts_dir,
            ContentKind::Snippet => &self.paths.snippets_dir,
        }
    }

    pub fn discoverer(&self, kind: ContentKind) -> Discoverer {
        Discoverer::new(self.content_root(kind), &self.defaults.extension)
    }
}

fn parse_path(path: PathBuf) -> PathBuf {
    let Some(str_path) = path.to_str() else {
        return path;
    };
    if !str_path.starts_with(EXE_DIR_VAR) {
        return path;
    }
    let exe_dir = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    match exe_dir {
        Some(exe_dir) => PathBuf::from(str_path.replacen(EXE_DIR_VAR, &exe_dir.to_string_lossy(), 1)),
        None => path,
    }
}

pub fn parse_config(cfg_path: &Path, cfg_content: &str) -> Result<Config> {
    let mut cfg: Config = toml::from_str::<Config>(cfg_content)
        .map_err(|e| IndexError::config(cfg_path, format!("Error parsing configuration file: {}", e)))?;

    cfg.paths = Paths {
        posts_dir: parse_path(cfg.paths.posts_dir),
        snippets_dir: parse_path(cfg.paths.snippets_dir),
    };

    let extension = cfg.defaults.extension.trim_start_matches('.').to_string();
    if extension.is_empty() {
        return Err(IndexError::config(cfg_path, "defaults.extension must not be empty"));
    }
    cfg.defaults.extension = extension;

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> Result<Config> {
    let cfg_content = fs::read_to_string(cfg_path)
        .map_err(|e| IndexError::config(cfg_path, format!("Error opening configuration file: {}", e)))?;
    parse_config(cfg_path, &cfg_content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let toml_str = r##"
[paths]
posts_dir = "/srv/site/posts"
snippets_dir = "/srv/site/snippets"

[defaults]
extension = ".md"
page_size = 5

[log]
level = "Debug"
log_to_console = true
"##;
        let cfg = parse_config(Path::new("contentdex.toml"), toml_str).unwrap();
        assert_eq!(cfg.content_root(ContentKind::Post), Path::new("/srv/site/posts"));
        assert_eq!(cfg.content_root(ContentKind::Snippet), Path::new("/srv/site/snippets"));
        assert_eq!(cfg.defaults.extension, "md");
        assert_eq!(cfg.defaults.page_size, 5);
        let log = cfg.log.unwrap();
        assert_eq!(log.level, LogLevel::Debug);
        assert!(log.location.is_none());
    }

    #[test]
    fn test_defaults() {
        let toml_str = r##"
[paths]
posts_dir = "posts"
snippets_dir = "snippets"
"##;
        let cfg = parse_config(Path::new("contentdex.toml"), toml_str).unwrap();
        assert_eq!(cfg.defaults.extension, "mdx");
        assert_eq!(cfg.defaults.page_size, 10);
        assert!(cfg.log.is_none());
        assert_eq!(cfg.discoverer(ContentKind::Post).extension(), "mdx");
    }

    #[test]
    fn test_exe_dir_expansion() {
        let toml_str = r##"
[paths]
posts_dir = "${exe_dir}/posts"
snippets_dir = "snippets"
"##;
        let cfg = parse_config(Path::new("contentdex.toml"), toml_str).unwrap();
        let exe_dir = env::current_exe().unwrap().parent().unwrap().to_path_buf();
        assert_eq!(cfg.paths.posts_dir, exe_dir.join("posts"));
        assert_eq!(cfg.paths.snippets_dir, PathBuf::from("snippets"));
    }

    #[test]
    fn test_errors() {
        let err = parse_config(Path::new("bad.toml"), "[paths]\nposts_dir = 1\n").unwrap_err();
        assert!(matches!(err, IndexError::Config { .. }));

        let toml_str = "[paths]\nposts_dir = \"p\"\nsnippets_dir = \"s\"\n[defaults]\nextension = \"\"\n";
        assert!(parse_config(Path::new("bad.toml"), toml_str).is_err());

        let err = read_config(Path::new("/no/such/contentdex.toml")).unwrap_err();
        assert!(err.to_string().contains("/no/such/contentdex.toml"));
    }
}
