use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;

use crate::error::{IndexError, Result};

lazy_static! {
    // Opening and closing `---` must both sit on their own line.
    static ref FRONT_MATTER_REGEX: Regex = Regex::new(
        r"(?s)\A\u{feff}?---[ \t]*\r?\n(?:(.*?)\r?\n)?---[ \t]*(?:\r?\n|\z)(.*)\z"
    ).unwrap();
}

/// Header keys understood by the indexer. Anything else is ignored.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "scalar_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub date: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub desc: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub thumbnail: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub language: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub code: Option<String>,
    /// Read but never trusted: the directory decides the category.
    #[serde(deserialize_with = "scalar_string")]
    pub category: Option<String>,
}

impl FrontMatter {
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().or(self.desc.as_deref())
    }
}

#[derive(Debug)]
pub struct ParsedDocument {
    pub header: FrontMatter,
    pub body: String,
}

/// Splits a raw document into its typed header and the remaining body.
pub fn parse(raw: &str, path: &Path) -> Result<ParsedDocument> {
    let Some(caps) = FRONT_MATTER_REGEX.captures(raw) else {
        return Err(IndexError::parse(path, "document does not start with a `---` delimited header"));
    };

    let yaml = caps.get(1).map(|m| m.as_str()).unwrap_or("");
    let body = caps.get(2).map(|m| m.as_str()).unwrap_or("");

    let header = if yaml.trim().is_empty() {
        FrontMatter::default()
    } else {
        serde_yaml::from_str::<FrontMatter>(yaml)
            .map_err(|e| IndexError::parse(path, e.to_string()))?
    };

    Ok(ParsedDocument {
        header,
        body: body.to_string(),
    })
}

fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(Error::custom(format!("expected a scalar, found {:?}", other))),
    }
}
