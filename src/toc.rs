use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::slug::slugify;

lazy_static! {
    static ref HEADING_REGEX: Regex = Regex::new(r"^(?P<marks>#{1,3})[ \t]+(?P<text>.+)$").unwrap();
    static ref FENCE_REGEX: Regex = Regex::new(r"^ {0,3}(?P<fence>`{3,}|~{3,})").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub id: String,
    pub text: String,
    pub level: u8,
}

/// Outline of a markdown body: `#`, `##` and `###` headings in order of appearance.
///
/// Ids come from `slugify`, the same function that names documents, so anchors
/// rendered from the body and links built from the outline always agree.
/// Lines inside fenced code blocks are ignored.
pub fn extract_headings(body: &str) -> Vec<Heading> {
    let mut headings = vec![];
    // (fence char, fence length) of the open code block
    let mut open_fence: Option<(char, usize)> = None;

    for line in body.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if let Some(caps) = FENCE_REGEX.captures(line) {
            let fence = &caps["fence"];
            let fence_char = fence.chars().next().unwrap_or('`');
            let info = &line[caps[0].len()..];
            match open_fence {
                // Backticks after a backtick opener make it inline code
                None if fence_char == '`' && info.contains('`') => {}
                None => open_fence = Some((fence_char, fence.len())),
                Some((open_char, open_len))
                    if open_char == fence_char && fence.len() >= open_len && line.trim() == fence => open_fence = None,
                Some(_) => {}
            }
            continue;
        }
        if open_fence.is_some() {
            continue;
        }

        let Some(caps) = HEADING_REGEX.captures(line) else {
            continue;
        };
        let text = caps["text"].trim();
        if text.is_empty() {
            continue;
        }
        headings.push(Heading {
            id: slugify(text),
            text: text.to_string(),
            level: caps["marks"].len() as u8,
        });
    }

    headings
}
