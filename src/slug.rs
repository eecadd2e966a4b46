use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // `\w` is Unicode aware, so Hangul, CJK and accented letters are kept.
    static ref NON_SLUG_CHARS: Regex = Regex::new(r"[^\w\s-]").unwrap();
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref HYPHEN_RUN: Regex = Regex::new(r"-{2,}").unwrap();
}

/// Turns a free form title into a lowercase, hyphenated identifier.
///
/// The same function names documents and heading anchors, so both always agree.
///
/// ```
/// use contentdex::slug::slugify;
///
/// assert_eq!(slugify("Hello World!"), "hello-world");
/// assert_eq!(slugify("  A --- B  "), "a-b");
/// assert_eq!(slugify("2024 회고"), "2024-회고");
/// ```
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    let cleaned = NON_SLUG_CHARS.replace_all(&lower, "");
    let hyphenated = WHITESPACE_RUN.replace_all(&cleaned, "-");
    let collapsed = HYPHEN_RUN.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_string()
}

/// True when `text` is already in canonical slug form.
pub fn is_slug(text: &str) -> bool {
    slugify(text) == text
}
