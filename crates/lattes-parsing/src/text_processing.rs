use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Four-digit year starting with 19 or 20. Unanchored: digits embedded in
/// longer numbers also count.
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:19|20)\d{2}").unwrap());

/// Lattes closes the author list with a detached period: `SILVA, J. . Title`.
static AUTHOR_TERMINATOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+\.(?:\s+|$)").unwrap());

/// Collapse every whitespace run to a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}

/// The last year-like token in `text`, if any.
pub fn last_year(text: &str) -> Option<i32> {
    YEAR_RE
        .find_iter(text)
        .last()
        .and_then(|m| m.as_str().parse().ok())
}

/// Split a citation into period-delimited segments.
///
/// The first segment is the author list. When the detached-period author
/// terminator is present, everything before it is one segment regardless
/// of the initials it contains, and only the remainder is split on `". "`.
/// Without a terminator the whole text is split on `". "`.
pub fn split_segments(text: &str) -> Vec<String> {
    let text = text.trim();
    if let Some(m) = AUTHOR_TERMINATOR_RE.find(text) {
        let authors = text[..m.start()].trim().to_string();
        let rest = &text[m.end()..];
        return std::iter::once(authors)
            .chain(rest.split(". ").map(|s| s.trim().to_string()))
            .collect();
    }
    text.split(". ").map(|s| s.trim().to_string()).collect()
}

/// The first `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
