//! Heuristic decomposition of a Lattes journal-article citation.
//!
//! Lattes renders articles as
//! `AUTHOR, A.; AUTHOR, B. . Title. Journal, v. 1, n. 2, p. 3-4, 2020. ISSN 1234-5678`.
//! Parsing never fails: anything that cannot be recovered is reported as
//! `N/D` or falls back to a default.

use lattes_core::{ArticleRecord, AuthorName, JournalMatcher, NOT_AVAILABLE};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ParsingConfig;
use crate::identifiers::{extract_doi, find_issn_with_config};
use crate::text_processing::{last_year, split_segments};

/// Start of the volume/issue/pages/year tail: `, v.`, `, n.`, `, p.` or `, 2020`.
static METADATA_ANCHOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s+(?:v\.|n\.|p\.|(?:19|20)\d{2})").unwrap());

/// Item number left over from a marker that shared a line with text.
static LEADING_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s*").unwrap());

/// The bibliographic fields of one article, before journal resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCitation {
    pub title: String,
    pub authors: Vec<AuthorName>,
    pub journal_name: String,
    pub issn: Option<String>,
    pub year: i32,
    pub doi: Option<String>,
}

/// Split a `;`-separated author list, dropping one trailing comma per name.
pub fn parse_authors(text: &str) -> Vec<AuthorName> {
    text.split(';')
        .map(|name| {
            let name = name.trim();
            name.strip_suffix(',').unwrap_or(name).trim()
        })
        .filter(|name| !name.is_empty())
        .map(AuthorName::new)
        .collect()
}

fn or_not_available(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        text.to_string()
    }
}

/// Decompose citation text into its fields.
///
/// `fallback_year` is used when the text before the ISSN carries no year.
pub fn parse_citation(text: &str, fallback_year: i32) -> ParsedCitation {
    parse_citation_with_config(text, fallback_year, &ParsingConfig::default())
}

pub(crate) fn parse_citation_with_config(
    text: &str,
    fallback_year: i32,
    config: &ParsingConfig,
) -> ParsedCitation {
    // 1. ISSN, and the head that precedes it
    let (issn, head) = match find_issn_with_config(text, config) {
        Some(m) => (Some(m.issn), &text[..m.marker_start]),
        None => (None, text),
    };

    // 2. Year: last year-like token in the head
    let year = last_year(head).unwrap_or(fallback_year);

    // 3. Bibliographic core: up to the first metadata anchor
    let head = LEADING_NUMBER_RE.replace(head.trim(), "");
    let anchor_re = config.metadata_anchor_re.as_ref().unwrap_or(&METADATA_ANCHOR_RE);
    let core = match anchor_re.find(&head) {
        Some(m) => &head[..m.start()],
        None => &head[..],
    };

    // 4. Authors / title / journal by segment count
    let segments = split_segments(core);
    let (authors, title, journal_name) = match segments.as_slice() {
        [authors, middle @ .., journal] if !middle.is_empty() => (
            authors.as_str(),
            or_not_available(&middle.join(". ")),
            or_not_available(journal),
        ),
        [authors, title] => (
            authors.as_str(),
            or_not_available(title),
            NOT_AVAILABLE.to_string(),
        ),
        _ => (core.trim(), NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string()),
    };

    ParsedCitation {
        title,
        authors: parse_authors(authors),
        journal_name,
        issn,
        year,
        doi: extract_doi(text),
    }
}

/// Parse one article item and resolve its journal against `matcher`.
pub fn parse_article(
    text: &str,
    id: String,
    fallback_year: i32,
    matcher: &JournalMatcher,
) -> ArticleRecord {
    parse_article_with_config(text, id, fallback_year, matcher, &ParsingConfig::default())
}

pub(crate) fn parse_article_with_config(
    text: &str,
    id: String,
    fallback_year: i32,
    matcher: &JournalMatcher,
    config: &ParsingConfig,
) -> ArticleRecord {
    let parsed = parse_citation_with_config(text, fallback_year, config);
    let journal = matcher.resolve(&parsed.journal_name, parsed.issn.as_deref());

    ArticleRecord {
        id,
        raw_text: text.to_string(),
        title: parsed.title,
        authors: parsed.authors,
        journal_name: parsed.journal_name,
        issn: parsed.issn,
        year: parsed.year,
        doi: parsed.doi,
        matched_journal_id: journal.matched_journal_id,
        rating: journal.rating,
        points: journal.points,
    }
}
