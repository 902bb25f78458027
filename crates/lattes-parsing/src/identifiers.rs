use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ParsingConfig;

/// `ISSN` label followed by a nine-character digits-and-hyphen token.
static ISSN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)ISSN\s+([-0-9]{9})").unwrap());

/// An ISSN found in citation text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssnMatch {
    pub issn: String,
    /// Byte offset where the `ISSN` marker starts; the citation head ends here.
    pub marker_start: usize,
}

/// Locate the first ISSN marker in `text`.
pub fn find_issn(text: &str) -> Option<IssnMatch> {
    find_issn_with_config(text, &ParsingConfig::default())
}

pub(crate) fn find_issn_with_config(text: &str, config: &ParsingConfig) -> Option<IssnMatch> {
    let re = config.issn_re.as_ref().unwrap_or(&ISSN_RE);
    let caps = re.captures(text)?;
    let whole = caps.get(0)?;
    let issn = caps.get(1).unwrap_or(whole).as_str().to_string();
    Some(IssnMatch {
        issn,
        marker_start: whole.start(),
    })
}

/// Strip trailing punctuation and unbalanced closing delimiters from a DOI.
fn clean_doi(doi: &str) -> String {
    let mut doi = doi.trim_end_matches(['.', ',', ';', ':']);

    for (open, close) in [('(', ')'), ('[', ']'), ('{', '}')] {
        while doi.ends_with(close) && doi.matches(close).count() > doi.matches(open).count() {
            doi = &doi[..doi.len() - 1];
            doi = doi.trim_end_matches(['.', ',', ';', ':']);
        }
    }

    doi.to_string()
}

/// Extract a DOI from citation text.
///
/// Handles formats like:
/// - `10.1234/example`
/// - `doi: 10.1234/example`
/// - `https://doi.org/10.1234/example`
/// - `http://dx.doi.org/10.1234/example`
pub fn extract_doi(text: &str) -> Option<String> {
    // Priority 1: URL format
    static URL_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)https?://(?:dx\.)?doi\.org/(10\.\d{4,}/[^\s\]>},]+)").unwrap()
    });
    if let Some(doi) = URL_RE.captures(text).and_then(|caps| caps.get(1)) {
        return Some(clean_doi(doi.as_str()));
    }

    // Priority 2: bare DOI
    static DOI_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"10\.\d{4,}/[^\s\]>},]+").unwrap());
    DOI_RE.find(text).map(|m| clean_doi(m.as_str()))
}
