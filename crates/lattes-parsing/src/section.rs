use lattes_core::SectionKind;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{ParsingConfig, SectionHeader};
use crate::text_processing::collapse_whitespace;

/// A line consisting solely of an item number: `1.`, `12.`.
static ITEM_MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.$").unwrap());

/// One completed item and the section it was collected under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedItem {
    pub section: String,
    pub kind: SectionKind,
    /// Buffered lines joined with single spaces. Generic items are also
    /// whitespace-collapsed.
    pub text: String,
}

/// Accumulator threaded through the line fold.
///
/// `current` is `None` until the first header is seen; anything buffered
/// in that state is discarded on flush.
#[derive(Debug, Default)]
struct ScanState {
    current: Option<SectionHeader>,
    buffer: Vec<String>,
    items: Vec<TrackedItem>,
}

impl ScanState {
    fn flush(&mut self, min_generic_len: usize) {
        if self.buffer.is_empty() {
            return;
        }
        let text = self.buffer.join(" ");
        self.buffer.clear();

        let Some(header) = &self.current else {
            tracing::debug!(chars = text.len(), "discarding text before first section header");
            return;
        };

        let text = match header.kind {
            SectionKind::Articles | SectionKind::Tech => text,
            SectionKind::Generic => {
                let collapsed = collapse_whitespace(&text);
                if collapsed.chars().count() <= min_generic_len {
                    return;
                }
                collapsed
            }
        };

        self.items.push(TrackedItem {
            section: header.title.clone(),
            kind: header.kind,
            text,
        });
    }
}

/// Walks normalized lines, recognising section headers and item boundaries.
///
/// The tracker holds only configuration; each [`track`](Self::track) call
/// folds over its input with a fresh accumulator.
pub struct SectionTracker<'a> {
    config: &'a ParsingConfig,
    vocabulary: Vec<SectionHeader>,
    item_marker_re: &'a Regex,
}

impl<'a> SectionTracker<'a> {
    pub fn new(config: &'a ParsingConfig) -> Self {
        Self {
            config,
            vocabulary: config.vocabulary(),
            item_marker_re: config.item_marker_re.as_ref().unwrap_or(&ITEM_MARKER_RE),
        }
    }

    /// The header `line` opens, if any.
    pub fn match_header(&self, line: &str) -> Option<&SectionHeader> {
        self.config.header_matcher().find(line, &self.vocabulary)
    }

    /// Split `lines` into items in document order.
    pub fn track<S: AsRef<str>>(&self, lines: &[S]) -> Vec<TrackedItem> {
        let min_len = self.config.min_generic_item_len();
        let mut scan = lines
            .iter()
            .fold(ScanState::default(), |scan, line| self.step(scan, line.as_ref()));
        scan.flush(min_len);

        tracing::debug!(items = scan.items.len(), "section tracking complete");
        scan.items
    }

    fn step(&self, mut scan: ScanState, line: &str) -> ScanState {
        let min_len = self.config.min_generic_item_len();

        if let Some(header) = self.match_header(line) {
            scan.flush(min_len);
            tracing::debug!(section = %header.title, line = %line, "section header");
            scan.current = Some(header.clone());
        } else if self.item_marker_re.is_match(line) {
            scan.flush(min_len);
        } else {
            scan.buffer.push(line.to_string());
        }
        scan
    }
}

/// Split `lines` into items using the default configuration.
pub fn track_sections<S: AsRef<str>>(lines: &[S]) -> Vec<TrackedItem> {
    track_sections_with_config(lines, &ParsingConfig::default())
}

pub(crate) fn track_sections_with_config<S: AsRef<str>>(
    lines: &[S],
    config: &ParsingConfig,
) -> Vec<TrackedItem> {
    SectionTracker::new(config).track(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ARTICLES_HEADER, ParsingConfigBuilder, TECH_HEADER};

    fn kinds(items: &[TrackedItem]) -> Vec<SectionKind> {
        items.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn test_articles_routing() {
        let lines = [
            ARTICLES_HEADER,
            "1.",
            "SILVA, J. . Title Example. Journal Name, v. 1,",
            "p. 1-10, 2020.",
            "2.",
            "SOUZA, M. . Outro. Revista, 2019.",
        ];
        let items = track_sections(&lines);
        assert_eq!(items.len(), 2);
        assert_eq!(kinds(&items), vec![SectionKind::Articles; 2]);
        assert_eq!(
            items[0].text,
            "SILVA, J. . Title Example. Journal Name, v. 1, p. 1-10, 2020."
        );
        assert_eq!(items[0].section, ARTICLES_HEADER);
    }

    #[test]
    fn test_header_change_flushes_buffer() {
        let lines = [TECH_HEADER, "1.", "Sistema de apoio. 2021.", "Bancas", "Banca de mestrado de Fulano"];
        let items = track_sections(&lines);
        assert_eq!(kinds(&items), vec![SectionKind::Tech, SectionKind::Generic]);
        assert_eq!(items[1].section, "Bancas");
    }

    #[test]
    fn test_consecutive_headers_produce_nothing() {
        let lines = [ARTICLES_HEADER, TECH_HEADER, "Resumo", "Bancas"];
        assert!(track_sections(&lines).is_empty());
    }

    #[test]
    fn test_text_before_first_header_is_discarded() {
        let lines = ["Maria Souza", "Bolsista de Produtividade em Pesquisa do CNPq", "1."];
        assert!(track_sections(&lines).is_empty());
    }

    #[test]
    fn test_no_headers_yields_nothing() {
        let lines = ["um", "2.", "dois", "três"];
        assert!(track_sections(&lines).is_empty());
    }

    #[test]
    fn test_generic_noise_filter() {
        let lines = ["Resumo", "abc", "1.", "  doze  ", "2.", "Texto   com\tespaços"];
        let items = track_sections(&lines);
        // "abc" and "doze" are too short
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text, "Texto com espaços");
    }

    #[test]
    fn test_generic_filter_does_not_apply_to_articles() {
        let lines = [ARTICLES_HEADER, "X"];
        let items = track_sections(&lines);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text, "X");
    }

    #[test]
    fn test_header_case_insensitive_and_canonical_title() {
        let lines = ["PRÊMIOS E TÍTULOS", "Prêmio de melhor tese, 2018."];
        let items = track_sections(&lines);
        assert_eq!(items[0].section, "Prêmios e títulos");
    }

    #[test]
    fn test_marker_lines_never_buffered() {
        let lines = ["Resumo", "1.", "2.", "3."];
        assert!(track_sections(&lines).is_empty());
    }

    #[test]
    fn test_exact_matcher_keeps_prefixed_line_as_content() {
        let config = ParsingConfigBuilder::new().exact_headers().build().unwrap();
        let lines = ["Resumo", "Bancas examinadoras diversas"];
        let items = track_sections_with_config(&lines, &config);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].section, "Resumo");
        assert_eq!(items[0].text, "Bancas examinadoras diversas");

        // The default prefix matcher treats the same line as a header
        assert!(track_sections(&lines).is_empty());
    }

    #[test]
    fn test_custom_min_generic_len() {
        let config = ParsingConfigBuilder::new().min_generic_item_len(0).build().unwrap();
        let items = track_sections_with_config(&["Resumo", "ok"], &config);
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_every_content_line_lands_in_exactly_one_item() {
        let lines = [
            "Maria Souza",
            "Professora titular de Economia",
            "Resumo",
            "Pesquisadora em economia regional.",
            "Atua em políticas públicas.",
            ARTICLES_HEADER,
            "1.",
            "2.",
            "1.",
            "SILVA, J. . Título A. Revista X, v. 1,",
            "p. 1-10, 2020. ISSN 1234-5678",
            "2.",
            "SOUZA, M. . Título B. Revista Y, 2019.",
            TECH_HEADER,
            "1.",
            "Sistema de apoio à decisão. 2021.",
            "Bancas",
            "1.",
            "abc",
            "2.",
            "Banca de mestrado de Fulano",
        ];
        // Headers, markers, pre-header text and the short "abc" are gone
        let kept = [
            "Pesquisadora em economia regional.",
            "Atua em políticas públicas.",
            "SILVA, J. . Título A. Revista X, v. 1,",
            "p. 1-10, 2020. ISSN 1234-5678",
            "SOUZA, M. . Título B. Revista Y, 2019.",
            "Sistema de apoio à decisão. 2021.",
            "Banca de mestrado de Fulano",
        ];

        let items = track_sections(&lines);
        let texts: Vec<&str> = items.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts.join(" "), kept.join(" "));
        for line in kept {
            let holders = items.iter().filter(|i| i.text.contains(line)).count();
            assert_eq!(holders, 1, "{line:?} should be in exactly one item");
        }
        assert_eq!(
            kinds(&items),
            vec![
                SectionKind::Generic,
                SectionKind::Articles,
                SectionKind::Articles,
                SectionKind::Tech,
                SectionKind::Generic,
            ]
        );
        assert_eq!(items[1].text, "SILVA, J. . Título A. Revista X, v. 1, p. 1-10, 2020. ISSN 1234-5678");
    }
}
