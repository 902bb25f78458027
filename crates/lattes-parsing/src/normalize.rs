use lattes_core::PageText;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ParsingConfig;

/// A line holding nothing but a `DD/MM/YYYY` date (page stamp).
static DATE_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").unwrap());

/// Turn per-page text fragments into the document's ordered, cleaned lines.
///
/// Fragments are split on embedded newlines, trimmed, and kept only when
/// non-empty and not page furniture (footer phrase or bare date stamp).
/// Page order and within-page order are preserved.
pub fn normalize_pages(pages: &[PageText]) -> Vec<String> {
    normalize_pages_with_config(pages, &ParsingConfig::default())
}

pub(crate) fn normalize_pages_with_config(pages: &[PageText], config: &ParsingConfig) -> Vec<String> {
    normalize_lines_with_config(pages.iter().flat_map(|p| p.fragments.iter()), config)
}

/// Normalize a flat sequence of raw fragments.
pub fn normalize_lines<I, S>(fragments: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    normalize_lines_with_config(fragments, &ParsingConfig::default())
}

pub(crate) fn normalize_lines_with_config<I, S>(fragments: I, config: &ParsingConfig) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let footers = config.footer_phrases();
    let date_re = config.date_line_re.as_ref().unwrap_or(&DATE_LINE_RE);

    let mut lines = Vec::new();
    let mut dropped = 0usize;
    for fragment in fragments {
        for line in fragment.as_ref().lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if footers.iter().any(|f| line.contains(f.as_str())) || date_re.is_match(line) {
                dropped += 1;
                continue;
            }
            lines.push(line.to_string());
        }
    }

    tracing::debug!(lines = lines.len(), furniture = dropped, "normalized curriculum text");
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParsingConfigBuilder;

    #[test]
    fn test_drops_footer_and_date_lines() {
        let pages = vec![
            PageText::new(["Maria Souza", "Página gerada pelo Sistema Currículo Lattes em 12/03/2024 às 10:00:00"]),
            PageText::new(["12/03/2024", "Resumo"]),
        ];
        assert_eq!(normalize_pages(&pages), vec!["Maria Souza", "Resumo"]);
    }

    #[test]
    fn test_splits_embedded_newlines_and_trims() {
        let pages = vec![PageText::new(["  Dados Gerais \n\n  Nome: Maria  ", "\t"])];
        assert_eq!(normalize_pages(&pages), vec!["Dados Gerais", "Nome: Maria"]);
    }

    #[test]
    fn test_date_inside_text_is_kept() {
        let lines = normalize_lines(["Defesa em 12/03/2024", "12/03/2024 "]);
        assert_eq!(lines, vec!["Defesa em 12/03/2024"]);
    }

    #[test]
    fn test_preserves_page_order() {
        let pages = vec![PageText::new(["a1", "a2"]), PageText::new(["b1"]), PageText::default()];
        assert_eq!(normalize_pages(&pages), vec!["a1", "a2", "b1"]);
    }

    #[test]
    fn test_extra_footer_phrase() {
        let config = ParsingConfigBuilder::new()
            .add_footer_phrase("Documento confidencial".to_string())
            .build()
            .unwrap();
        let lines = normalize_lines_with_config(
            ["Documento confidencial - p. 3", "Página gerada pelo Sistema Currículo Lattes", "Texto"],
            &config,
        );
        assert_eq!(lines, vec!["Texto"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(normalize_pages(&[]).is_empty());
    }
}
