use lattes_core::TechRecord;

use crate::config::ParsingConfig;
use crate::text_processing::{last_year, split_segments, truncate_chars};

/// Parse a technological-product item.
///
/// The title is the second period-delimited segment; items with no
/// segment structure use their first characters instead. A missing year
/// is reported as `0`.
pub fn parse_tech(text: &str, id: String) -> TechRecord {
    parse_tech_with_config(text, id, &ParsingConfig::default())
}

pub(crate) fn parse_tech_with_config(text: &str, id: String, config: &ParsingConfig) -> TechRecord {
    let segments = split_segments(text);
    let title = match segments.get(1) {
        Some(title) => title.clone(),
        None => truncate_chars(text.trim(), config.tech_title_fallback_len),
    };

    TechRecord {
        id,
        raw_text: text.to_string(),
        title,
        year: last_year(text).unwrap_or(0),
        description: text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_is_second_segment() {
        let t = parse_tech("AUTOR, X. . Sistema de Apoio à Decisão. 2021. Software.", "tech-0".into());
        assert_eq!(t.title, "Sistema de Apoio à Decisão");
        assert_eq!(t.year, 2021);
        assert_eq!(t.description, t.raw_text);
    }

    #[test]
    fn test_title_without_author_terminator() {
        let t = parse_tech("Protótipo. Plataforma web", "tech-1".into());
        assert_eq!(t.title, "Plataforma web");
    }

    #[test]
    fn test_unstructured_title_truncated() {
        let text = "Aplicativo móvel para monitoramento de qualidade da água em reservatórios";
        let t = parse_tech(text, "tech-2".into());
        assert_eq!(t.title.chars().count(), 50);
        assert!(text.starts_with(&t.title));
        assert_eq!(t.year, 0);
    }

    #[test]
    fn test_uses_last_year() {
        let t = parse_tech("A, B. . Produto registrado em 2019. Atualizado 2022", "tech-3".into());
        assert_eq!(t.year, 2022);
    }
}
