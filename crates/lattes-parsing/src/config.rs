use std::fmt;
use std::sync::Arc;

use lattes_core::SectionKind;
use regex::Regex;

/// Section that routes to the citation parser.
pub const ARTICLES_HEADER: &str = "Artigos completos publicados em periódicos";
/// Section that routes to the tech-product parser.
pub const TECH_HEADER: &str = "Produtos tecnológicos";

/// Canonical section titles of a Lattes curriculum, in match order.
///
/// Matching is first-hit over this list, so a shorter title listed before a
/// longer one that shares its prefix (e.g. "Orientações") wins for lines
/// that start with both.
pub const DEFAULT_HEADER_TITLES: &[&str] = &[
    "Dados Gerais",
    "Resumo",
    "Identificação",
    "Endereço",
    "Formação acadêmica/titulação",
    "Pós-doutorado",
    "Atuação Profissional",
    "Projetos de pesquisa",
    "Projetos de extensão",
    "Membro de corpo editorial",
    "Revisor de periódico",
    "Revisor de projeto de fomento",
    "Áreas de atuação",
    "Prêmios e títulos",
    "Produções",
    "Produção bibliográfica",
    ARTICLES_HEADER,
    "Livros publicados",
    "Capítulos de livros publicados",
    "Textos em jornais de notícias/revistas",
    "Trabalhos completos publicados em anais de congressos",
    "Resumos expandidos publicados em anais de congressos",
    "Resumos publicados em anais de congressos",
    "Artigos aceitos para publicação",
    "Apresentações de Trabalho",
    "Demais tipos de produção bibliográfica",
    "Produção técnica",
    "Assessoria e consultoria",
    TECH_HEADER,
    "Processos ou técnicas",
    "Trabalhos técnicos",
    "Bancas",
    "Participação em bancas de trabalhos de conclusão",
    "Participação em bancas de comissões julgadoras",
    "Eventos",
    "Participação em eventos",
    "Organização de eventos",
    "Orientações",
    "Orientações e supervisões em andamento",
    "Orientações e supervisões concluídas",
    "Inovação",
    "Patentes e registros",
    "Educação e Popularização de C & T",
];

/// Footer stamped on every page by the curriculum generator.
pub const DEFAULT_FOOTER_PHRASES: &[&str] = &["Página gerada pelo Sistema Currículo Lattes"];

/// Lines containing any of these are never taken as the researcher's name.
pub const DEFAULT_NAME_EXCLUSIONS: &[&str] = &["Lattes", "CNPq", "http"];

/// A known section title and how its items are parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeader {
    pub title: String,
    pub kind: SectionKind,
    folded: String,
}

impl SectionHeader {
    /// Surrounding whitespace is trimmed from `title`.
    pub fn new(title: impl Into<String>, kind: SectionKind) -> Self {
        let title = title.into().trim().to_string();
        let folded = title.to_lowercase();
        Self {
            title,
            kind,
            folded,
        }
    }

    pub fn generic(title: impl Into<String>) -> Self {
        Self::new(title, SectionKind::Generic)
    }

    /// Lowercased title used for case-insensitive comparison.
    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// A blank title would prefix-match every short line.
    pub fn is_blank(&self) -> bool {
        self.folded.is_empty()
    }
}

/// The built-in header vocabulary with the two specialised sections tagged.
pub fn default_vocabulary() -> Vec<SectionHeader> {
    DEFAULT_HEADER_TITLES
        .iter()
        .map(|&title| {
            let kind = match title {
                ARTICLES_HEADER => SectionKind::Articles,
                TECH_HEADER => SectionKind::Tech,
                _ => SectionKind::Generic,
            };
            SectionHeader::new(title, kind)
        })
        .collect()
}

/// Policy deciding whether a line opens a new section.
///
/// Implementations scan `vocabulary` in order and return the first header
/// the line matches.
pub trait HeaderMatcher: fmt::Debug + Send + Sync {
    fn find<'v>(&self, line: &str, vocabulary: &'v [SectionHeader]) -> Option<&'v SectionHeader>;
}

/// Exact case-insensitive match, or a case-insensitive prefix match for
/// lines shorter than `max_prefix_line_len` characters.
#[derive(Debug, Clone, Copy)]
pub struct PrefixHeaderMatcher {
    pub max_prefix_line_len: usize,
}

impl Default for PrefixHeaderMatcher {
    fn default() -> Self {
        Self {
            max_prefix_line_len: 50,
        }
    }
}

impl HeaderMatcher for PrefixHeaderMatcher {
    fn find<'v>(&self, line: &str, vocabulary: &'v [SectionHeader]) -> Option<&'v SectionHeader> {
        let folded = line.to_lowercase();
        let short = line.chars().count() < self.max_prefix_line_len;
        vocabulary
            .iter()
            .filter(|h| !h.is_blank())
            .find(|h| folded == h.folded() || (short && folded.starts_with(h.folded())))
    }
}

/// Exact case-insensitive match only.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactHeaderMatcher;

impl HeaderMatcher for ExactHeaderMatcher {
    fn find<'v>(&self, line: &str, vocabulary: &'v [SectionHeader]) -> Option<&'v SectionHeader> {
        let folded = line.to_lowercase();
        vocabulary
            .iter()
            .filter(|h| !h.is_blank())
            .find(|h| folded == h.folded())
    }
}

/// How a configured list relates to its built-in defaults.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    #[default]
    Default,
    Replace(Vec<T>),
    /// Defaults first, then these values.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// The effective list.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }

    fn push(&mut self, value: T) {
        match self {
            ListOverride::Replace(v) | ListOverride::Extend(v) => v.push(value),
            ListOverride::Default => *self = ListOverride::Extend(vec![value]),
        }
    }
}

/// Configuration for the curriculum parsing pipeline.
///
/// All regex fields are `Option<Regex>`; `None` means "use the built-in default".
/// Use [`ParsingConfigBuilder`] to construct with string patterns.
#[derive(Debug, Clone)]
pub struct ParsingConfig {
    // ── section.rs ──
    /// Known section titles, scanned in order.
    pub(crate) headers: ListOverride<SectionHeader>,
    /// Rule deciding whether a line is a section header.
    pub(crate) header_matcher: Arc<dyn HeaderMatcher>,
    /// Regex for item-start marker lines: `1.`, `2.`, etc.
    pub(crate) item_marker_re: Option<Regex>,
    /// Generic items must be longer than this many characters to be kept.
    pub(crate) min_generic_item_len: usize,

    // ── normalize.rs ──
    /// Page furniture phrases; any line containing one is dropped.
    pub(crate) footer_phrases: ListOverride<String>,
    /// Regex for bare date lines that are dropped.
    pub(crate) date_line_re: Option<Regex>,

    // ── citation.rs ──
    /// Regex locating the ISSN marker; capture group 1 is the ISSN.
    pub(crate) issn_re: Option<Regex>,
    /// Regex locating the start of volume/issue/page/year metadata.
    pub(crate) metadata_anchor_re: Option<Regex>,

    // ── tech.rs ──
    /// Characters taken as title when a tech item has no segment structure.
    pub(crate) tech_title_fallback_len: usize,

    // ── profile.rs ──
    pub(crate) name_exclusions: ListOverride<String>,
    pub(crate) default_profile_name: String,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            headers: ListOverride::Default,
            header_matcher: Arc::new(PrefixHeaderMatcher::default()),
            item_marker_re: None,
            min_generic_item_len: 5,
            footer_phrases: ListOverride::Default,
            date_line_re: None,
            issn_re: None,
            metadata_anchor_re: None,
            tech_title_fallback_len: 50,
            name_exclusions: ListOverride::Default,
            default_profile_name: "Pesquisador".to_string(),
        }
    }
}

impl ParsingConfig {
    /// The effective header vocabulary. Blank titles are dropped.
    pub fn vocabulary(&self) -> Vec<SectionHeader> {
        let mut vocabulary = self.headers.resolve(&default_vocabulary());
        vocabulary.retain(|h| !h.is_blank());
        vocabulary
    }

    pub(crate) fn footer_phrases(&self) -> Vec<String> {
        let defaults: Vec<String> = DEFAULT_FOOTER_PHRASES.iter().map(|s| s.to_string()).collect();
        self.footer_phrases.resolve(&defaults)
    }

    pub(crate) fn name_exclusions(&self) -> Vec<String> {
        let defaults: Vec<String> = DEFAULT_NAME_EXCLUSIONS.iter().map(|s| s.to_string()).collect();
        self.name_exclusions.resolve(&defaults)
    }

    pub fn header_matcher(&self) -> &dyn HeaderMatcher {
        self.header_matcher.as_ref()
    }

    pub fn min_generic_item_len(&self) -> usize {
        self.min_generic_item_len
    }
}

/// Builder for [`ParsingConfig`].
///
/// Patterns are kept as strings until [`build()`](Self::build), which
/// compiles them and returns the first `regex::Error`.
#[derive(Debug, Clone, Default)]
pub struct ParsingConfigBuilder {
    headers: ListOverride<SectionHeader>,
    header_matcher: Option<Arc<dyn HeaderMatcher>>,
    item_marker_re: Option<String>,
    min_generic_item_len: Option<usize>,
    footer_phrases: ListOverride<String>,
    date_line_re: Option<String>,
    issn_re: Option<String>,
    metadata_anchor_re: Option<String>,
    tech_title_fallback_len: Option<usize>,
    name_exclusions: ListOverride<String>,
    default_profile_name: Option<String>,
}

impl ParsingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Header vocabulary ──

    pub fn set_headers(mut self, headers: Vec<SectionHeader>) -> Self {
        self.headers = ListOverride::Replace(headers);
        self
    }

    pub fn add_header(mut self, header: SectionHeader) -> Self {
        self.headers.push(header);
        self
    }

    pub fn header_matcher(mut self, matcher: Arc<dyn HeaderMatcher>) -> Self {
        self.header_matcher = Some(matcher);
        self
    }

    /// Shorthand for an [`ExactHeaderMatcher`].
    pub fn exact_headers(self) -> Self {
        self.header_matcher(Arc::new(ExactHeaderMatcher))
    }

    // ── Items ──

    pub fn item_marker_regex(mut self, pattern: &str) -> Self {
        self.item_marker_re = Some(pattern.to_string());
        self
    }

    pub fn min_generic_item_len(mut self, n: usize) -> Self {
        self.min_generic_item_len = Some(n);
        self
    }

    // ── Page furniture ──

    pub fn set_footer_phrases(mut self, phrases: Vec<String>) -> Self {
        self.footer_phrases = ListOverride::Replace(phrases);
        self
    }

    pub fn add_footer_phrase(mut self, phrase: String) -> Self {
        self.footer_phrases.push(phrase);
        self
    }

    pub fn date_line_regex(mut self, pattern: &str) -> Self {
        self.date_line_re = Some(pattern.to_string());
        self
    }

    // ── Citations ──

    pub fn issn_regex(mut self, pattern: &str) -> Self {
        self.issn_re = Some(pattern.to_string());
        self
    }

    pub fn metadata_anchor_regex(mut self, pattern: &str) -> Self {
        self.metadata_anchor_re = Some(pattern.to_string());
        self
    }

    pub fn tech_title_fallback_len(mut self, n: usize) -> Self {
        self.tech_title_fallback_len = Some(n);
        self
    }

    // ── Profile ──

    pub fn set_name_exclusions(mut self, exclusions: Vec<String>) -> Self {
        self.name_exclusions = ListOverride::Replace(exclusions);
        self
    }

    pub fn default_profile_name(mut self, name: &str) -> Self {
        self.default_profile_name = Some(name.to_string());
        self
    }

    pub fn build(self) -> Result<ParsingConfig, regex::Error> {
        let compile = |opt: Option<String>| -> Result<Option<Regex>, regex::Error> {
            opt.map(|p| Regex::new(&p)).transpose()
        };
        let defaults = ParsingConfig::default();

        Ok(ParsingConfig {
            headers: self.headers,
            header_matcher: self.header_matcher.unwrap_or(defaults.header_matcher),
            item_marker_re: compile(self.item_marker_re)?,
            min_generic_item_len: self
                .min_generic_item_len
                .unwrap_or(defaults.min_generic_item_len),
            footer_phrases: self.footer_phrases,
            date_line_re: compile(self.date_line_re)?,
            issn_re: compile(self.issn_re)?,
            metadata_anchor_re: compile(self.metadata_anchor_re)?,
            tech_title_fallback_len: self
                .tech_title_fallback_len
                .unwrap_or(defaults.tech_title_fallback_len),
            name_exclusions: self.name_exclusions,
            default_profile_name: self
                .default_profile_name
                .unwrap_or(defaults.default_profile_name),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ParsingConfig::default();
        assert_eq!(config.min_generic_item_len, 5);
        assert_eq!(config.tech_title_fallback_len, 50);
        assert_eq!(config.default_profile_name, "Pesquisador");
        assert_eq!(config.vocabulary().len(), DEFAULT_HEADER_TITLES.len());
    }

    #[test]
    fn test_default_vocabulary_kinds() {
        let vocabulary = default_vocabulary();
        let special: Vec<_> = vocabulary
            .iter()
            .filter(|h| h.kind != SectionKind::Generic)
            .map(|h| (h.title.as_str(), h.kind))
            .collect();
        assert_eq!(
            special,
            vec![
                (ARTICLES_HEADER, SectionKind::Articles),
                (TECH_HEADER, SectionKind::Tech),
            ]
        );
    }

    #[test]
    fn test_prefix_matcher_exact_and_prefix() {
        let vocabulary = default_vocabulary();
        let m = PrefixHeaderMatcher::default();
        assert_eq!(m.find("PRODUTOS TECNOLÓGICOS", &vocabulary).unwrap().title, TECH_HEADER);
        assert_eq!(m.find("Bancas (5)", &vocabulary).unwrap().title, "Bancas");
        assert!(m.find("Silva, J. Um estudo qualquer", &vocabulary).is_none());
    }

    #[test]
    fn test_blank_headers_never_match() {
        let vocabulary = vec![SectionHeader::generic("  "), SectionHeader::generic(" Resumo ")];
        assert_eq!(vocabulary[1].title, "Resumo");
        let m = PrefixHeaderMatcher::default();
        assert!(m.find("Professora associada.", &vocabulary).is_none());
        assert_eq!(m.find("Resumo", &vocabulary).unwrap().title, "Resumo");
        assert!(ExactHeaderMatcher.find("", &vocabulary).is_none());
    }

    #[test]
    fn test_blank_extra_header_dropped_from_vocabulary() {
        let config = ParsingConfigBuilder::new()
            .add_header(SectionHeader::generic(""))
            .build()
            .unwrap();
        let vocabulary = config.vocabulary();
        assert_eq!(vocabulary.len(), DEFAULT_HEADER_TITLES.len());
        assert!(vocabulary.iter().all(|h| !h.is_blank()));
    }

    #[test]
    fn test_prefix_matcher_ignores_prefix_on_long_lines() {
        let vocabulary = vec![SectionHeader::generic("Eventos")];
        let m = PrefixHeaderMatcher::default();
        let long = "Eventos acadêmicos organizados pelo departamento entre 2019 e 2022";
        assert!(long.chars().count() >= 50);
        assert!(m.find(long, &vocabulary).is_none());
        // Exact matches are accepted regardless of length
        let title = "x".repeat(60);
        let vocabulary = vec![SectionHeader::generic(title.clone())];
        assert!(m.find(&title.to_uppercase(), &vocabulary).is_some());
    }

    #[test]
    fn test_prefix_matcher_first_match_wins() {
        let vocabulary = default_vocabulary();
        let m = PrefixHeaderMatcher::default();
        let found = m.find("Orientações e supervisões concluídas", &vocabulary).unwrap();
        assert_eq!(found.title, "Orientações");
    }

    #[test]
    fn test_exact_matcher() {
        let vocabulary = default_vocabulary();
        let m = ExactHeaderMatcher;
        assert!(m.find("bancas", &vocabulary).is_some());
        assert!(m.find("Bancas (5)", &vocabulary).is_none());
        assert_eq!(
            m.find("Orientações e supervisões concluídas", &vocabulary).unwrap().title,
            "Orientações e supervisões concluídas"
        );
    }

    #[test]
    fn test_builder_basic() {
        let config = ParsingConfigBuilder::new()
            .min_generic_item_len(10)
            .tech_title_fallback_len(30)
            .default_profile_name("Researcher")
            .build()
            .unwrap();
        assert_eq!(config.min_generic_item_len, 10);
        assert_eq!(config.tech_title_fallback_len, 30);
        assert_eq!(config.default_profile_name, "Researcher");
    }

    #[test]
    fn test_builder_add_header_extends_defaults() {
        let config = ParsingConfigBuilder::new()
            .add_header(SectionHeader::generic("Outras informações relevantes"))
            .build()
            .unwrap();
        let vocabulary = config.vocabulary();
        assert_eq!(vocabulary.len(), DEFAULT_HEADER_TITLES.len() + 1);
        assert_eq!(vocabulary.last().unwrap().title, "Outras informações relevantes");
    }

    #[test]
    fn test_builder_set_headers_replaces_defaults() {
        let config = ParsingConfigBuilder::new()
            .set_headers(vec![SectionHeader::new("Journal articles", SectionKind::Articles)])
            .build()
            .unwrap();
        assert_eq!(config.vocabulary().len(), 1);
    }

    #[test]
    fn test_builder_invalid_regex() {
        let result = ParsingConfigBuilder::new().issn_regex(r"[invalid").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_list_override_resolve() {
        let defaults = vec!["a".to_string(), "b".to_string()];

        let d: ListOverride<String> = ListOverride::Default;
        assert_eq!(d.resolve(&defaults), defaults);

        let r: ListOverride<String> = ListOverride::Replace(vec!["x".to_string()]);
        assert_eq!(r.resolve(&defaults), vec!["x".to_string()]);

        let e: ListOverride<String> = ListOverride::Extend(vec!["c".to_string()]);
        assert_eq!(
            e.resolve(&defaults),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }
}
