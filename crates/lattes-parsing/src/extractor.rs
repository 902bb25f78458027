use std::path::Path;

use chrono::{Datelike, Local, NaiveDate};
use lattes_core::{
    CurriculumProfile, JournalMatcher, JournalRegistryEntry, PageText, SectionKind, TextSource,
};

use crate::config::ParsingConfig;
use crate::section::{SectionTracker, TrackedItem};
use crate::{ParsingError, citation, normalize, profile, tech};

/// A configurable curriculum extraction pipeline.
///
/// Holds a [`ParsingConfig`], the journal registry index and a reference
/// date, and exposes each pipeline step as a method. The reference date is
/// fixed at construction so repeated parses of the same input are identical.
pub struct CurriculumExtractor {
    config: ParsingConfig,
    matcher: JournalMatcher,
    reference_date: NaiveDate,
}

impl Default for CurriculumExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl CurriculumExtractor {
    /// Create an extractor with default configuration and an empty registry.
    pub fn new() -> Self {
        Self::with_config(ParsingConfig::default())
    }

    /// Create an extractor with a custom configuration.
    pub fn with_config(config: ParsingConfig) -> Self {
        Self {
            config,
            matcher: JournalMatcher::default(),
            reference_date: Local::now().date_naive(),
        }
    }

    /// Index `registry` for journal resolution.
    pub fn with_registry(self, registry: &[JournalRegistryEntry]) -> Self {
        self.with_matcher(JournalMatcher::new(registry))
    }

    pub fn with_matcher(mut self, matcher: JournalMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Pin the date used for missing update stamps and missing article years.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = date;
        self
    }

    /// Get a reference to the current config.
    pub fn config(&self) -> &ParsingConfig {
        &self.config
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    /// Clean per-page fragments into document lines (step 1).
    pub fn normalize(&self, pages: &[PageText]) -> Vec<String> {
        normalize::normalize_pages_with_config(pages, &self.config)
    }

    /// Split lines into section-tagged items (step 2).
    pub fn track<S: AsRef<str>>(&self, lines: &[S]) -> Vec<TrackedItem> {
        SectionTracker::new(&self.config).track(lines)
    }

    /// Parse one article item (step 3).
    pub fn parse_article(&self, text: &str, id: String) -> lattes_core::ArticleRecord {
        citation::parse_article_with_config(
            text,
            id,
            self.reference_date.year(),
            &self.matcher,
            &self.config,
        )
    }

    /// Parse one technological-product item (step 3).
    pub fn parse_tech(&self, text: &str, id: String) -> lattes_core::TechRecord {
        tech::parse_tech_with_config(text, id, &self.config)
    }

    /// Run the full pipeline on a document read through `backend`.
    pub fn extract_via_backend(
        &self,
        path: &Path,
        backend: &dyn TextSource,
    ) -> Result<CurriculumProfile, ParsingError> {
        let pages = backend.extract_pages(path)?;
        tracing::info!(path = %path.display(), pages = pages.len(), "extracted curriculum text");
        self.parse_pages(&pages)
    }

    /// Run the pipeline on already-extracted pages.
    pub fn parse_pages(&self, pages: &[PageText]) -> Result<CurriculumProfile, ParsingError> {
        let lines = self.normalize(pages);
        self.assemble(&lines)
    }

    /// Run the pipeline on a flat sequence of raw lines.
    ///
    /// Lines go through the same normalisation as page fragments, so
    /// footers, date stamps and blank lines are dropped here too.
    pub fn parse_lines<S: AsRef<str>>(&self, lines: &[S]) -> Result<CurriculumProfile, ParsingError> {
        let lines = normalize::normalize_lines_with_config(lines, &self.config);
        self.assemble(&lines)
    }

    fn assemble(&self, lines: &[String]) -> Result<CurriculumProfile, ParsingError> {
        if lines.is_empty() {
            tracing::warn!("no text left after normalisation");
            return Err(ParsingError::EmptyDocument);
        }

        let mut assembler = profile::ProfileAssembler::new();
        for item in self.track(lines) {
            match item.kind {
                SectionKind::Articles => {
                    let id = assembler.next_article_id();
                    assembler.push_article(self.parse_article(&item.text, id));
                }
                SectionKind::Tech => {
                    let id = assembler.next_tech_id();
                    assembler.push_tech(self.parse_tech(&item.text, id));
                }
                SectionKind::Generic => assembler.push_generic(&item.section, item.text),
            }
        }

        let name = profile::detect_name_with_config(lines, &self.config)
            .unwrap_or_else(|| self.config.default_profile_name.clone());
        let last_update = profile::detect_last_update(lines).unwrap_or(self.reference_date);
        let profile = assembler.finish(name, last_update);

        tracing::info!(
            articles = profile.articles.len(),
            tech_products = profile.tech_products.len(),
            sections = profile.generic_sections.len(),
            "curriculum parsed"
        );
        Ok(profile)
    }
}
