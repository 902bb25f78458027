use std::path::Path;

use thiserror::Error;

pub mod citation;
pub mod config;
pub mod extractor;
pub mod identifiers;
pub mod normalize;
pub mod profile;
pub mod section;
pub mod tech;
pub mod text_processing;

pub use config::{
    ExactHeaderMatcher, HeaderMatcher, ListOverride, ParsingConfig, ParsingConfigBuilder,
    PrefixHeaderMatcher, SectionHeader,
};
pub use extractor::CurriculumExtractor;
pub use section::{SectionTracker, TrackedItem};
// Re-export domain types from core (canonical definitions live there)
pub use lattes_core::{
    ArticleRecord, AuthorName, BackendError, CurriculumProfile, JournalRegistryEntry, PageText,
    Rating, Section, SectionKind, TechRecord, TextSource,
};

#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("document contains no text")]
    EmptyDocument,
    #[error("backend error: {0}")]
    Backend(#[from] lattes_core::BackendError),
}

/// Parse a curriculum file using the given backend for text extraction.
///
/// Pipeline:
/// 1. Extract per-page text fragments via `backend`
/// 2. Normalize fragments into lines, dropping page furniture
/// 3. Track section headers and item boundaries
/// 4. Parse article and tech-product items; keep other items as text
/// 5. Resolve each article's journal against `registry`
/// 6. Assemble the profile with name and last-update heuristics
pub fn parse_curriculum(
    path: &Path,
    backend: &dyn TextSource,
    registry: &[JournalRegistryEntry],
) -> Result<CurriculumProfile, ParsingError> {
    CurriculumExtractor::new()
        .with_registry(registry)
        .extract_via_backend(path, backend)
}
