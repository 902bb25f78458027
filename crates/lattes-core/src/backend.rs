use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open document: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The text fragments of one page, in reading order.
///
/// Fragments are whatever unit the extractor emits: whole lines, pieces of
/// lines, or runs containing embedded newlines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageText {
    pub fragments: Vec<String>,
}

impl PageText {
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fragments: fragments.into_iter().map(Into::into).collect(),
        }
    }
}

/// Trait for document text extraction backends.
///
/// Implementors provide the low-level text extraction step; the parsing
/// pipeline (line normalisation, section tracking, citation parsing)
/// lives in `lattes_parsing::CurriculumExtractor`. All pages are returned
/// at once, in page order.
pub trait TextSource: Send + Sync {
    fn extract_pages(&self, path: &Path) -> Result<Vec<PageText>, BackendError>;
}
