use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod backend;
pub mod config_file;
pub mod matching;
pub mod registry;

// Re-export for convenience
pub use backend::{BackendError, PageText, TextSource};
pub use matching::{JournalMatch, JournalMatcher, normalize_issn, normalize_journal_name};
pub use registry::{load_registry, parse_registry};

/// Placeholder stored in text fields the parser could not recover.
pub const NOT_AVAILABLE: &str = "N/D";

/// Journal classification tier, from best (`MB`) to not rated (`I`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "MB")]
    Mb,
    B,
    R,
    F,
    /// Insufficient / not rated.
    #[default]
    I,
}

impl Rating {
    /// The tier assigned when a citation matches no registry entry.
    pub fn lowest() -> Self {
        Rating::I
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Mb => "MB",
            Rating::B => "B",
            Rating::R => "R",
            Rating::F => "F",
            Rating::I => "I",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a section's items are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SectionKind {
    /// Journal articles, routed to the citation parser.
    Articles,
    /// Technical products, routed to the tech-product parser.
    Tech,
    /// Any other section; items are kept as collapsed text.
    Generic,
}

/// A labeled block of raw item texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub kind: SectionKind,
    pub items: Vec<String>,
}

/// An author as written in a citation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorName {
    pub name: String,
    /// Filled in by downstream annotation, never by the parser.
    pub institution: Option<String>,
}

impl AuthorName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            institution: None,
        }
    }
}

/// A journal article recovered from the articles section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    pub id: String,
    /// The joined item text exactly as it left the section tracker.
    pub raw_text: String,
    pub title: String,
    pub authors: Vec<AuthorName>,
    pub journal_name: String,
    pub issn: Option<String>,
    pub year: i32,
    pub doi: Option<String>,
    pub matched_journal_id: Option<u64>,
    pub rating: Rating,
    pub points: u32,
}

/// A technical product recovered from the tech section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechRecord {
    pub id: String,
    pub raw_text: String,
    pub title: String,
    /// `0` when the text carries no year.
    pub year: i32,
    pub description: String,
}

/// The structured result of parsing one curriculum document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumProfile {
    pub name: String,
    pub last_update: NaiveDate,
    pub articles: Vec<ArticleRecord>,
    pub tech_products: Vec<TechRecord>,
    pub generic_sections: Vec<Section>,
}

impl CurriculumProfile {
    /// Look up a generic section by its header title.
    pub fn generic_section(&self, title: &str) -> Option<&Section> {
        self.generic_sections.iter().find(|s| s.title == title)
    }
}

/// One journal of the external ranking registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalRegistryEntry {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub issn_print: String,
    #[serde(default)]
    pub issn_electronic: String,
    #[serde(default)]
    pub rating: Rating,
    #[serde(default)]
    pub points: u32,
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid registry JSON: {0}")]
    Json(#[from] serde_json::Error),
}
