use std::collections::HashMap;

use crate::{JournalRegistryEntry, NOT_AVAILABLE, Rating};

/// Names shorter than this (after normalisation) are too garbled to match on.
pub const DEFAULT_MIN_NAME_LEN: usize = 3;

/// Outcome of resolving a citation against the journal registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JournalMatch {
    pub rating: Rating,
    pub points: u32,
    pub matched_journal_id: Option<u64>,
}

impl JournalMatch {
    /// Lowest tier, zero points, no registry entry.
    pub fn unmatched() -> Self {
        Self {
            rating: Rating::lowest(),
            points: 0,
            matched_journal_id: None,
        }
    }

    fn from_entry(entry: &JournalRegistryEntry) -> Self {
        Self {
            rating: entry.rating,
            points: entry.points,
            matched_journal_id: Some(entry.id),
        }
    }
}

/// Strip hyphens from an ISSN so `1234-5678` and `12345678` compare equal.
pub fn normalize_issn(issn: &str) -> String {
    issn.trim().chars().filter(|c| *c != '-').collect()
}

/// Normalize a journal name for comparison: lowercase ASCII alphanumerics only.
///
/// Accented letters are dropped rather than folded, so both sides of a
/// comparison must go through this same function.
pub fn normalize_journal_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Exact-match resolver over a read-only journal registry.
///
/// Lookup order is ISSN first (print or electronic, hyphens ignored), then
/// normalised journal name. There is no fuzzy matching: a near miss is
/// reported as unmatched rather than risk attributing the wrong rating.
/// When several registry entries share a key, the earliest one wins.
#[derive(Debug, Clone)]
pub struct JournalMatcher {
    entries: Vec<JournalRegistryEntry>,
    by_issn: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
    min_name_len: usize,
}

impl Default for JournalMatcher {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl JournalMatcher {
    pub fn new(registry: &[JournalRegistryEntry]) -> Self {
        let mut by_issn = HashMap::new();
        let mut by_name = HashMap::new();

        for (idx, entry) in registry.iter().enumerate() {
            for issn in [&entry.issn_print, &entry.issn_electronic] {
                let key = normalize_issn(issn);
                if !key.is_empty() {
                    by_issn.entry(key).or_insert(idx);
                }
            }
            let name = normalize_journal_name(&entry.name);
            if !name.is_empty() {
                by_name.entry(name).or_insert(idx);
            }
        }

        tracing::debug!(
            entries = registry.len(),
            issns = by_issn.len(),
            names = by_name.len(),
            "journal index built"
        );

        Self {
            entries: registry.to_vec(),
            by_issn,
            by_name,
            min_name_len: DEFAULT_MIN_NAME_LEN,
        }
    }

    /// Override the minimum normalised name length required for a name lookup.
    pub fn with_min_name_len(mut self, len: usize) -> Self {
        self.min_name_len = len;
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a parsed journal name and optional ISSN to a rating.
    pub fn resolve(&self, journal_name: &str, issn: Option<&str>) -> JournalMatch {
        if let Some(issn) = issn {
            let key = normalize_issn(issn);
            if !key.is_empty()
                && let Some(&idx) = self.by_issn.get(&key)
            {
                tracing::debug!(issn = %issn, id = self.entries[idx].id, "journal matched by ISSN");
                return JournalMatch::from_entry(&self.entries[idx]);
            }
        }

        let name = journal_name.trim();
        if !name.is_empty() && name != NOT_AVAILABLE {
            let key = normalize_journal_name(name);
            if key.len() > self.min_name_len
                && let Some(&idx) = self.by_name.get(&key)
            {
                tracing::debug!(journal = %name, id = self.entries[idx].id, "journal matched by name");
                return JournalMatch::from_entry(&self.entries[idx]);
            }
        }

        JournalMatch::unmatched()
    }
}
