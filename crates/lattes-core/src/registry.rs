use std::path::Path;

use crate::{CoreError, JournalRegistryEntry};

/// Parse a registry from a JSON array of [`JournalRegistryEntry`].
pub fn parse_registry(json: &str) -> Result<Vec<JournalRegistryEntry>, CoreError> {
    Ok(serde_json::from_str(json)?)
}

/// Load the journal registry from a JSON file on disk.
pub fn load_registry(path: &Path) -> Result<Vec<JournalRegistryEntry>, CoreError> {
    let content = std::fs::read_to_string(path)?;
    let entries = parse_registry(&content)?;
    tracing::info!(path = %path.display(), entries = entries.len(), "loaded journal registry");
    Ok(entries)
}
