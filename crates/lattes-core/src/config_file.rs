use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub registry: Option<RegistryConfig>,
    pub parsing: Option<ParsingFileConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// JSON file holding the journal registry.
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsingFileConfig {
    /// `"prefix"` (default) or `"exact"`.
    pub header_match: Option<String>,
    /// Additional generic section titles appended to the built-in vocabulary.
    pub extra_headers: Option<Vec<String>>,
    /// Additional page-furniture phrases to drop.
    pub footer_phrases: Option<Vec<String>>,
    pub min_generic_item_len: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub color: Option<bool>,
}

/// Platform config directory path: `<config_dir>/lattes/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("lattes").join("config.toml"))
}

/// Load config by cascading CWD `.lattes.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".lattes.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config file");
            None
        }
    }
}

/// Take a field from `overlay` if set there, else from `base`.
fn pick<S, T>(overlay: Option<&S>, base: Option<&S>, field: impl Fn(&S) -> Option<T>) -> Option<T> {
    overlay.and_then(&field).or_else(|| base.and_then(&field))
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let (br, or) = (base.registry.as_ref(), overlay.registry.as_ref());
    let (bp, op) = (base.parsing.as_ref(), overlay.parsing.as_ref());
    let (bd, od) = (base.display.as_ref(), overlay.display.as_ref());

    ConfigFile {
        registry: Some(RegistryConfig {
            path: pick(or, br, |r| r.path.clone()),
        }),
        parsing: Some(ParsingFileConfig {
            header_match: pick(op, bp, |p| p.header_match.clone()),
            extra_headers: pick(op, bp, |p| p.extra_headers.clone()),
            footer_phrases: pick(op, bp, |p| p.footer_phrases.clone()),
            min_generic_item_len: pick(op, bp, |p| p.min_generic_item_len),
        }),
        display: Some(DisplayConfig {
            color: pick(od, bd, |d| d.color),
        }),
    }
}
