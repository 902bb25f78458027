use std::path::Path;

use lattes_core::{BackendError, PageText, TextSource};

/// Page separator emitted by `pdftotext` and similar extractors.
pub const FORM_FEED: char = '\x0c';

/// Reads a UTF-8 text dump, one page per form-feed-separated block.
///
/// Each line of a page becomes one fragment. A trailing form feed (which
/// `pdftotext` writes after the last page) does not produce an empty page.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextBackend;

impl PlainTextBackend {
    pub fn new() -> Self {
        Self
    }

    /// Split already-loaded text into pages.
    pub fn pages_from_str(text: &str) -> Vec<PageText> {
        let text = text.strip_suffix(FORM_FEED).unwrap_or(text);
        text.split(FORM_FEED).map(|page| PageText::new(page.lines())).collect()
    }
}

impl TextSource for PlainTextBackend {
    fn extract_pages(&self, path: &Path) -> Result<Vec<PageText>, BackendError> {
        let bytes = std::fs::read(path)?;
        let text = String::from_utf8(bytes)
            .map_err(|e| BackendError::ExtractionError(format!("{}: {e}", path.display())))?;
        let pages = Self::pages_from_str(&text);
        tracing::debug!(path = %path.display(), pages = pages.len(), "read plain-text pages");
        Ok(pages)
    }
}

/// Reads pre-extracted pages from JSON: `[["fragment", ...], ...]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPagesBackend;

impl JsonPagesBackend {
    pub fn new() -> Self {
        Self
    }

    pub fn pages_from_str(json: &str) -> Result<Vec<PageText>, BackendError> {
        decode_pages(json).map_err(|e| BackendError::ExtractionError(e.to_string()))
    }
}

fn decode_pages(json: &str) -> Result<Vec<PageText>, serde_json::Error> {
    let raw: Vec<Vec<String>> = serde_json::from_str(json)?;
    Ok(raw.into_iter().map(PageText::new).collect())
}

impl TextSource for JsonPagesBackend {
    fn extract_pages(&self, path: &Path) -> Result<Vec<PageText>, BackendError> {
        let content = std::fs::read_to_string(path)?;
        let pages = decode_pages(&content)
            .map_err(|e| BackendError::ExtractionError(format!("{}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), pages = pages.len(), "read JSON pages");
        Ok(pages)
    }
}

/// Pick a backend from the file extension: `.json` reads JSON pages,
/// anything else is treated as plain text.
pub fn backend_for_path(path: &Path) -> Box<dyn TextSource> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        Box::new(JsonPagesBackend)
    } else {
        Box::new(PlainTextBackend)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_plain_text_pages() {
        let pages = PlainTextBackend::pages_from_str("Maria\nResumo\n\x0cBancas\nBanca A\n\x0c");
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].fragments, vec!["Maria", "Resumo"]);
        assert_eq!(pages[1].fragments, vec!["Bancas", "Banca A"]);
    }

    #[test]
    fn test_plain_text_without_form_feed_is_one_page() {
        let pages = PlainTextBackend::pages_from_str("a\nb");
        assert_eq!(pages, vec![PageText::new(["a", "b"])]);
    }

    #[test]
    fn test_plain_text_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all("Página 1\x0cPágina 2".as_bytes()).unwrap();
        let pages = PlainTextBackend.extract_pages(file.path()).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].fragments, vec!["Página 2"]);
    }

    #[test]
    fn test_plain_text_rejects_invalid_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, 0x00]).unwrap();
        let result = PlainTextBackend.extract_pages(file.path());
        assert!(matches!(result, Err(BackendError::ExtractionError(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = PlainTextBackend.extract_pages(&dir.path().join("absent.txt"));
        assert!(matches!(result, Err(BackendError::Io(_))));
    }

    #[test]
    fn test_json_pages() {
        let pages = JsonPagesBackend::pages_from_str(r#"[["Maria", "Resumo\nTexto"], []]"#).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].fragments[1], "Resumo\nTexto");
        assert!(pages[1].fragments.is_empty());
    }

    #[test]
    fn test_json_pages_malformed() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br#"{"pages": 1}"#).unwrap();
        let result = JsonPagesBackend.extract_pages(file.path());
        assert!(matches!(result, Err(BackendError::ExtractionError(_))));
    }

    #[test]
    fn test_backend_for_path_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("cv.JSON");
        std::fs::write(&json, r#"[["Maria"]]"#).unwrap();
        let pages = backend_for_path(&json).extract_pages(&json).unwrap();
        assert_eq!(pages[0].fragments, vec!["Maria"]);

        let txt = dir.path().join("cv.txt");
        std::fs::write(&txt, r#"[["Maria"]]"#).unwrap();
        let pages = backend_for_path(&txt).extract_pages(&txt).unwrap();
        assert_eq!(pages[0].fragments, vec![r#"[["Maria"]]"#]);
    }
}
