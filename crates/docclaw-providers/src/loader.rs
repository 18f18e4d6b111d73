//! Filesystem document loader.

use std::path::Path;

use docclaw_core::error::{DocclawError, Result};
use docclaw_core::traits::DocumentLoader;

/// Loads UTF-8 text documents from disk.
///
/// Pages are form-feed (`\u{0C}`) separated segments — the convention used
/// by text extracted from paginated documents. A file without form feeds is
/// a single page.
pub struct FileLoader;

impl FileLoader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentLoader for FileLoader {
    fn load(&self, path: &Path) -> Result<Vec<String>> {
        if !path.is_file() {
            return Err(DocclawError::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DocclawError::NotFound(path.display().to_string()),
            _ => DocclawError::Io(e),
        })?;

        let pages: Vec<String> = content.split('\u{0C}').map(str::to_string).collect();
        tracing::debug!("Loaded {} page(s) from {}", pages.len(), path.display());
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let loader = FileLoader::new();
        let result = loader.load(&dir.path().join("ghost.txt"));
        assert!(matches!(result, Err(DocclawError::NotFound(_))));
    }

    #[test]
    fn test_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let loader = FileLoader::new();
        let result = loader.load(dir.path());
        assert!(matches!(result, Err(DocclawError::NotFound(_))));
    }

    #[test]
    fn test_single_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        std::fs::write(&path, "hello world").unwrap();
        let pages = FileLoader::new().load(&path).unwrap();
        assert_eq!(pages, vec!["hello world"]);
    }

    #[test]
    fn test_form_feed_pages_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        std::fs::write(&path, "page one\u{0C}page two\u{0C}page three").unwrap();
        let pages = FileLoader::new().load(&path).unwrap();
        assert_eq!(pages, vec!["page one", "page two", "page three"]);
    }

    #[test]
    fn test_empty_file_is_one_empty_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "").unwrap();
        let pages = FileLoader::new().load(&path).unwrap();
        assert_eq!(pages, vec![""]);
    }
}
