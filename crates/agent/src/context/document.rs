//! A file on disk standing in for the editor's active document.

use std::ops::Range;
use std::path::{Path, PathBuf};

use heimdall_core::context::ActiveDocument;

use super::workspace::language_for_path;

/// An opened file with an optional selection, measured in characters.
#[derive(Debug, Clone)]
pub struct FileDocument {
    path: String,
    language: String,
    text: String,
    selection: Option<Range<usize>>,
}

impl FileDocument {
    /// Build a document from already-loaded text.
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            language: language_for_path(&path).to_string(),
            path: path.display().to_string(),
            text: text.into(),
            selection: None,
        }
    }

    /// Read a document from disk.
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await?;
        Ok(Self::new(path, text))
    }

    /// Select the characters in `range`. Out-of-bounds ends are clamped.
    pub fn with_selection(mut self, range: Range<usize>) -> Self {
        self.selection = Some(range);
        self
    }

    /// Override the detected language identifier.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

impl ActiveDocument for FileDocument {
    fn path(&self) -> &str {
        &self.path
    }

    fn language_id(&self) -> &str {
        &self.language
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn selected_text(&self) -> Option<String> {
        let range = self.selection.as_ref()?;
        let len = self.text.chars().count();
        let end = range.end.min(len);
        let start = range.start.min(end);
        if start == end {
            return None;
        }
        Some(self.text.chars().skip(start).take(end - start).collect())
    }
}
