//! Working context: the snapshot of caller-side state that travels with a
//! command into routing and request construction.
//!
//! The context is gathered from two collaborators: an [`ActiveDocument`]
//! (the file the caller is looking at) and a [`WorkspaceProvider`]
//! (repository summary and cleanliness). Both are fallible; the builder that
//! consumes them never is.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::WorkspaceError;

/// Whether the repository has uncommitted changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoStatus {
    #[default]
    Clean,
    Dirty,
}

impl RepoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepoStatus::Clean => "clean",
            RepoStatus::Dirty => "dirty",
        }
    }
}

impl std::fmt::Display for RepoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The document the caller currently has open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub path: String,
    /// Language identifier (e.g. `rust`, `python`, `typescript`).
    pub language: String,
    /// Document length in characters.
    pub size_chars: usize,
}

/// Summary of the workspace the command runs in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceSummary {
    pub root_path: String,
    /// Distinct language identifiers, in first-seen order.
    pub language_ids: Vec<String>,
    pub file_count: usize,
}

/// Per-command snapshot of the caller's state.
///
/// Always carries a `repo_status`; everything else is best-effort.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_file: Option<FileInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_summary: Option<WorkspaceSummary>,

    pub repo_status: RepoStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_text: Option<String>,
}

impl WorkingContext {
    /// The degraded context: clean repository, nothing else.
    pub fn minimal() -> Self {
        Self::default()
    }

    /// Language of the current file, if one is open.
    pub fn language(&self) -> Option<&str> {
        self.current_file
            .as_ref()
            .map(|f| f.language.as_str())
            .filter(|l| !l.is_empty())
    }
}

/// Handle to the caller's active document.
pub trait ActiveDocument: Send + Sync {
    /// File system path of the document.
    fn path(&self) -> &str;

    /// Language identifier of the document.
    fn language_id(&self) -> &str;

    /// Full text of the document.
    fn text(&self) -> &str;

    /// Currently selected text, `None` when the selection is empty.
    fn selected_text(&self) -> Option<String>;
}

/// Workspace and repository introspection.
#[async_trait]
pub trait WorkspaceProvider: Send + Sync {
    /// Enumerate the workspace and summarize it.
    async fn workspace_info(&self) -> std::result::Result<WorkspaceSummary, WorkspaceError>;

    /// Report whether the repository is clean or dirty.
    async fn repo_status(&self) -> std::result::Result<RepoStatus, WorkspaceError>;
}
