//! Working-context gathering.
//!
//! The [`ContextBuilder`] turns an optional active document into a
//! [`WorkingContext`]. It is the one place where failures are deliberately
//! swallowed: a broken workspace provider degrades the context to
//! `{repo_status: clean}` and the command carries on.

pub mod document;
pub mod workspace;

use std::sync::Arc;

use heimdall_core::context::{ActiveDocument, FileInfo, WorkingContext, WorkspaceProvider};
use heimdall_core::error::WorkspaceError;
use tracing::{debug, error};

pub use document::FileDocument;
pub use workspace::{LocalWorkspace, language_for_path};

/// Builds per-command context snapshots.
pub struct ContextBuilder {
    workspace: Arc<dyn WorkspaceProvider>,
}

impl ContextBuilder {
    pub fn new(workspace: Arc<dyn WorkspaceProvider>) -> Self {
        Self { workspace }
    }

    /// Gather context for a command. Never fails.
    pub async fn build(&self, document: Option<&dyn ActiveDocument>) -> WorkingContext {
        let Some(document) = document else {
            return WorkingContext::minimal();
        };

        match self.gather(document).await {
            Ok(context) => {
                debug!(
                    path = %document.path(),
                    repo_status = %context.repo_status,
                    "Gathered working context"
                );
                context
            }
            Err(e) => {
                error!(error = %e, "Error getting context, continuing with minimal context");
                WorkingContext::minimal()
            }
        }
    }

    async fn gather(&self, document: &dyn ActiveDocument) -> Result<WorkingContext, WorkspaceError> {
        let workspace_summary = self.workspace.workspace_info().await?;
        let repo_status = self.workspace.repo_status().await?;

        let current_file = FileInfo {
            path: document.path().to_string(),
            language: document.language_id().to_string(),
            size_chars: document.text().chars().count(),
        };

        Ok(WorkingContext {
            current_file: Some(current_file),
            workspace_summary: Some(workspace_summary),
            repo_status,
            selected_text: document.selected_text().filter(|s| !s.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use heimdall_core::context::{RepoStatus, WorkspaceSummary};
    use std::sync::Mutex;

    /// Scripted workspace provider with call counting.
    struct StubWorkspace {
        info: Option<WorkspaceSummary>,
        status: Option<RepoStatus>,
        calls: Mutex<usize>,
    }

    impl StubWorkspace {
        fn healthy(status: RepoStatus) -> Self {
            Self {
                info: Some(WorkspaceSummary {
                    root_path: "/repo".into(),
                    language_ids: vec!["rust".into(), "toml".into()],
                    file_count: 12,
                }),
                status: Some(status),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl WorkspaceProvider for StubWorkspace {
        async fn workspace_info(&self) -> Result<WorkspaceSummary, WorkspaceError> {
            *self.calls.lock().unwrap() += 1;
            self.info.clone().ok_or(WorkspaceError::NoWorkspace)
        }

        async fn repo_status(&self) -> Result<RepoStatus, WorkspaceError> {
            *self.calls.lock().unwrap() += 1;
            self.status
                .ok_or_else(|| WorkspaceError::RepoStatus("not a git repository".into()))
        }
    }

    struct Doc {
        selection: Option<String>,
    }

    impl ActiveDocument for Doc {
        fn path(&self) -> &str {
            "/repo/src/lib.rs"
        }
        fn language_id(&self) -> &str {
            "rust"
        }
        fn text(&self) -> &str {
            "fn main() {}\n// é"
        }
        fn selected_text(&self) -> Option<String> {
            self.selection.clone()
        }
    }

    #[tokio::test]
    async fn no_document_gives_minimal_context() {
        let workspace = Arc::new(StubWorkspace::healthy(RepoStatus::Dirty));
        let builder = ContextBuilder::new(workspace.clone());
        let ctx = builder.build(None).await;
        assert_eq!(ctx, WorkingContext::minimal());
        assert_eq!(workspace.calls(), 0);
    }

    #[tokio::test]
    async fn document_gives_full_context() {
        let builder = ContextBuilder::new(Arc::new(StubWorkspace::healthy(RepoStatus::Dirty)));
        let doc = Doc {
            selection: Some("fn main".into()),
        };
        let ctx = builder.build(Some(&doc)).await;

        let file = ctx.current_file.unwrap();
        assert_eq!(file.path, "/repo/src/lib.rs");
        assert_eq!(file.language, "rust");
        assert_eq!(file.size_chars, 17);
        assert_eq!(ctx.repo_status, RepoStatus::Dirty);
        assert_eq!(ctx.workspace_summary.unwrap().file_count, 12);
        assert_eq!(ctx.selected_text.as_deref(), Some("fn main"));
    }

    #[tokio::test]
    async fn empty_selection_is_dropped() {
        let builder = ContextBuilder::new(Arc::new(StubWorkspace::healthy(RepoStatus::Clean)));
        let doc = Doc {
            selection: Some(String::new()),
        };
        let ctx = builder.build(Some(&doc)).await;
        assert!(ctx.selected_text.is_none());
        assert!(ctx.current_file.is_some());
    }

    #[tokio::test]
    async fn workspace_failure_degrades_silently() {
        let workspace = StubWorkspace {
            info: None,
            ..StubWorkspace::healthy(RepoStatus::Dirty)
        };
        let builder = ContextBuilder::new(Arc::new(workspace));
        let ctx = builder.build(Some(&Doc { selection: None })).await;
        assert_eq!(ctx, WorkingContext::minimal());
    }

    #[tokio::test]
    async fn repo_status_failure_degrades_silently() {
        let workspace = StubWorkspace {
            status: None,
            ..StubWorkspace::healthy(RepoStatus::Dirty)
        };
        let builder = ContextBuilder::new(Arc::new(workspace));
        let ctx = builder
            .build(Some(&Doc {
                selection: Some("x".into()),
            }))
            .await;
        assert_eq!(ctx, WorkingContext::minimal());
        assert_eq!(ctx.repo_status, RepoStatus::Clean);
    }

    #[tokio::test]
    async fn local_workspace_outside_git_keeps_file_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.py");
        std::fs::write(&path, "x = 1").unwrap();

        let builder = ContextBuilder::new(Arc::new(LocalWorkspace::new(dir.path())));
        let doc = FileDocument::new(&path, "x = 1");
        let ctx = builder.build(Some(&doc)).await;

        assert_eq!(ctx.repo_status, RepoStatus::Clean);
        assert_eq!(ctx.language(), Some("python"));
        assert_eq!(ctx.workspace_summary.unwrap().file_count, 1);
    }
}
