//! Local workspace provider: a directory on disk plus `git`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use heimdall_core::context::{RepoStatus, WorkspaceProvider, WorkspaceSummary};
use heimdall_core::error::WorkspaceError;
use tokio::process::Command;
use tracing::debug;

/// Directories never descended into.
const SKIPPED_DIRS: [&str; 3] = ["node_modules", ".git", "target"];

/// Map a path to a language identifier (VS Code naming).
pub fn language_for_path(path: &Path) -> &'static str {
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    match file_name {
        "Dockerfile" => return "dockerfile",
        "Makefile" | "makefile" => return "makefile",
        _ => {}
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "rs" => "rust",
        "js" | "mjs" | "cjs" => "javascript",
        "jsx" => "javascriptreact",
        "ts" | "mts" | "cts" => "typescript",
        "tsx" => "typescriptreact",
        "py" | "pyi" => "python",
        "java" => "java",
        "c" | "h" => "c",
        "cc" | "cpp" | "cxx" | "hpp" | "hh" | "hxx" => "cpp",
        "cs" => "csharp",
        "go" => "go",
        "rb" => "ruby",
        "php" => "php",
        "swift" => "swift",
        "kt" | "kts" => "kotlin",
        "sh" | "bash" | "zsh" => "shellscript",
        "json" => "json",
        "toml" => "toml",
        "yaml" | "yml" => "yaml",
        "md" | "markdown" => "markdown",
        "html" | "htm" => "html",
        "css" => "css",
        "scss" => "scss",
        "sql" => "sql",
        "xml" => "xml",
        _ => "plaintext",
    }
}

/// Workspace rooted at a local directory.
#[derive(Debug, Clone, Default)]
pub struct LocalWorkspace {
    root: Option<PathBuf>,
}

impl LocalWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// A provider with no open workspace; every query fails.
    pub fn none() -> Self {
        Self::default()
    }

    fn root(&self) -> Result<&Path, WorkspaceError> {
        self.root.as_deref().ok_or(WorkspaceError::NoWorkspace)
    }
}

/// Recursively collect regular files under `dir`.
fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let path = entry.path();
        if file_type.is_dir() {
            let skipped = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| SKIPPED_DIRS.contains(&n));
            if !skipped {
                collect_files(&path, out)?;
            }
        } else if file_type.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

fn summarize(root: &Path) -> Result<WorkspaceSummary, WorkspaceError> {
    let mut files = Vec::new();
    collect_files(root, &mut files).map_err(|e| WorkspaceError::Enumeration(e.to_string()))?;
    files.sort();

    let mut language_ids: Vec<String> = Vec::new();
    for file in &files {
        let language = language_for_path(file);
        if !language_ids.iter().any(|l| l == language) {
            language_ids.push(language.to_string());
        }
    }

    Ok(WorkspaceSummary {
        root_path: root.display().to_string(),
        language_ids,
        file_count: files.len(),
    })
}

#[async_trait]
impl WorkspaceProvider for LocalWorkspace {
    async fn workspace_info(&self) -> Result<WorkspaceSummary, WorkspaceError> {
        let root = self.root()?.to_path_buf();
        let summary = tokio::task::spawn_blocking(move || summarize(&root))
            .await
            .map_err(|e| WorkspaceError::Enumeration(e.to_string()))??;

        debug!(
            root = %summary.root_path,
            files = summary.file_count,
            languages = summary.language_ids.len(),
            "Enumerated workspace"
        );
        Ok(summary)
    }

    /// Without a usable `git` (not installed, not a repository) the
    /// repository counts as clean.
    async fn repo_status(&self) -> Result<RepoStatus, WorkspaceError> {
        let root = self.root()?;
        let output = match Command::new("git")
            .args(["status", "--porcelain"])
            .current_dir(root)
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                debug!(error = %e, "git unavailable, treating repository as clean");
                return Ok(RepoStatus::Clean);
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!(stderr = %stderr.trim(), "git status failed, treating repository as clean");
            return Ok(RepoStatus::Clean);
        }

        if output.stdout.iter().all(u8::is_ascii_whitespace) {
            Ok(RepoStatus::Clean)
        } else {
            Ok(RepoStatus::Dirty)
        }
    }
}
