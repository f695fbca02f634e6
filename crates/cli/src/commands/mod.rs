pub mod ask;
pub mod config_cmd;
pub mod route;

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use heimdall_agent::{FileDocument, LocalWorkspace};
use heimdall_config::AppConfig;
use heimdall_core::context::WorkspaceProvider;

/// A character range given on the command line as `start:end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection(pub Range<usize>);

impl FromStr for Selection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once(':')
            .ok_or_else(|| format!("expected start:end, got '{s}'"))?;
        let start: usize = start.trim().parse().map_err(|e| format!("invalid start: {e}"))?;
        let end: usize = end.trim().parse().map_err(|e| format!("invalid end: {e}"))?;
        if end < start {
            return Err(format!("selection end {end} is before start {start}"));
        }
        Ok(Selection(start..end))
    }
}

/// Load config from `--config` or the default location.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    Ok(config.map_err(|e| format!("Failed to load config: {e}"))?)
}

/// The current directory as the workspace, or none when it is unreadable.
pub fn current_workspace() -> Arc<dyn WorkspaceProvider> {
    match std::env::current_dir() {
        Ok(cwd) => Arc::new(LocalWorkspace::new(cwd)),
        Err(e) => {
            tracing::warn!(error = %e, "Cannot read current directory, running without a workspace");
            Arc::new(LocalWorkspace::none())
        }
    }
}

/// Open `--file`, applying an optional selection.
pub async fn open_document(
    file: Option<PathBuf>,
    selection: Option<Selection>,
) -> Result<Option<FileDocument>, Box<dyn std::error::Error>> {
    let Some(path) = file else {
        return Ok(None);
    };
    let document = FileDocument::open(&path)
        .await
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?;
    Ok(Some(match selection {
        Some(Selection(range)) => document.with_selection(range),
        None => document,
    }))
}
