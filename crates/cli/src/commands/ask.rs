//! `heimdall ask`: run a command end to end.

use std::path::{Path, PathBuf};

use heimdall_agent::Engine;
use heimdall_core::context::ActiveDocument;

use super::{Selection, current_workspace, load_config, open_document};

pub async fn run(
    config_path: Option<&Path>,
    input: &str,
    file: Option<PathBuf>,
    selection: Option<Selection>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let document = open_document(file, selection).await?;
    let engine = Engine::with_defaults(config, current_workspace());

    let response = engine
        .process_command(input, document.as_ref().map(|d| d as &dyn ActiveDocument))
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("[{}]", response.backend_id);
        println!("{}", response.content);
    }

    Ok(())
}
