//! `heimdall route`: dry-run routing.

use std::path::{Path, PathBuf};

use heimdall_agent::{Engine, RoutePlan, RoutingDecision};
use heimdall_core::context::ActiveDocument;

use super::{current_workspace, load_config, open_document};

pub async fn run(config_path: Option<&Path>, input: &str, file: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let document = open_document(file, None).await?;
    let engine = Engine::with_defaults(config, current_workspace());

    let plan = engine
        .plan(input, document.as_ref().map(|d| d as &dyn ActiveDocument))
        .await?;

    print!("{}", render(&plan));
    Ok(())
}

fn render(plan: &RoutePlan) -> String {
    let mut out = String::new();
    match &plan.decision {
        RoutingDecision::Explicit { backend } => {
            out.push_str(&format!("Backend:  {backend} (explicit)\n"));
        }
        RoutingDecision::Scored { backend, scores } => {
            out.push_str(&format!("Backend:  {backend} (scored)\n"));
            out.push_str(&format!("Scores:   {scores}\n"));
        }
    }
    out.push_str(&format!("Prompt:   {}\n", plan.parsed.prompt()));
    out.push_str(&format!("Repo:     {}\n", plan.context.repo_status));
    if let Some(language) = plan.context.language() {
        out.push_str(&format!("Language: {language}\n"));
    }
    out
}
