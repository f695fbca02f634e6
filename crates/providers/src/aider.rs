//! Aider adapter.
//!
//! With the `local` sentinel endpoint nothing is sent; otherwise the raw
//! prompt goes out together with a compact repository context, and the reply
//! is read from the `response` field.

use heimdall_core::adapter::{BackendAdapter, PreparedCall};
use heimdall_core::backend::{BackendConfig, BackendId};
use heimdall_core::context::{RepoStatus, WorkingContext};
use heimdall_core::transport::HttpRequest;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Reply for the `local` endpoint, which has no executor yet.
pub const LOCAL_PLACEHOLDER: &str = "Aider local execution not yet implemented";

/// Adapter for an aider HTTP bridge.
#[derive(Debug, Default, Clone, Copy)]
pub struct AiderAdapter;

impl AiderAdapter {
    pub fn new() -> Self {
        Self
    }
}

/// The context object sent alongside the prompt.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct AiderContext {
    repo_status: RepoStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selected_text: Option<String>,
}

impl From<&WorkingContext> for AiderContext {
    fn from(ctx: &WorkingContext) -> Self {
        Self {
            repo_status: ctx.repo_status,
            path: ctx.current_file.as_ref().map(|f| f.path.clone()),
            language: ctx.current_file.as_ref().map(|f| f.language.clone()),
            selected_text: ctx.selected_text.clone(),
        }
    }
}

impl BackendAdapter for AiderAdapter {
    fn backend(&self) -> BackendId {
        BackendId::Aider
    }

    fn build_request(&self, prompt: &str, context: &WorkingContext, config: &BackendConfig) -> PreparedCall {
        if config.is_local() {
            info!(backend = "aider", "Local aider execution requested");
            return PreparedCall::Immediate(LOCAL_PLACEHOLDER.to_string());
        }

        let body = serde_json::json!({
            "prompt": prompt,
            "context": AiderContext::from(context),
        });

        let mut request = HttpRequest::post(&config.endpoint, body).header("Content-Type", "application/json");
        if !config.credential.is_empty() {
            request = request.header("Authorization", format!("Bearer {}", config.credential));
        }
        PreparedCall::Send(request)
    }

    fn parse_response(&self, body: &serde_json::Value) -> Option<String> {
        body["response"].as_str().map(String::from)
    }

    fn error_message(&self, body: &serde_json::Value) -> Option<String> {
        let field = body.get("error").or_else(|| body.get("detail"))?;
        match field {
            serde_json::Value::String(s) => Some(s.clone()),
            other => other["message"].as_str().map(String::from),
        }
    }
}
