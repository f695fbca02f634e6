//! Deepseek adapter: OpenAI-compatible chat completions.
//!
//! Bearer-token authentication; the reply is `choices[0].message.content`
//! and errors follow the OpenAI `{"error": {"message", "type", "code"}}` shape.

use heimdall_core::adapter::{BackendAdapter, PreparedCall};
use heimdall_core::backend::{BackendConfig, BackendId};
use heimdall_core::context::WorkingContext;
use heimdall_core::transport::HttpRequest;
use serde::Deserialize;

use crate::chat::{ChatDefaults, ChatRequest};

const DEFAULTS: ChatDefaults = ChatDefaults {
    model: "deepseek-coder-33b-instruct",
    temperature: 0.7,
    max_tokens: 4096,
};

/// Adapter for Deepseek's OpenAI-compatible endpoint.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeepseekAdapter;

impl DeepseekAdapter {
    pub fn new() -> Self {
        Self
    }

    fn format_prompt(prompt: &str, context: &WorkingContext) -> String {
        match context.language() {
            Some(language) => format!("Language: {language}\n{prompt}"),
            None => prompt.to_string(),
        }
    }
}

impl BackendAdapter for DeepseekAdapter {
    fn backend(&self) -> BackendId {
        BackendId::Deepseek
    }

    fn build_request(&self, prompt: &str, context: &WorkingContext, config: &BackendConfig) -> PreparedCall {
        let body = ChatRequest::user_turn(Self::format_prompt(prompt, context), &config.options, &DEFAULTS);

        PreparedCall::Send(
            HttpRequest::post(&config.endpoint, body.to_json())
                .header("Authorization", format!("Bearer {}", config.credential))
                .header("Content-Type", "application/json"),
        )
    }

    fn parse_response(&self, body: &serde_json::Value) -> Option<String> {
        let resp = ApiResponse::deserialize(body).ok()?;
        resp.choices.into_iter().next()?.message.content
    }

    fn error_message(&self, body: &serde_json::Value) -> Option<String> {
        ApiErrorBody::deserialize(body).ok().map(|b| b.error.message)
    }
}

// --- OpenAI-compatible API types ---

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ApiResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}
