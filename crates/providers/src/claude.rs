//! Claude adapter: Anthropic Messages API.
//!
//! - `x-api-key` header authentication (not Bearer)
//! - `anthropic-version` header
//! - Reply text is the first content block
//! - Errors arrive as `{"type": "error", "error": {"type", "message"}}`

use heimdall_core::adapter::{BackendAdapter, PreparedCall};
use heimdall_core::backend::{BackendConfig, BackendId};
use heimdall_core::context::WorkingContext;
use heimdall_core::transport::HttpRequest;
use serde::Deserialize;

use crate::chat::{ChatDefaults, ChatRequest};

const ANTHROPIC_VERSION: &str = "2023-06-01";

const DEFAULTS: ChatDefaults = ChatDefaults {
    model: "claude-3-sonnet-20240229",
    temperature: 0.7,
    max_tokens: 4096,
};

/// Adapter for the Anthropic Messages API.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClaudeAdapter;

impl ClaudeAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Prefix the prompt with the current file, when there is one.
    fn format_prompt(prompt: &str, context: &WorkingContext) -> String {
        match &context.current_file {
            Some(file) => format!("Current file: {} ({})\n{prompt}", file.path, file.language),
            None => prompt.to_string(),
        }
    }
}

impl BackendAdapter for ClaudeAdapter {
    fn backend(&self) -> BackendId {
        BackendId::Claude
    }

    fn build_request(&self, prompt: &str, context: &WorkingContext, config: &BackendConfig) -> PreparedCall {
        let body = ChatRequest::user_turn(Self::format_prompt(prompt, context), &config.options, &DEFAULTS);

        PreparedCall::Send(
            HttpRequest::post(&config.endpoint, body.to_json())
                .header("x-api-key", &config.credential)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("Content-Type", "application/json"),
        )
    }

    fn parse_response(&self, body: &serde_json::Value) -> Option<String> {
        let resp = ClaudeResponse::deserialize(body).ok()?;
        match resp.content.into_iter().next()? {
            ResponseContentBlock::Text { text } => Some(text),
            ResponseContentBlock::Other => None,
        }
    }

    fn error_message(&self, body: &serde_json::Value) -> Option<String> {
        let err = ClaudeErrorBody::deserialize(body).ok()?.error;
        Some(match err.kind {
            Some(kind) => format!("{kind}: {}", err.message),
            None => err.message,
        })
    }
}

// --- Anthropic API types ---

#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    content: Vec<ResponseContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ResponseContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ClaudeErrorBody {
    error: ClaudeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ClaudeErrorDetail {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use heimdall_core::context::FileInfo;

    fn config() -> BackendConfig {
        BackendConfig::new("sk-ant-test", "https://api.anthropic.com/v1/messages")
    }

    fn send(call: PreparedCall) -> HttpRequest {
        match call {
            PreparedCall::Send(req) => req,
            PreparedCall::Immediate(text) => panic!("expected a request, got immediate reply {text:?}"),
        }
    }

    #[test]
    fn prompt_prefixed_with_current_file() {
        let ctx = WorkingContext {
            current_file: Some(FileInfo {
                path: "/repo/src/main.rs".into(),
                language: "rust".into(),
                size_chars: 120,
            }),
            ..WorkingContext::default()
        };
        let req = send(ClaudeAdapter.build_request("explain this", &ctx, &config()));
        assert_eq!(
            req.body["messages"][0]["content"],
            "Current file: /repo/src/main.rs (rust)\nexplain this"
        );
    }

    #[test]
    fn prompt_untouched_without_file() {
        let req = send(ClaudeAdapter.build_request("explain this", &WorkingContext::minimal(), &config()));
        assert_eq!(req.body["messages"][0]["content"], "explain this");
        assert_eq!(req.body["messages"][0]["role"], "user");
    }

    #[test]
    fn request_uses_defaults_and_headers() {
        let req = send(ClaudeAdapter.build_request("hi", &WorkingContext::minimal(), &config()));
        assert_eq!(req.url, "https://api.anthropic.com/v1/messages");
        assert_eq!(req.body["model"], "claude-3-sonnet-20240229");
        assert_eq!(req.body["max_tokens"], 4096);
        assert_eq!(req.header_value("x-api-key"), Some("sk-ant-test"));
        assert_eq!(req.header_value("anthropic-version"), Some("2023-06-01"));
        assert_eq!(req.header_value("authorization"), None);
    }

    #[test]
    fn parse_text_response() {
        let body = serde_json::json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "model": "claude-3-sonnet-20240229",
            "content": [{"type": "text", "text": "Hello from Claude"}],
            "usage": {"input_tokens": 10, "output_tokens": 5}
        });
        assert_eq!(ClaudeAdapter.parse_response(&body).as_deref(), Some("Hello from Claude"));
    }

    #[test]
    fn parse_rejects_non_text_first_block() {
        let body = serde_json::json!({
            "content": [{"type": "tool_use", "id": "t", "name": "x", "input": {}}]
        });
        assert_eq!(ClaudeAdapter.parse_response(&body), None);
        assert_eq!(ClaudeAdapter.parse_response(&serde_json::json!({"content": []})), None);
    }

    #[test]
    fn error_body_is_mapped() {
        let body = r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#;
        let err = ClaudeAdapter.map_error("https://api.anthropic.com/v1/messages", 401, body);
        assert_eq!(err.backend, BackendId::Claude);
        assert_eq!(err.status, Some(401));
        assert_eq!(err.reason, "authentication_error: invalid x-api-key");
        assert_eq!(err.body.as_deref(), Some(body));
    }
}
