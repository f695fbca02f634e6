//! The single-turn chat body shared by the Claude and Deepseek wire formats.

use heimdall_core::backend::BackendOptions;
use serde::Serialize;

/// Values used when `BackendOptions` leaves a knob unset.
pub(crate) struct ChatDefaults {
    pub model: &'static str,
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Debug)]
pub(crate) struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatRequest {
    /// One user turn, with options overriding the defaults.
    pub fn user_turn(content: String, options: &BackendOptions, defaults: &ChatDefaults) -> Self {
        Self {
            model: options
                .model_version
                .clone()
                .unwrap_or_else(|| defaults.model.to_string()),
            messages: vec![ChatMessage {
                role: "user".into(),
                content,
            }],
            temperature: options.temperature.unwrap_or(defaults.temperature),
            max_tokens: options.max_output_tokens.unwrap_or(defaults.max_tokens),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": self.messages,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        })
    }
}
