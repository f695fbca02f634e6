//! Backend identifiers and per-backend static configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Endpoint value that makes the aider backend run without a network call.
pub const LOCAL_ENDPOINT: &str = "local";

/// A model executor the router can select.
///
/// `Multi` is a routing mode, never a dispatch target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendId {
    Claude,
    Deepseek,
    Aider,
    Multi,
}

impl BackendId {
    /// The three dispatchable backends, in routing declaration order.
    ///
    /// The order is part of the routing contract: scoring ties resolve to the
    /// earliest entry.
    pub const DISPATCHABLE: [BackendId; 3] = [BackendId::Claude, BackendId::Deepseek, BackendId::Aider];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendId::Claude => "claude",
            BackendId::Deepseek => "deepseek",
            BackendId::Aider => "aider",
            BackendId::Multi => "multi",
        }
    }

    /// Whether a command can actually be sent to this backend.
    pub fn is_dispatchable(&self) -> bool {
        !matches!(self, BackendId::Multi)
    }

    /// Whether this backend is allowed to run without a credential.
    pub fn allows_empty_credential(&self) -> bool {
        matches!(self, BackendId::Aider)
    }
}

impl std::fmt::Display for BackendId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional tuning knobs for a backend. Unset values fall back to the
/// adapter's built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,

    /// Backend-specific extras, passed through untouched.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub custom: HashMap<String, serde_json::Value>,
}

/// Static, process-scoped configuration of one backend.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub credential: String,

    #[serde(default)]
    pub endpoint: String,

    #[serde(default)]
    pub options: BackendOptions,
}

impl BackendConfig {
    pub fn new(credential: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            credential: credential.into(),
            endpoint: endpoint.into(),
            options: BackendOptions::default(),
        }
    }

    pub fn with_options(mut self, options: BackendOptions) -> Self {
        self.options = options;
        self
    }

    /// Whether the endpoint is the no-network sentinel.
    pub fn is_local(&self) -> bool {
        self.endpoint == LOCAL_ENDPOINT
    }

    /// Check the credential invariant: a credential may only be empty for
    /// aider running locally.
    pub fn check(&self, backend: BackendId) -> std::result::Result<(), String> {
        if self.credential.is_empty() && !(backend == BackendId::Aider && self.is_local()) {
            return Err(format!("{backend}: credential is required"));
        }
        if self.endpoint.is_empty() {
            return Err(format!("{backend}: endpoint is required"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let credential = if self.credential.is_empty() { "None" } else { "[REDACTED]" };
        f.debug_struct("BackendConfig")
            .field("credential", &credential)
            .field("endpoint", &self.endpoint)
            .field("options", &self.options)
            .finish()
    }
}
