//! BackendAdapter trait: the per-backend wire mapping.
//!
//! An adapter turns the uniform `(prompt, context, config)` triple into one
//! backend's request shape, and that backend's reply (or error body) back into
//! a plain string (or a [`BackendRequestError`]). It never performs I/O itself;
//! the registry hands the prepared request to a [`crate::Transport`].

use crate::backend::{BackendConfig, BackendId};
use crate::context::WorkingContext;
use crate::error::{BackendRequestError, Error};
use crate::transport::HttpRequest;

/// What an adapter wants done for one command.
#[derive(Debug, Clone)]
pub enum PreparedCall {
    /// Send this request and parse the reply.
    Send(HttpRequest),
    /// Answer immediately without touching the network.
    Immediate(String),
}

/// One backend's protocol.
pub trait BackendAdapter: Send + Sync {
    /// The backend this adapter speaks to.
    fn backend(&self) -> BackendId;

    /// Reject configurations that cannot be dispatched.
    ///
    /// Default: every backend except aider needs a credential.
    fn validate(&self, config: &BackendConfig) -> Result<(), Error> {
        let backend = self.backend();
        if config.credential.is_empty() && !backend.allows_empty_credential() {
            return Err(Error::MissingCredential { backend });
        }
        Ok(())
    }

    /// Build the backend-specific request.
    fn build_request(&self, prompt: &str, context: &WorkingContext, config: &BackendConfig) -> PreparedCall;

    /// Extract the reply text from a successful payload.
    fn parse_response(&self, body: &serde_json::Value) -> Option<String>;

    /// Extract a human-readable message from the backend's error payload.
    fn error_message(&self, body: &serde_json::Value) -> Option<String>;

    /// Normalize a non-success response.
    fn map_error(&self, target: &str, status: u16, body: &str) -> BackendRequestError {
        let reason = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| self.error_message(&v))
            .unwrap_or_else(|| format!("HTTP {status}"));

        BackendRequestError {
            backend: self.backend(),
            target: target.to_string(),
            status: Some(status),
            body: if body.is_empty() { None } else { Some(body.to_string()) },
            reason,
        }
    }
}
