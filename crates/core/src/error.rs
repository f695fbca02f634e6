//! Error types for the Heimdall domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Collaborator boundaries (backends, transport, workspace) have their own
//! error types that fold into the top-level [`Error`].

use crate::backend::BackendId;
use thiserror::Error;

/// The top-level error type for all Heimdall operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Command errors ---
    #[error("Command cannot be empty")]
    EmptyCommand,

    #[error("Prompt cannot be empty")]
    EmptyPrompt,

    // --- Backend errors ---
    #[error("API key not configured for {backend}")]
    MissingCredential { backend: BackendId },

    #[error("No configuration found for backend: {0}")]
    NotConfigured(BackendId),

    #[error(transparent)]
    BackendRequest(#[from] BackendRequestError),

    // --- Routing errors ---
    #[error("Failed to handle multi-mode: {source}")]
    Routing {
        #[source]
        source: Box<Error>,
    },

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Wrap an unexpected multi-mode failure.
    pub fn routing(source: Error) -> Self {
        Error::Routing {
            source: Box::new(source),
        }
    }

    /// Whether the error was raised before any network attempt.
    pub fn is_pre_dispatch(&self) -> bool {
        matches!(
            self,
            Error::EmptyCommand | Error::EmptyPrompt | Error::MissingCredential { .. }
        )
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Collaborator errors ---

/// A failed backend call, normalized across backends.
///
/// Carries enough detail to diagnose the failure from the log alone.
#[derive(Debug, Clone, Error)]
#[error("{backend} request to {target} failed: {reason}{}", status_suffix(.status))]
pub struct BackendRequestError {
    pub backend: BackendId,
    /// Request target (endpoint URL).
    pub target: String,
    /// HTTP status, when the backend answered at all.
    pub status: Option<u16>,
    /// Raw error body returned by the backend.
    pub body: Option<String>,
    /// Human-readable cause.
    pub reason: String,
}

impl BackendRequestError {
    /// The backend could not be reached.
    pub fn transport(backend: BackendId, err: TransportError) -> Self {
        Self {
            backend,
            target: err.target,
            status: None,
            body: None,
            reason: err.message,
        }
    }

    /// The backend answered with something other than a usable reply.
    pub fn malformed(backend: BackendId, target: impl Into<String>, status: u16, reason: impl Into<String>) -> Self {
        Self {
            backend,
            target: target.into(),
            status: Some(status),
            body: None,
            reason: reason.into(),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status: {s})")).unwrap_or_default()
}

/// The HTTP layer failed before a response was received.
#[derive(Debug, Clone, Error)]
#[error("Transport error for {target}: {message}")]
pub struct TransportError {
    pub target: String,
    pub message: String,
}

impl TransportError {
    pub fn new(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            message: message.into(),
        }
    }
}

/// Workspace or repository introspection failed.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("No workspace folder is open")]
    NoWorkspace,

    #[error("Failed to enumerate workspace: {0}")]
    Enumeration(String),

    #[error("Repository status unavailable: {0}")]
    RepoStatus(String),
}
