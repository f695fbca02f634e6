//! The parsed form of a raw text command.

use crate::backend::BackendId;
use serde::{Deserialize, Serialize};

/// A command split into an optional explicit backend token and a body.
///
/// When `explicit_backend` is `None`, `body` is the whole trimmed input.
/// Otherwise it is the remainder after the first whitespace run, and may only
/// be empty for [`BackendId::Multi`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCommand {
    pub explicit_backend: Option<BackendId>,
    pub body: String,
}

impl ParsedCommand {
    /// Text to forward to the backend.
    ///
    /// A bare `multi` command has an empty body; the token itself is sent.
    pub fn prompt(&self) -> &str {
        match (self.explicit_backend, self.body.is_empty()) {
            (Some(backend), true) => backend.as_str(),
            _ => &self.body,
        }
    }

    /// Whether the backend is chosen by heuristic scoring.
    pub fn is_multi_mode(&self) -> bool {
        matches!(self.explicit_backend, None | Some(BackendId::Multi))
    }
}
