//! The uniform result envelope returned to the caller.

use crate::backend::BackendId;
use serde::{Deserialize, Serialize};

/// A backend reply, normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelResponse {
    pub content: String,
    pub backend_id: BackendId,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl ModelResponse {
    /// Wrap a reply, stamped with the current time.
    pub fn new(content: impl Into<String>, backend_id: BackendId) -> Self {
        Self {
            content: content.into(),
            backend_id,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}
