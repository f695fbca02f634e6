//! Adapter registry: one adapter per backend, one transport for all.
//!
//! Dispatch is a single attempt: a failed call is logged and returned as-is.
//! There is no retry and no fallback to another backend.

use std::collections::HashMap;
use std::sync::Arc;

use heimdall_core::adapter::{BackendAdapter, PreparedCall};
use heimdall_core::backend::{BackendConfig, BackendId};
use heimdall_core::context::WorkingContext;
use heimdall_core::error::{BackendRequestError, Error, Result};
use heimdall_core::transport::{HttpResponse, Transport};
use tracing::{debug, error, info};

use crate::aider::AiderAdapter;
use crate::claude::ClaudeAdapter;
use crate::deepseek::DeepseekAdapter;
use crate::transport::HttpTransport;

/// Routes a resolved backend id to its adapter and performs the call.
pub struct AdapterRegistry {
    adapters: HashMap<BackendId, Arc<dyn BackendAdapter>>,
    transport: Arc<dyn Transport>,
}

impl AdapterRegistry {
    /// Create an empty registry over a transport.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            adapters: HashMap::new(),
            transport,
        }
    }

    /// Registry with the Claude, Deepseek and aider adapters.
    pub fn with_defaults(transport: Arc<dyn Transport>) -> Self {
        let mut registry = Self::new(transport);
        registry.register(Arc::new(ClaudeAdapter::new()));
        registry.register(Arc::new(DeepseekAdapter::new()));
        registry.register(Arc::new(AiderAdapter::new()));
        registry
    }

    /// Registry with the default adapters over a real HTTP transport.
    pub fn http() -> Self {
        Self::with_defaults(Arc::new(HttpTransport::new()))
    }

    /// Register (or replace) the adapter for its backend.
    pub fn register(&mut self, adapter: Arc<dyn BackendAdapter>) {
        self.adapters.insert(adapter.backend(), adapter);
    }

    /// Get the adapter for a backend.
    pub fn get(&self, backend: BackendId) -> Option<Arc<dyn BackendAdapter>> {
        self.adapters.get(&backend).cloned()
    }

    /// Send `prompt` to `backend` and return the reply text.
    pub async fn dispatch(
        &self,
        backend: BackendId,
        prompt: &str,
        context: &WorkingContext,
        config: &BackendConfig,
    ) -> Result<String> {
        if !backend.is_dispatchable() {
            return Err(Error::Internal(format!("{backend} is a routing mode, not a backend")));
        }

        let adapter = self.get(backend).ok_or_else(|| {
            error!(backend = %backend, "No adapter registered for backend");
            Error::NotConfigured(backend)
        })?;

        adapter.validate(config)?;

        let request = match adapter.build_request(prompt, context, config) {
            PreparedCall::Immediate(reply) => return Ok(reply),
            PreparedCall::Send(request) => request,
        };

        debug!(
            backend = %backend,
            target_url = %request.url,
            model = request.body["model"].as_str().unwrap_or("-"),
            "Executing backend request"
        );

        let response = self
            .transport
            .post_json(&request)
            .await
            .map_err(|e| failure(BackendRequestError::transport(backend, e)))?;

        let reply = Self::read_reply(adapter.as_ref(), &request.url, response).map_err(failure)?;

        info!(backend = %backend, "Backend call successful");
        Ok(reply)
    }

    fn read_reply(
        adapter: &dyn BackendAdapter,
        target: &str,
        response: HttpResponse,
    ) -> std::result::Result<String, BackendRequestError> {
        if !response.is_success() {
            return Err(adapter.map_error(target, response.status, &response.body));
        }

        let with_body = |mut err: BackendRequestError| {
            err.body = Some(response.body.clone());
            err
        };

        let payload: serde_json::Value = serde_json::from_str(&response.body).map_err(|e| {
            with_body(BackendRequestError::malformed(
                adapter.backend(),
                target,
                response.status,
                format!("Failed to parse response: {e}"),
            ))
        })?;

        adapter.parse_response(&payload).ok_or_else(|| {
            with_body(BackendRequestError::malformed(
                adapter.backend(),
                target,
                response.status,
                "Unexpected response shape",
            ))
        })
    }
}

/// Log a backend failure with everything needed to diagnose it.
fn failure(err: BackendRequestError) -> Error {
    error!(
        backend = %err.backend,
        target_url = %err.target,
        status = ?err.status,
        body = err.body.as_deref().unwrap_or(""),
        reason = %err.reason,
        "Backend request failed"
    );
    Error::BackendRequest(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use heimdall_core::error::TransportError;
    use heimdall_core::transport::HttpRequest;
    use std::sync::Mutex;

    /// A transport that records requests and replays one scripted outcome.
    struct RecordingTransport {
        outcome: std::result::Result<HttpResponse, TransportError>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingTransport {
        fn replying(status: u16, body: serde_json::Value) -> Self {
            Self {
                outcome: Ok(HttpResponse {
                    status,
                    body: body.to_string(),
                }),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn raw(status: u16, body: &str) -> Self {
            Self {
                outcome: Ok(HttpResponse {
                    status,
                    body: body.to_string(),
                }),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn unreachable() -> Self {
            Self {
                outcome: Err(TransportError::new("https://api.deepseek.com", "connection refused")),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn post_json(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
            self.requests.lock().unwrap().push(request.clone());
            self.outcome.clone()
        }
    }

    fn registry(transport: &Arc<RecordingTransport>) -> AdapterRegistry {
        AdapterRegistry::with_defaults(transport.clone())
    }

    #[tokio::test]
    async fn local_aider_makes_no_network_call() {
        let transport = Arc::new(RecordingTransport::replying(200, serde_json::json!({})));
        let reply = registry(&transport)
            .dispatch(
                BackendId::Aider,
                "commit everything",
                &WorkingContext::minimal(),
                &BackendConfig::new("", "local"),
            )
            .await
            .unwrap();
        assert_eq!(reply, crate::aider::LOCAL_PLACEHOLDER);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn missing_credential_fails_before_network() {
        let transport = Arc::new(RecordingTransport::replying(200, serde_json::json!({})));
        let err = registry(&transport)
            .dispatch(
                BackendId::Claude,
                "explain",
                &WorkingContext::minimal(),
                &BackendConfig::new("", "https://api.anthropic.com/v1/messages"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingCredential { backend: BackendId::Claude }));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn claude_success_returns_first_text_block() {
        let transport = Arc::new(RecordingTransport::replying(
            200,
            serde_json::json!({"content": [{"type": "text", "text": "It is a visitor."}]}),
        ));
        let reply = registry(&transport)
            .dispatch(
                BackendId::Claude,
                "explain this design",
                &WorkingContext::minimal(),
                &BackendConfig::new("sk-ant", "https://api.anthropic.com/v1/messages"),
            )
            .await
            .unwrap();
        assert_eq!(reply, "It is a visitor.");
        assert_eq!(transport.calls(), 1);
        let sent = transport.requests.lock().unwrap()[0].clone();
        assert_eq!(sent.url, "https://api.anthropic.com/v1/messages");
        assert_eq!(sent.header_value("x-api-key"), Some("sk-ant"));
    }

    #[tokio::test]
    async fn http_error_keeps_status_body_and_target() {
        let body = serde_json::json!({"error": {"message": "Model Not Exist", "type": "invalid_request_error"}});
        let transport = Arc::new(RecordingTransport::replying(400, body.clone()));
        let err = registry(&transport)
            .dispatch(
                BackendId::Deepseek,
                "fix it",
                &WorkingContext::minimal(),
                &BackendConfig::new("sk-ds", "https://api.deepseek.com/v1/chat/completions"),
            )
            .await
            .unwrap_err();
        let Error::BackendRequest(err) = err else {
            panic!("expected a backend failure, got {err:?}");
        };
        assert_eq!(err.status, Some(400));
        assert_eq!(err.reason, "Model Not Exist");
        assert_eq!(err.target, "https://api.deepseek.com/v1/chat/completions");
        assert_eq!(err.body.as_deref(), Some(body.to_string().as_str()));
        assert_eq!(transport.calls(), 1, "failures are not retried");
    }

    #[tokio::test]
    async fn transport_failure_is_a_backend_failure() {
        let transport = Arc::new(RecordingTransport::unreachable());
        let err = registry(&transport)
            .dispatch(
                BackendId::Deepseek,
                "optimize",
                &WorkingContext::minimal(),
                &BackendConfig::new("sk-ds", "https://api.deepseek.com"),
            )
            .await
            .unwrap_err();
        let Error::BackendRequest(err) = err else {
            panic!("expected a backend failure, got {err:?}");
        };
        assert_eq!(err.status, None);
        assert!(err.reason.contains("connection refused"));
    }

    #[tokio::test]
    async fn malformed_success_payload_is_reported() {
        let transport = Arc::new(RecordingTransport::raw(200, "not json"));
        let err = registry(&transport)
            .dispatch(
                BackendId::Aider,
                "push",
                &WorkingContext::minimal(),
                &BackendConfig::new("", "http://localhost:8501/api"),
            )
            .await
            .unwrap_err();
        let Error::BackendRequest(err) = err else {
            panic!("expected a backend failure, got {err:?}");
        };
        assert_eq!(err.status, Some(200));
        assert_eq!(err.body.as_deref(), Some("not json"));
    }

    #[tokio::test]
    async fn unexpected_shape_is_reported() {
        let transport = Arc::new(RecordingTransport::replying(200, serde_json::json!({"answer": "hi"})));
        let err = registry(&transport)
            .dispatch(
                BackendId::Aider,
                "push",
                &WorkingContext::minimal(),
                &BackendConfig::new("", "http://localhost:8501/api"),
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Unexpected response shape"));
    }

    #[tokio::test]
    async fn multi_is_not_dispatchable() {
        let transport = Arc::new(RecordingTransport::replying(200, serde_json::json!({})));
        let err = registry(&transport)
            .dispatch(
                BackendId::Multi,
                "anything",
                &WorkingContext::minimal(),
                &BackendConfig::new("k", "https://x"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn unregistered_backend_is_not_configured() {
        let transport = Arc::new(RecordingTransport::replying(200, serde_json::json!({})));
        let registry = AdapterRegistry::new(transport.clone());
        let err = registry
            .dispatch(
                BackendId::Claude,
                "explain",
                &WorkingContext::minimal(),
                &BackendConfig::new("k", "https://x"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotConfigured(BackendId::Claude)));
    }
}
