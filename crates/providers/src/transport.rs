//! HTTP transport backed by `reqwest`.

use async_trait::async_trait;
use heimdall_core::error::TransportError;
use heimdall_core::transport::{HttpRequest, HttpResponse, Transport};
use tracing::debug;

/// Sends prepared requests over HTTP.
///
/// No request timeout is set: a stalled backend stalls the command.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("heimdall/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Use an existing client (shared connection pool, custom TLS, ...).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
        let mut builder = self.client.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        // Headers first: `json()` keeps an existing Content-Type.
        builder = builder.json(&request.body);

        debug!(target_url = %request.url, "Sending backend request");

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::new(&request.url, e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::new(&request.url, format!("Failed to read response body: {e}")))?;

        debug!(target_url = %request.url, status, "Backend responded");

        Ok(HttpResponse { status, body })
    }
}
