//! Command engine: parse, gather context, route, dispatch.

use std::sync::Arc;

use heimdall_config::AppConfig;
use heimdall_core::command::ParsedCommand;
use heimdall_core::context::{ActiveDocument, WorkingContext, WorkspaceProvider};
use heimdall_core::error::{Error, Result};
use heimdall_core::response::ModelResponse;
use heimdall_providers::AdapterRegistry;
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use crate::context::ContextBuilder;
use crate::parser;
use crate::router::{ModelRouter, RoutingDecision};

/// Outcome of a dry run: everything decided up to the backend call.
#[derive(Debug, Clone)]
pub struct RoutePlan {
    pub parsed: ParsedCommand,
    pub context: WorkingContext,
    pub decision: RoutingDecision,
}

/// Processes text commands end to end.
///
/// One sequential await chain per command. The engine holds no mutable
/// state, so concurrent commands are independent.
pub struct Engine {
    config: AppConfig,
    context_builder: ContextBuilder,
    router: ModelRouter,
    registry: AdapterRegistry,
}

impl Engine {
    pub fn new(
        config: AppConfig,
        workspace: Arc<dyn WorkspaceProvider>,
        router: ModelRouter,
        registry: AdapterRegistry,
    ) -> Self {
        Self {
            config,
            context_builder: ContextBuilder::new(workspace),
            router,
            registry,
        }
    }

    /// Engine over the built-in router and HTTP adapters.
    pub fn with_defaults(config: AppConfig, workspace: Arc<dyn WorkspaceProvider>) -> Self {
        Self::new(config, workspace, ModelRouter::new(), AdapterRegistry::http())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run a command and return the backend's reply.
    pub async fn process_command(
        &self,
        input: &str,
        document: Option<&dyn ActiveDocument>,
    ) -> Result<ModelResponse> {
        let span = info_span!("command", request_id = %Uuid::new_v4());
        self.run(input, document).instrument(span).await
    }

    /// Parse, gather context and route without calling any backend.
    pub async fn plan(&self, input: &str, document: Option<&dyn ActiveDocument>) -> Result<RoutePlan> {
        let parsed = parser::parse(input)?;
        let context = self.context_builder.build(document).await;
        let decision = self.router.decide(&parsed, &context);
        Ok(RoutePlan {
            parsed,
            context,
            decision,
        })
    }

    async fn run(&self, input: &str, document: Option<&dyn ActiveDocument>) -> Result<ModelResponse> {
        let RoutePlan {
            parsed,
            context,
            decision,
        } = self.plan(input, document).await?;
        let backend = decision.backend();

        info!(backend = %backend, "Processing command");
        if let RoutingDecision::Scored { scores, .. } = &decision {
            info!(backend = %backend, scores = %scores, "Selected backend for multi-mode prompt");
        }

        let result = match self.config.backends.get(backend) {
            Some(config) => {
                self.registry
                    .dispatch(backend, parsed.prompt(), &context, config)
                    .await
            }
            None => {
                error!(backend = %backend, "No configuration found for backend");
                Err(Error::NotConfigured(backend))
            }
        };

        match result {
            Ok(content) => Ok(ModelResponse::new(content, backend)),
            Err(e) if parsed.is_multi_mode() && matches!(e, Error::NotConfigured(_) | Error::Internal(_)) => {
                error!(error = %e, "Failed to handle multi-mode");
                Err(Error::routing(e))
            }
            Err(e) => Err(e),
        }
    }
}
