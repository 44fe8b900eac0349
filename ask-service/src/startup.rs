//! Application startup and lifecycle management.
//!
//! Wires configuration into the ask service and serves it over HTTP.

use crate::config::AskConfig;
use crate::handlers;
use crate::services::metrics::init_metrics;
use crate::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use crate::services::providers::TextProvider;
use crate::services::{AskService, FileKnowledgeSource, KnowledgeSource};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::tracing::{request_id_middleware, REQUEST_ID_HEADER};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AskConfig>,
    pub ask_service: AskService,
}

impl AppState {
    pub fn new(
        config: AskConfig,
        knowledge: Arc<dyn KnowledgeSource>,
        text_provider: Arc<dyn TextProvider>,
    ) -> Self {
        let ask_service = AskService::new(
            knowledge,
            text_provider,
            config.knowledge.max_context_chars,
        );

        Self {
            config: Arc::new(config),
            ask_service,
        }
    }

    /// Build the production wiring: file-backed knowledge and the Gemini provider.
    pub fn from_config(config: AskConfig) -> Result<Self, AppError> {
        let knowledge: Arc<dyn KnowledgeSource> =
            Arc::new(FileKnowledgeSource::from_settings(&config.knowledge));

        let text_provider: Arc<dyn TextProvider> = Arc::new(
            GeminiTextProvider::new(GeminiConfig::from(&config.gemini)).map_err(|e| {
                tracing::error!("Failed to create Gemini HTTP client: {}", e);
                AppError::InternalError(anyhow::Error::new(e))
            })?,
        );

        tracing::info!(
            model = %config.gemini.model,
            timeout_secs = ?config.gemini.timeout_secs,
            knowledge_file = %config.knowledge.file_path().display(),
            max_context_chars = config.knowledge.max_context_chars,
            "Initialized Gemini text provider"
        );

        Ok(Self::new(config, knowledge, text_provider))
    }
}

/// Build the HTTP router with CORS open to every origin.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ask", post(handlers::ask))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: AskConfig) -> Result<Self, AppError> {
        let state = AppState::from_config(config)?;
        Self::build_with_state(state).await
    }

    /// Bind the listener for an already wired state (port 0 = random port).
    pub async fn build_with_state(state: AppState) -> Result<Self, AppError> {
        init_metrics();

        let addr = SocketAddr::from(([0, 0, 0, 0], state.config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Server running at http://0.0.0.0:{}", port);

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }

    /// Run until `signal` resolves, then drain in-flight requests.
    pub async fn run_with_shutdown<F>(self, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(signal)
            .await
    }
}
