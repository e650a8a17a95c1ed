//! Application startup and lifecycle management.

use crate::config::SummarizationConfig;
use crate::handlers::{health, suggestions, summary};
use crate::middleware::http_metrics_middleware;
use crate::services::{build_gateway, ModelGateway};
use anyhow::anyhow;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method, Request},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    request_id_middleware, security_headers_middleware, RequestId, REQUEST_ID_HEADER,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state. Immutable once the server is running.
#[derive(Clone)]
pub struct AppState {
    pub config: SummarizationConfig,
    pub gateway: Arc<dyn ModelGateway>,
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the gateway selected by the configuration.
    pub async fn build(config: SummarizationConfig) -> Result<Self, AppError> {
        config.validate()?;

        let gateway = build_gateway(&config).map_err(|e| {
            tracing::error!("Failed to initialize model gateway: {}", e);
            AppError::ConfigError(anyhow!("Failed to initialize model gateway: {}", e))
        })?;

        Self::build_with_gateway(config, gateway).await
    }

    /// Build the application around an already constructed gateway.
    pub async fn build_with_gateway(
        config: SummarizationConfig,
        gateway: Arc<dyn ModelGateway>,
    ) -> Result<Self, AppError> {
        // Port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port,
            backend = gateway.name(),
            "Summarization service listening"
        );

        let router = build_router(AppState { config, gateway });

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until SIGINT/SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Service shutdown complete");
        Ok(())
    }
}

/// Assemble routes and layers around the given state.
pub fn build_router(state: AppState) -> Router {
    let max_body_bytes = state.config.http.max_body_bytes;
    let cors = cors_layer(&state.config.http.allowed_origins);

    let generation_routes = Router::new()
        .route(
            "/generateQuerySummary",
            post(summary::generate_query_summary),
        )
        .route("/generateSummary", post(summary::generate_summary))
        .route(
            "/generateQuerySuggestions",
            post(suggestions::generate_query_suggestions),
        )
        .route_layer(from_fn(http_metrics_middleware));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(health::metrics_handler))
        .merge(generation_routes)
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let request_id = request
                    .extensions()
                    .get::<RequestId>()
                    .map(|id| id.0.as_str())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Runs before the trace layer so the span sees the request id.
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors)
}

/// Any origin when none (or `*`) are configured; the extension calls from the
/// browser.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origin = if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(allowed_origins.iter().filter_map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|e| tracing::warn!("Ignoring invalid CORS origin '{}': {}", origin, e))
                .ok()
        }))
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
