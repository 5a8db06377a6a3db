//! HTTP server with graceful shutdown

use axum::http::header::{HeaderName, LINK, LOCATION};
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::{DefaultOnResponse, TraceLayer},
};

use crate::{
    config::Config,
    error::Result,
    handlers::{AlertHeaders, X_TOTAL_COUNT, X_TOTAL_PAGES},
    middleware::{
        request_id_layer, request_id_propagation_layer, sensitive_headers_layer, RequestSpan,
        REQUEST_ID_HEADER,
    },
};

/// Server instance
pub struct Server {
    config: Config,
}

impl Server {
    /// Create a new server instance
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Wrap `app` in the middleware stack.
    ///
    /// From the outside in: CORS, compression, timeout, body limit, request
    /// id, sensitive header masking, trace, panic recovery. The request id is
    /// assigned before the trace span opens so every log line carries it.
    pub fn layer(&self, app: Router) -> Router {
        let middleware = &self.config.middleware;

        let app = if middleware.catch_panic {
            app.layer(CatchPanicLayer::new())
        } else {
            app
        };

        let app = app
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(RequestSpan)
                    .on_response(DefaultOnResponse::new().include_headers(true)),
            )
            .layer(sensitive_headers_layer())
            .layer(request_id_propagation_layer())
            .layer(request_id_layer())
            .layer(RequestBodyLimitLayer::new(middleware.body_limit_bytes()))
            .layer(TimeoutLayer::with_status_code(
                http::StatusCode::REQUEST_TIMEOUT,
                self.config.service.timeout(),
            ));

        let app = if middleware.compression {
            app.layer(CompressionLayer::new())
        } else {
            app
        };

        app.layer(self.build_cors_layer())
    }

    /// Run the server with the given router
    pub async fn serve(self, app: Router) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.service.port));

        tracing::info!("Starting {} on {}", self.config.service.name, addr);
        self.log_middleware_config();

        let app = self.layer(app);
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    /// Log middleware configuration for debugging
    fn log_middleware_config(&self) {
        let middleware = &self.config.middleware;
        tracing::info!("Middleware configuration:");
        tracing::info!(
            "  - Panic recovery: {}",
            if middleware.catch_panic { "enabled" } else { "disabled" }
        );
        tracing::info!("  - Request ID tracking: enabled");
        tracing::info!("  - Sensitive header masking: enabled");
        tracing::info!("  - Request body limit: {} MB", middleware.body_limit_mb);
        tracing::info!(
            "  - Compression: {}",
            if middleware.compression { "enabled" } else { "disabled" }
        );
        tracing::info!("  - CORS mode: {}", middleware.cors_mode);
        tracing::info!(
            "  - Request timeout: {} seconds",
            self.config.service.timeout_secs
        );
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build CORS layer based on configuration
    fn build_cors_layer(&self) -> CorsLayer {
        match self.config.middleware.cors_mode.as_str() {
            "permissive" => {
                tracing::debug!("Enabling permissive CORS");
                CorsLayer::permissive()
            }
            "restrictive" => {
                tracing::debug!("Enabling restrictive CORS (default deny)");
                CorsLayer::new().expose_headers(self.exposed_headers())
            }
            "disabled" => {
                tracing::debug!("CORS disabled (using restrictive)");
                CorsLayer::new()
            }
            _ => {
                tracing::warn!(
                    "Unknown CORS mode: {}, defaulting to permissive",
                    self.config.middleware.cors_mode
                );
                CorsLayer::permissive()
            }
        }
    }

    // Response headers browser clients read: paging, location, request id
    // and the alert headers.
    fn exposed_headers(&self) -> Vec<HeaderName> {
        let mut exposed = vec![LINK, LOCATION, X_TOTAL_COUNT, X_TOTAL_PAGES, REQUEST_ID_HEADER];
        match AlertHeaders::new(self.config.alerts.application_name.as_str()) {
            Ok(alerts) => exposed.extend(alerts.header_names()),
            Err(e) => tracing::warn!("Alert headers not exposed to CORS clients: {}", e),
        }
        exposed
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
///
/// A handler that cannot be installed is logged and never fires; the other
/// signal still shuts the server down.
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
        _ = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl+C), starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }

    tracing::info!("Shutdown signal received, draining requests...");
}
