use crate::config::Config;
use crate::error::Error;
use crate::streaming::{self, MediaRoot};
use anyhow::{Context, Result};
use axum::{
    extract::OriginalUri,
    http::{header, Method},
    routing::get_service,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeFile,
    trace::TraceLayer,
};

pub mod routes_api;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    /// Read-only configuration, including the advertised video record
    pub config: Arc<Config>,
    /// Canonical media root for manifests and segments
    pub media_root: Arc<MediaRoot>,
    /// Canonical static directory for everything else, if configured
    pub static_root: Option<Arc<MediaRoot>>,
}

impl AppContext {
    /// Resolve the configured directories once.
    pub fn new(config: Config) -> Result<Self> {
        let media_root = MediaRoot::new(&config.media.root)
            .with_context(|| format!("Media root is not accessible: {:?}", config.media.root))?;

        let static_root = match &config.server.static_dir {
            Some(dir) => match MediaRoot::new(dir) {
                Ok(root) => Some(Arc::new(root)),
                Err(e) => {
                    tracing::warn!("Static directory {:?} unavailable: {}", dir, e);
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            config: Arc::new(config),
            media_root: Arc::new(media_root),
            static_root,
        })
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD])
        .allow_headers([header::RANGE]);

    let index = ServeFile::new(&ctx.config.server.index_file);

    Router::new()
        .route("/", get_service(index).fallback(method_not_found))
        .nest("/api", routes_api::api_routes())
        // Manifests, segments and static assets
        .fallback(streaming::serve_resource)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// Unhandled methods on routed paths answer 404, same as unknown paths.
pub(crate) async fn method_not_found(OriginalUri(uri): OriginalUri) -> Error {
    Error::not_found(uri.path())
}

/// Start the HTTP server
pub async fn start_server(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let ctx = AppContext::new(config)?;
    tracing::info!("Serving media from {:?}", ctx.media_root.path());
    if let Some(root) = &ctx.static_root {
        tracing::info!("Serving static files from {:?}", root.path());
    }

    let app = create_router(ctx);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
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
