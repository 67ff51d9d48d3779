//! HTTP listener and middleware stack.

use axum::Router;
use axum::http::StatusCode;
use dbadmin_core::ServerConfig;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Wrap `router` with tracing, CORS and the request timeout.
///
/// Layers run outermost first: trace, CORS, timeout.
pub fn with_http_layers(router: Router, config: &ServerConfig) -> Router {
    let router = router.layer(TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        Duration::from_secs(config.request_timeout_secs),
    ));
    let router = if config.cors_permissive {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };
    router.layer(TraceLayer::new_for_http())
}

/// Bind `config.bind` and serve until SIGINT/SIGTERM.
pub async fn serve(router: Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let app = with_http_layers(router, config);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "dbadmin-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("dbadmin-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to register SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received SIGINT, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
