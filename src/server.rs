use std::{path::Path, sync::Arc, time::Duration};

use anyhow::Context;
use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::db;
use crate::routes::{
    health_handler, search_handler, submit_guardian_handler, submit_student_handler,
    submit_teacher_handler,
};
use crate::state::AppState;

/// API routes plus the client bundle under `static_dir`. Paths that match
/// neither resolve to `index.html` so client-side routing keeps working.
pub fn build_router(state: Arc<AppState>, static_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let assets =
        ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/submit-form", post(submit_guardian_handler))
        .route("/api/submit-form/teacher", post(submit_teacher_handler))
        .route("/api/submit-form/student", post(submit_student_handler))
        .route("/api/search-schools", get(search_handler))
        .fallback_service(assets)
        .layer(cors)
        .with_state(state)
}

pub async fn start_server(config: &Config) -> anyhow::Result<()> {
    info!("Initializing state...");
    let state = AppState::connect(config).await?;

    match db::ping(&state.pool).await {
        Ok(()) => info!("Successfully connected to database"),
        Err(e) if config.production => {
            return Err(e).context("database unreachable at startup");
        }
        Err(e) => warn!("Error connecting to database: {e}"),
    }

    let app = build_router(state, &config.static_dir);

    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
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
}
