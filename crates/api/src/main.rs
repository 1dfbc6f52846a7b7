mod config;
mod error;
mod middleware;
mod routes;
mod state;

use std::sync::Arc;

use site_content_core::auth::{AdminAuth, SessionConfig};
use site_content_core::events::{ContentEvent, EventBus};
use site_content_core::store::{FileLocalStore, PgRemoteStore};
use site_content_core::ContentEngine;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (dev convenience)
    let _ = dotenvy::dotenv();

    let config = config::AppConfig::from_env()
        .map_err(|e| anyhow::anyhow!("Failed to load config: {e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    tracing::info!("Starting site content API");

    let local = FileLocalStore::open(&config.data_dir).map_err(|e| {
        anyhow::anyhow!("Failed to open local store at {}: {e}", config.data_dir.display())
    })?;
    tracing::info!(dir = %local.dir().display(), "Opened local content store");

    let event_bus = EventBus::new(config.event_bus_capacity);
    let mut engine = ContentEngine::new(Arc::new(local), config.engine_config())
        .with_event_bus(event_bus.clone());

    match &config.database_url {
        Some(url) => {
            let remote = PgRemoteStore::connect_lazy(url, config.db_max_connections)
                .map_err(|e| anyhow::anyhow!("Invalid DATABASE_URL: {e}"))?;
            match remote.run_migrations().await {
                Ok(()) => tracing::info!("Remote store migrations applied"),
                Err(e) => tracing::warn!(error = %e, "Remote store unreachable, continuing; loads fall back to local storage"),
            }
            engine = engine.with_remote(Arc::new(remote));
        }
        None => tracing::info!("DATABASE_URL not set, running with local storage only"),
    }

    let engine = Arc::new(engine);
    tokio::spawn(log_events(event_bus));

    // Warm the local cache from the remote before serving.
    let initial = engine.load().await;
    tracing::info!(
        blocks = initial.blocks.len(),
        source = ?engine.data_source(),
        "Loaded initial content"
    );

    let auth = AdminAuth::new(
        config.admin_password_hash.clone(),
        SessionConfig::new(config.jwt_secret.clone()),
    );
    let state = state::AppState::new(Arc::clone(&engine), auth);

    let app = routes::build_router(state)
        .layer(middleware::body_limit::body_limit_layer(config.max_body_bytes))
        .layer(middleware::request_tracing::trace_layer())
        .layer(middleware::cors::cors_layer());

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Don't lose an editor's last keystrokes on shutdown.
    if let Some(outcome) = engine.flush_pending().await {
        tracing::info!(success = outcome.success, "Flushed pending save");
    }

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Log engine events; this is where debounced save outcomes surface.
async fn log_events(bus: EventBus) {
    let mut rx = bus.subscribe();
    loop {
        match rx.recv().await {
            Ok(ContentEvent::Saved(outcome)) if outcome.success => {
                tracing::info!(message = ?outcome.message, "Content saved");
            }
            Ok(ContentEvent::Saved(outcome)) => {
                tracing::warn!(message = ?outcome.message, error = ?outcome.error, "Content save failed");
            }
            Ok(ContentEvent::Loaded { source }) => tracing::debug!(?source, "Content loaded"),
            Ok(ContentEvent::Imported) => tracing::info!("Backup imported"),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Event logger lagged behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => { tracing::info!("Received Ctrl+C, shutting down..."); }
        _ = terminate => { tracing::info!("Received SIGTERM, shutting down..."); }
    }
}
