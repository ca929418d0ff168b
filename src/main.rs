//! Draftroom Server — collaborative document editor backend
//!
//! Main entry point that wires all crates together and starts the server.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use draftroom_core::config::AppConfig;
use draftroom_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("DRAFTROOM_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Draftroom v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db = draftroom_database::connection::create_pool(&config.database).await?;

    draftroom_database::migration::run_migrations(&db).await?;

    // ── Step 2: Repositories and version store ───────────────────
    let document_repo = Arc::new(
        draftroom_database::repositories::document::DocumentRepository::new(db.clone()),
    );
    let version_repo = Arc::new(
        draftroom_database::repositories::version::VersionRepository::new(db.clone()),
    );
    let store: Arc<dyn draftroom_service::VersionStore> = Arc::new(
        draftroom_service::SqlVersionStore::new(document_repo, version_repo),
    );

    // ── Step 3: Services ─────────────────────────────────────────
    let versions = Arc::new(draftroom_service::VersionService::new(Arc::clone(&store)));
    let diffs = Arc::new(draftroom_service::DiffService::new(Arc::clone(&store)));
    tracing::info!("Services initialized");

    // ── Step 4: Collaboration hub ────────────────────────────────
    let hub = Arc::new(draftroom_realtime::CollabHub::new(&config.realtime));
    tracing::info!("Collaboration hub initialized");

    // ── Step 5: Throttle ─────────────────────────────────────────
    let throttle = Arc::new(draftroom_api::middleware::throttle::ThrottleLimiter::new(
        config.throttle.clone(),
    ));
    if throttle.enabled() {
        tracing::info!("Write throttle enabled");
    }

    // ── Step 6: Build and start HTTP server ──────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let app_state = draftroom_api::state::AppState {
        config: Arc::new(config),
        db,
        versions,
        diffs,
        hub,
        throttle,
    };

    let app = draftroom_api::router::build_router(app_state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Draftroom server listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("Draftroom server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
