use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinedash_api::config::{ServerConfig, StoreBackend};
use cinedash_api::router::build_app_router;
use cinedash_api::state::AppState;
use cinedash_db::memory::MemoryMovieStore;
use cinedash_db::store::{MovieStore, PgMovieStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinedash_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        store = ?config.store,
        "Loaded server configuration"
    );

    // --- Storage ---
    let store = connect_store(&config).await;

    // --- App state ---
    let state = AppState {
        store: Arc::clone(&store),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, closing store");

    let close_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    if tokio::time::timeout(close_timeout, store.close()).await.is_err() {
        tracing::warn!(
            timeout_secs = config.shutdown_timeout_secs,
            "Timed out closing the movie store"
        );
    }

    tracing::info!("Graceful shutdown complete");
}

/// Construct the configured movie store and make sure it is ready to serve.
///
/// For PostgreSQL this connects the pool, checks connectivity and applies
/// migrations. Any failure aborts startup.
async fn connect_store(config: &ServerConfig) -> Arc<dyn MovieStore> {
    match config.store {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory movie store; data is lost on restart");
            Arc::new(MemoryMovieStore::new())
        }
        StoreBackend::Postgres => {
            let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

            let pool = cinedash_db::create_pool(&database_url, config.db_max_connections)
                .await
                .expect("Failed to connect to database");
            tracing::info!(
                max_connections = config.db_max_connections,
                "Database connection pool created"
            );

            cinedash_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            cinedash_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            Arc::new(PgMovieStore::new(pool))
        }
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
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
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
