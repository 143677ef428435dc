//! Lending Backend Server
//!
//! REST endpoints for accounts and loan offers plus a WebSocket chat relay.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use lending_server::auth::AuthService;
use lending_server::config::Config;
use lending_server::loan_service::LoanService;
use lending_server::routes;
use lending_server::state::AppState;
use lending_server::store::PgStore;
use lending_server::websocket::ChatRelay;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("lending_server=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env().context("Invalid configuration")?;
    let cors_origin: HeaderValue = config
        .cors_origin
        .parse()
        .with_context(|| format!("Invalid CORS origin {:?}", config.cors_origin))?;

    // Initialize database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = match PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database");
            return Err(e).context("Failed to connect to database");
        }
    };
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database connected successfully");

    let store = Arc::new(PgStore::new(db_pool.clone()));
    let auth_service = Arc::new(AuthService::new(store.clone(), &config.auth));
    let loan_service = Arc::new(LoanService::new(store));
    let app_state = AppState::new(auth_service, loan_service, ChatRelay::new());

    let app = routes::app(app_state, cors_origin);

    let addr = SocketAddr::new(config.host, config.port);
    tracing::info!("Server starting on {}", addr);
    tracing::info!("WebSocket available at ws://{}/ws", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Shutting down, closing database pool");
    db_pool.close().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
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
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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
