use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use student_api::cli::Cli;
use student_api::config::AppConfig;
use student_api::database::{DatabaseManager, StudentRepository};
use student_api::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DB_HOST, DB_USER, etc. are picked up
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("student_api=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.apply(AppConfig::from_env());
    tracing::info!("Starting Student API in {:?} mode", config.environment);

    let db = DatabaseManager::new(&config.database).context("invalid database configuration")?;
    db.log_connectivity().await;

    let state = AppState::new(
        Arc::new(StudentRepository::new(db.clone())),
        config.pagination.clone(),
    );
    let app = if config.server.enable_cors {
        student_api::app_with_cors(state)
    } else {
        student_api::app(state)
    };

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Server is running on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
