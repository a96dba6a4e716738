use resource_server::{AppState, Config, Database, create_router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load the configuration
    let config = Config::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        e
    })?;

    // RUST_LOG wins, otherwise the level follows APP_ENV
    let level = config.default_log_level();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("resource_server={level},tower_http={level}"))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    config.print_info();

    // Open the database and make sure the schema exists
    let db = Database::connect(&config.db_path, config.max_connections)
        .await
        .map_err(|e| {
            error!("Failed to open database: {}", e);
            e
        })?;

    let state = Arc::new(AppState::new(db.clone()));
    let app = create_router(state);

    let listener = TcpListener::bind(config.bind_address()).await?;
    info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
