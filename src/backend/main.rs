/**
 * xfchat Server Entry Point
 *
 * Loads `.env`, initializes tracing, resolves the configuration and serves
 * the app until Ctrl-C. On shutdown every live realtime connection is closed.
 */

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::EnvFilter;
    use xfchat::backend::server::{config::ServerConfig, init::create_app};

    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!("[STARTUP] Server initialization started");

    let config = ServerConfig::from_env()?;
    let addr = config.socket_addr();
    let (app, state) = create_app(config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("[STARTUP] Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state.registry.clone()))
        .await?;

    tracing::info!("[STARTUP] Server stopped");

    Ok(())
}

/// Resolves on Ctrl-C after closing every realtime connection
#[cfg(feature = "ssr")]
async fn shutdown_signal(registry: xfchat::backend::ConnectionRegistry) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("[STARTUP] Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("[STARTUP] Shutdown signal received");
    registry.shutdown().await;
}

#[cfg(not(feature = "ssr"))]
fn main() {
    eprintln!("Server requires the 'ssr' feature to be enabled.");
    eprintln!("Run with: cargo run --bin xfchat-server --features ssr");
    std::process::exit(1);
}
