/**
 * Server Initialization
 *
 * Builds the application state and router from a resolved `ServerConfig`.
 *
 * # Initialization Process
 *
 * 1. Create `AppState` (connection registry, user directory, token service)
 * 2. Create the router with every route and layer
 *
 * The state is returned next to the router so the caller can drain the
 * connection registry on shutdown.
 */

use axum::Router;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::ServerConfig;
use crate::backend::server::state::AppState;

/// Create and configure the Axum application
///
/// # Example
///
/// ```rust,no_run
/// use xfchat::backend::server::{config::ServerConfig, init::create_app};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ServerConfig::default();
/// let addr = config.socket_addr();
/// let (app, state) = create_app(config);
/// let listener = tokio::net::TcpListener::bind(addr).await?;
/// axum::serve(listener, app).await?;
/// state.registry.shutdown().await;
/// # Ok(())
/// # }
/// ```
pub fn create_app(config: ServerConfig) -> (Router<()>, AppState) {
    tracing::info!(
        production = config.production,
        static_dir = ?config.static_dir,
        client_origin = ?config.client_origin,
        "[Server] Initializing xfchat backend"
    );

    let app_state = AppState::new(config);
    let app = create_router(app_state.clone());

    tracing::info!("[Server] Router configured");

    (app, app_state)
}
