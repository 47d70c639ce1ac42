/**
 * Router Configuration
 *
 * Combines every route into a single Axum router.
 *
 * # Route Order
 *
 * 1. Realtime socket (`GET /ws?userId=...`)
 * 2. API routes (auth, messages)
 * 3. Static frontend with SPA fallback, when a static directory is configured
 * 4. Otherwise a JSON 404 fallback
 *
 * # Layers
 *
 * - `TraceLayer` for request logging
 * - `CorsLayer` allowing the configured client origin with credentials
 */

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::get,
    Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::backend::realtime::ws_upgrade;
use crate::backend::routes::api_routes::{configure_api_routes, route_not_found};
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Route Details
///
/// - `GET /ws` - Realtime presence socket, identity from the `userId` query
/// - `/api/...` - See `api_routes`
/// - Everything else - `index.html`-backed static files, or 404 JSON
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route("/ws", get(ws_upgrade));
    let router = configure_api_routes(router, &app_state);

    let router = match &app_state.config.static_dir {
        Some(dir) => {
            tracing::info!("[Router] Serving frontend from {}", dir.display());
            let index = dir.join("index.html");
            router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)))
        }
        None => router.fallback(route_not_found),
    };

    let router = match cors_layer(app_state.config.client_origin.as_deref()) {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// CORS for the browser client; cookies need `allow_credentials`
fn cors_layer(origin: Option<&str>) -> Option<CorsLayer> {
    let origin = origin?;
    let origin = match origin.parse::<HeaderValue>() {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("[Router] Ignoring invalid CLIENT_ORIGIN {:?}: {}", origin, e);
            return None;
        }
    };

    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE, AUTHORIZATION]),
    )
}
