//! HTTP surface of the AroMi backend: `GET /`, `GET /health`, `POST /chat`.

pub mod core;
pub mod error_handler;
pub mod middleware_layer;
mod routes;

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::signal;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

pub use crate::core::app_state::{ApiConfig, AppState};
pub use crate::error_handler::{AppError, AppResult};

use crate::{
    middleware_layer::{json_extractor::json_error_mapper, panic_guard::panic_response},
    routes::{
        chat::chat_route::chat_route,
        status_route::{health_status, root_status},
    },
};

/// Builds the router with all routes, middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let routes = Router::new()
        .route("/", get(root_status))
        .route("/health", get(health_status))
        .route("/chat", post(chat_route))
        .with_state(state);

    with_middleware(routes)
}

/// Wraps `routes` in the service middleware stack. Panic recovery is the
/// outermost layer.
pub fn with_middleware(routes: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes
        .layer(middleware::from_fn(json_error_mapper))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(CatchPanicLayer::custom(panic_response))
}

/// Binds `0.0.0.0:{port}` and serves until Ctrl+C.
pub async fn start(config: ApiConfig, state: AppState) -> AppResult<()> {
    let app = router(Arc::new(state));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(AppError::Bind)?;
    info!(%addr, "listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
