//! HTTP relay server (axum)
//!
//! Routes:
//!
//! - `POST /api/chat`: stream a chat reply as `data:` frames
//! - `GET /health`: liveness and configured model

mod auth;
mod error;
mod handlers;
mod state;

pub use error::{ApiError, CHAT_FAILED, ErrorBody};
pub use state::AppState;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Build the relay router.
pub fn router(state: AppState) -> Router {
    let chat = Router::new()
        .route("/api/chat", post(handlers::chat))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(chat)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until `shutdown` resolves, then finish in-flight responses.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Relay listening on http://{}", addr);
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
