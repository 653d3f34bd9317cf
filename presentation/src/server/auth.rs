//! Optional bearer token check for the chat endpoint

use super::error::ApiError;
use super::state::AppState;
use axum::{
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

pub async fn require_bearer(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let Some(expected) = state.auth_token.as_deref() else {
        return next.run(req).await;
    };

    match extract_bearer(req.headers().get(header::AUTHORIZATION)) {
        Some(token) if token == expected => next.run(req).await,
        _ => {
            warn!("Rejected request to {} without valid token", req.uri().path());
            ApiError::Unauthorized.into_response()
        }
    }
}

fn extract_bearer(header: Option<&HeaderValue>) -> Option<&str> {
    let value = header?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
}
