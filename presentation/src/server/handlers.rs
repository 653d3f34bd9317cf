//! Request handlers

use super::error::ApiError;
use super::state::AppState;
use axum::{
    Json,
    extract::State,
    http::header,
    response::{
        IntoResponse, Response,
        sse::{Event, Sse},
    },
};
use bytes::Bytes;
use futures::StreamExt;
use relay_domain::ChatRequest;
use serde::Serialize;
use tracing::error;

/// `POST /api/chat`
///
/// Answers with one SSE `data:` event per frame. Errors that happen before
/// streaming starts become a 500 JSON body; errors afterwards abort the body
/// so the client sees the stream end without `[DONE]`.
pub async fn chat(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let request: ChatRequest = serde_json::from_slice(&body).map_err(|e| {
        error!("Chat API error: {}", e);
        ApiError::from(e)
    })?;

    let frames = state.relay.execute(request).await.map_err(|e| {
        error!("Chat API error: {}", e);
        ApiError::from(e)
    })?;

    let events = frames.map(|frame| frame.map(|frame| Event::default().data(frame.data())));

    Ok((
        [
            (header::CACHE_CONTROL, "no-cache, no-transform"),
            (header::CONNECTION, "keep-alive"),
        ],
        Sse::new(events),
    )
        .into_response())
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub model: String,
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        model: state.relay.params().model.clone(),
    })
}
