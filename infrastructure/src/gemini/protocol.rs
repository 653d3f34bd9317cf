//! Wire types for the Gemini `streamGenerateContent` endpoint.
//!
//! # Protocol Overview
//!
//! - **Request**: `POST /v1beta/models/{model}:streamGenerateContent?alt=sse`
//!   with the whole conversation as `contents`
//! - **Response**: SSE, one `data: {GenerateContentResponse}` line per
//!   increment; the body ends after the last candidate
//! - **Errors**: non-2xx status with an error object, or a `data:` line
//!   carrying `{"error": {...}}` mid-stream

use relay_domain::{Role, WireMessage};
use serde::{Deserialize, Serialize};

/// Gemini's name for a role.
pub fn upstream_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "model",
    }
}

/// Request body
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Build a request from prior history plus the newest user message.
    pub fn new(history: &[Content], message: &str) -> Self {
        let mut contents = history.to_vec();
        contents.push(Content::text(upstream_role(Role::User), message));
        Self { contents }
    }
}

/// One turn of the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn text(role: &str, text: &str) -> Self {
        Self {
            role: role.to_string(),
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }
}

/// Map prior turns to request contents, dropping unusable model replies.
///
/// A run of model turns with an empty part is removed together with the
/// user turn before it, so the history keeps alternating and never carries
/// an empty `text`.
pub fn curated_history(history: &[WireMessage]) -> Vec<Content> {
    let mut curated = Vec::with_capacity(history.len());
    let mut i = 0;
    while i < history.len() {
        if history[i].role == Role::User {
            curated.push(Content::from(&history[i]));
            i += 1;
            continue;
        }
        let start = i;
        while i < history.len() && history[i].role == Role::Assistant {
            i += 1;
        }
        let replies: Vec<Content> = history[start..i].iter().map(Content::from).collect();
        if replies.iter().all(Content::is_valid) {
            curated.extend(replies);
        } else {
            curated.pop();
        }
    }
    curated
}

impl Content {
    /// At least one part, and no part with empty text.
    pub fn is_valid(&self) -> bool {
        !self.parts.is_empty()
            && self
                .parts
                .iter()
                .all(|p| p.text.as_deref().is_none_or(|t| !t.is_empty()))
    }
}

impl From<&WireMessage> for Content {
    fn from(message: &WireMessage) -> Self {
        Content::text(upstream_role(message.role), &message.content)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// One SSE increment
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub error: Option<ApiError>,
}

impl GenerateContentResponse {
    /// Text carried by the first candidate.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

/// Error object
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Body of a non-2xx response
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: ApiError,
}
