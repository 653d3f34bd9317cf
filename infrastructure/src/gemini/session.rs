//! Gemini session management.
//!
//! Provides [`GeminiSession`] which implements [`LlmSession`] for one relayed
//! request. The session holds the prior turns; sending the newest message
//! posts the whole conversation and streams the reply back as
//! [`StreamEvent`]s.

use crate::gemini::error::{GeminiError, Result};
use crate::gemini::protocol::{
    Content, ErrorResponse, GenerateContentRequest, GenerateContentResponse,
};
use async_trait::async_trait;
use futures::StreamExt;
use relay_application::{GatewayError, LlmSession, StreamHandle};
use relay_domain::{DATA_PREFIX, LineBuffer, StreamEvent};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const EVENT_BUFFER: usize = 64;

/// An active conversation with one Gemini model.
pub struct GeminiSession {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
    history: Vec<Content>,
}

impl GeminiSession {
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        api_key: String,
        model: &str,
        history: Vec<Content>,
    ) -> Self {
        Self {
            client,
            url: format!("{}/v1beta/models/{}:streamGenerateContent", base_url, model),
            api_key,
            model: model.to_string(),
            history,
        }
    }

    /// Post the conversation and wait for the response status.
    async fn open(&self, content: &str) -> Result<reqwest::Response> {
        let body = GenerateContentRequest::new(&self.history, content);
        debug!("POST {} ({} contents)", self.url, body.contents.len());

        let response = self
            .client
            .post(&self.url)
            .query(&[("alt", "sse")])
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let body = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(GeminiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl LlmSession for GeminiSession {
    fn model(&self) -> &str {
        &self.model
    }

    async fn send_streaming(
        &self,
        content: &str,
    ) -> std::result::Result<StreamHandle, GatewayError> {
        let response = self.open(content).await?;
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        tokio::spawn(read_events(response, tx));
        Ok(StreamHandle::new(rx))
    }
}

/// Forward upstream increments until the body ends or the receiver is gone.
async fn read_events(response: reqwest::Response, tx: mpsc::Sender<StreamEvent>) {
    let mut body = response.bytes_stream();
    let mut lines = LineBuffer::new();
    let mut full_text = String::new();

    loop {
        let batch = match body.next().await {
            Some(Ok(chunk)) => lines.push(&chunk),
            Some(Err(e)) => {
                warn!("Gemini stream read failed: {}", e);
                let _ = tx.send(StreamEvent::Error(e.to_string())).await;
                return;
            }
            None => {
                let tail: Vec<String> = lines.finish().into_iter().collect();
                if forward_lines(tail, &tx, &mut full_text).await.is_err() {
                    return;
                }
                break;
            }
        };

        if forward_lines(batch, &tx, &mut full_text).await.is_err() {
            return;
        }
    }

    info!("Gemini stream finished ({} chars)", full_text.len());
    let _ = tx.send(StreamEvent::Completed(full_text)).await;
}

/// Why forwarding stopped early.
#[derive(Debug)]
enum Stop {
    ReceiverGone,
    UpstreamError,
}

async fn forward_lines(
    lines: Vec<String>,
    tx: &mpsc::Sender<StreamEvent>,
    full_text: &mut String,
) -> std::result::Result<(), Stop> {
    for line in lines {
        let Some(data) = line.strip_prefix(DATA_PREFIX) else {
            continue;
        };
        let increment = match serde_json::from_str::<GenerateContentResponse>(data) {
            Ok(increment) => increment,
            Err(e) => {
                warn!("Skipping unparseable Gemini chunk: {}", e);
                continue;
            }
        };

        if let Some(error) = increment.error {
            let error = GeminiError::Api {
                code: error.code,
                message: error.message,
            };
            warn!("{}", error);
            let _ = tx.send(StreamEvent::Error(error.to_string())).await;
            return Err(Stop::UpstreamError);
        }

        let text = increment.text();
        if text.is_empty() {
            continue;
        }
        full_text.push_str(&text);
        if tx.send(StreamEvent::Delta(text)).await.is_err() {
            debug!("Receiver dropped, abandoning Gemini stream");
            return Err(Stop::ReceiverGone);
        }
    }
    Ok(())
}
