//! Relay Chat use case.
//!
//! Server-side half of the streaming pipeline: takes a conversation, opens a
//! fresh upstream session seeded with all but the newest message, sends the
//! newest message, and turns the upstream increments into [`StreamFrame`]s.
//!
//! Everything that can fail before the first frame (validation, missing
//! credential, upstream rejection) is returned as `Err` from
//! [`execute`](RelayChatUseCase::execute), so the caller can still answer
//! with a proper error response. Failures after that point end the frame
//! stream with an `Err` item and no `[DONE]` frame.

use crate::config::RelayParams;
use crate::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession, StreamHandle};
use async_stream::stream;
use futures::StreamExt;
use futures::stream::BoxStream;
use relay_domain::core::string::log_preview;
use relay_domain::{ChatRequest, DomainError, StreamEvent, StreamFrame};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Errors that can occur while relaying a chat
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error(transparent)]
    InvalidRequest(#[from] DomainError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Upstream stream failed: {0}")]
    StreamFailed(String),

    #[error("Upstream stream ended without completing")]
    UpstreamClosed,

    #[error("Stream exceeded maximum duration of {0:?}")]
    StreamTimeout(Duration),
}

/// Frames for one response, in emission order.
pub type FrameStream = BoxStream<'static, Result<StreamFrame, RelayError>>;

/// Use case for relaying one chat request to the provider.
///
/// Holds no per-request state; one instance serves concurrent requests.
#[derive(Clone)]
pub struct RelayChatUseCase {
    gateway: Arc<dyn LlmGateway>,
    params: RelayParams,
}

impl RelayChatUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>, params: RelayParams) -> Self {
        Self { gateway, params }
    }

    pub fn params(&self) -> &RelayParams {
        &self.params
    }

    /// Open the upstream session and return the frame stream.
    pub async fn execute(&self, request: ChatRequest) -> Result<FrameStream, RelayError> {
        info!(
            "Received chat request with {} messages",
            request.messages.len()
        );

        let (history, last) = request.split_last()?;
        debug!("Newest message: {}", log_preview(last, 100));

        let session = self
            .gateway
            .create_session(&self.params.model, history)
            .await?;
        let handle = session.send_streaming(last).await?;

        info!("Streaming response started (model: {})", session.model());

        let deadline = Instant::now() + self.params.max_duration;
        Ok(relay_frames(session, handle, deadline, self.params.max_duration).boxed())
    }
}

fn relay_frames(
    session: Box<dyn LlmSession>,
    mut handle: StreamHandle,
    deadline: Instant,
    max_duration: Duration,
) -> impl futures::Stream<Item = Result<StreamFrame, RelayError>> + Send + 'static {
    stream! {
        // The session stays alive until the stream is dropped.
        let _session = session;
        let mut fragments = 0usize;

        loop {
            let event = match tokio::time::timeout_at(deadline, handle.receiver.recv()).await {
                Ok(event) => event,
                Err(_) => {
                    warn!("Streaming exceeded {:?} after {} fragments", max_duration, fragments);
                    yield Err(RelayError::StreamTimeout(max_duration));
                    return;
                }
            };

            match event {
                Some(StreamEvent::Delta(text)) => {
                    if text.is_empty() {
                        continue;
                    }
                    fragments += 1;
                    yield Ok(StreamFrame::Content(text));
                }
                Some(StreamEvent::Completed(_)) => {
                    info!("Streaming response finished ({} fragments)", fragments);
                    yield Ok(StreamFrame::Done);
                    return;
                }
                Some(StreamEvent::Error(e)) => {
                    error!("Streaming error after {} fragments: {}", fragments, e);
                    yield Err(RelayError::StreamFailed(e));
                    return;
                }
                None => {
                    error!("Upstream closed without completing after {} fragments", fragments);
                    yield Err(RelayError::UpstreamClosed);
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use relay_domain::WireMessage;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    /// Gateway that replays a fixed list of events.
    struct ScriptedGateway {
        events: Vec<StreamEvent>,
        create_error: Option<GatewayError>,
        send_error: Option<GatewayError>,
        keep_open: bool,
        seen: Arc<Mutex<Vec<(String, Vec<WireMessage>, String)>>>,
    }

    impl ScriptedGateway {
        fn new(events: Vec<StreamEvent>) -> Self {
            Self {
                events,
                create_error: None,
                send_error: None,
                keep_open: false,
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    struct ScriptedSession {
        model: String,
        history: Vec<WireMessage>,
        events: Vec<StreamEvent>,
        send_error: Option<GatewayError>,
        keep_open: bool,
        seen: Arc<Mutex<Vec<(String, Vec<WireMessage>, String)>>>,
    }

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        async fn create_session(
            &self,
            model: &str,
            history: &[WireMessage],
        ) -> Result<Box<dyn LlmSession>, GatewayError> {
            if let Some(e) = &self.create_error {
                return Err(e.clone());
            }
            Ok(Box::new(ScriptedSession {
                model: model.to_string(),
                history: history.to_vec(),
                events: self.events.clone(),
                send_error: self.send_error.clone(),
                keep_open: self.keep_open,
                seen: self.seen.clone(),
            }))
        }
    }

    #[async_trait]
    impl LlmSession for ScriptedSession {
        fn model(&self) -> &str {
            &self.model
        }

        async fn send_streaming(&self, content: &str) -> Result<StreamHandle, GatewayError> {
            self.seen.lock().unwrap().push((
                self.model.clone(),
                self.history.clone(),
                content.to_string(),
            ));
            if let Some(e) = &self.send_error {
                return Err(e.clone());
            }
            let (tx, rx) = mpsc::channel(self.events.len().max(1));
            for event in &self.events {
                tx.send(event.clone()).await.unwrap();
            }
            if self.keep_open {
                // Leak the sender so the channel never closes.
                std::mem::forget(tx);
            }
            Ok(StreamHandle::new(rx))
        }
    }

    fn use_case(gateway: ScriptedGateway) -> RelayChatUseCase {
        RelayChatUseCase::new(Arc::new(gateway), RelayParams::default())
    }

    async fn collect(stream: FrameStream) -> Vec<Result<StreamFrame, RelayError>> {
        stream.collect().await
    }

    #[tokio::test]
    async fn relays_deltas_then_done() {
        let gateway = ScriptedGateway::new(vec![
            StreamEvent::Delta("Hel".into()),
            StreamEvent::Delta("lo!".into()),
            StreamEvent::Completed("Hello!".into()),
        ]);
        let request = ChatRequest::new(vec![WireMessage::user("Hi")]);

        let frames = collect(use_case(gateway).execute(request).await.unwrap()).await;

        assert_eq!(
            frames,
            vec![
                Ok(StreamFrame::content("Hel")),
                Ok(StreamFrame::content("lo!")),
                Ok(StreamFrame::Done),
            ]
        );
    }

    #[tokio::test]
    async fn seeds_history_and_sends_last_message() {
        let gateway = ScriptedGateway::new(vec![StreamEvent::Completed(String::new())]);
        let seen = gateway.seen.clone();
        let request = ChatRequest::new(vec![
            WireMessage::user("Hi"),
            WireMessage::assistant("Hello!"),
            WireMessage::user("Tell me a joke"),
        ]);

        let frames = collect(use_case(gateway).execute(request).await.unwrap()).await;
        assert_eq!(frames, vec![Ok(StreamFrame::Done)]);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (model, history, content) = &seen[0];
        assert_eq!(model, "gemini-2.0-flash");
        assert_eq!(
            history,
            &vec![WireMessage::user("Hi"), WireMessage::assistant("Hello!")]
        );
        assert_eq!(content, "Tell me a joke");
    }

    #[tokio::test]
    async fn empty_deltas_are_not_framed() {
        let gateway = ScriptedGateway::new(vec![
            StreamEvent::Delta(String::new()),
            StreamEvent::Delta("x".into()),
            StreamEvent::Completed("x".into()),
        ]);
        let request = ChatRequest::new(vec![WireMessage::user("Hi")]);

        let frames = collect(use_case(gateway).execute(request).await.unwrap()).await;
        assert_eq!(frames, vec![Ok(StreamFrame::content("x")), Ok(StreamFrame::Done)]);
    }

    #[tokio::test]
    async fn mid_stream_error_ends_without_done() {
        let gateway = ScriptedGateway::new(vec![
            StreamEvent::Delta("Hel".into()),
            StreamEvent::Error("connection reset".into()),
        ]);
        let request = ChatRequest::new(vec![WireMessage::user("Hi")]);

        let frames = collect(use_case(gateway).execute(request).await.unwrap()).await;
        assert_eq!(
            frames,
            vec![
                Ok(StreamFrame::content("Hel")),
                Err(RelayError::StreamFailed("connection reset".into())),
            ]
        );
    }

    #[tokio::test]
    async fn upstream_closing_early_is_an_error() {
        let gateway = ScriptedGateway::new(vec![StreamEvent::Delta("Hel".into())]);
        let request = ChatRequest::new(vec![WireMessage::user("Hi")]);

        let frames = collect(use_case(gateway).execute(request).await.unwrap()).await;
        assert_eq!(frames.last(), Some(&Err(RelayError::UpstreamClosed)));
        assert!(!frames.contains(&Ok(StreamFrame::Done)));
    }

    #[tokio::test]
    async fn stalled_upstream_hits_deadline() {
        let mut gateway = ScriptedGateway::new(vec![StreamEvent::Delta("Hel".into())]);
        gateway.keep_open = true;
        let use_case = RelayChatUseCase::new(
            Arc::new(gateway),
            RelayParams::default().with_max_duration(Duration::from_millis(50)),
        );
        let request = ChatRequest::new(vec![WireMessage::user("Hi")]);

        let frames = collect(use_case.execute(request).await.unwrap()).await;
        assert_eq!(
            frames,
            vec![
                Ok(StreamFrame::content("Hel")),
                Err(RelayError::StreamTimeout(Duration::from_millis(50))),
            ]
        );
    }

    #[tokio::test]
    async fn missing_credential_fails_before_streaming() {
        let mut gateway = ScriptedGateway::new(Vec::new());
        gateway.create_error = Some(GatewayError::MissingCredential(
            "GOOGLE_GENERATIVE_AI_API_KEY".into(),
        ));
        let request = ChatRequest::new(vec![WireMessage::user("Hi")]);

        let err = match use_case(gateway).execute(request).await {
            Err(e) => e,
            Ok(_) => panic!("expected a pre-stream error"),
        };
        assert!(matches!(err, RelayError::Gateway(GatewayError::MissingCredential(_))));
        assert_eq!(
            err.to_string(),
            "GOOGLE_GENERATIVE_AI_API_KEY is not configured"
        );
    }

    #[tokio::test]
    async fn upstream_rejection_fails_before_streaming() {
        let mut gateway = ScriptedGateway::new(Vec::new());
        gateway.send_error = Some(GatewayError::UpstreamStatus {
            status: 400,
            body: "API key not valid".into(),
        });
        let request = ChatRequest::new(vec![WireMessage::user("Hi")]);

        let result = use_case(gateway).execute(request).await;
        assert!(matches!(
            result,
            Err(RelayError::Gateway(GatewayError::UpstreamStatus { status: 400, .. }))
        ));
    }

    #[tokio::test]
    async fn empty_conversation_is_rejected() {
        let gateway = ScriptedGateway::new(Vec::new());
        let seen = gateway.seen.clone();

        let result = use_case(gateway).execute(ChatRequest::default()).await;
        assert!(matches!(
            result,
            Err(RelayError::InvalidRequest(DomainError::EmptyConversation))
        ));
        assert!(seen.lock().unwrap().is_empty());
    }
}
