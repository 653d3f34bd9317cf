//! Run Exchange use case.
//!
//! Client-side half of the streaming pipeline. One call is one exchange:
//!
//! 1. Append the user turn, send the conversation to the Relay
//! 2. Append an empty assistant placeholder
//! 3. Read the response body chunk by chunk, decode frames, append each
//!    fragment to the placeholder
//! 4. Stop on `[DONE]`, transport close, or cancellation
//!
//! Pre-stream failures end the exchange as `Failed`. A transport that breaks
//! or closes mid-stream ends it as `Completed` with whatever text arrived;
//! truncation is not distinguished from a complete answer.
//!
//! An exchange that ends without any assistant text removes its placeholder,
//! so later requests never carry an empty assistant turn.

use crate::ports::exchange_observer::ExchangeObserver;
use crate::ports::relay_transport::{ByteStream, RelayTransport, TransportError};
use futures::StreamExt;
use relay_domain::{
    ChatRequest, Conversation, DecodedLine, DomainError, ExchangeOutcome, ExchangeState,
    FrameDecoder, StreamFrame,
};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that abort an exchange outright.
///
/// Network and decode problems are not errors here; they are reported
/// through the exchange state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunExchangeError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

/// What to do after applying a batch of decoded lines.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Done,
    Cancelled,
}

/// Use case for running one Consumer exchange against the Relay.
#[derive(Clone)]
pub struct RunExchangeUseCase {
    transport: Arc<dyn RelayTransport>,
}

impl RunExchangeUseCase {
    pub fn new(transport: Arc<dyn RelayTransport>) -> Self {
        Self { transport }
    }

    /// Run one exchange, mutating `conversation` in place.
    ///
    /// `cancellation` stops the exchange; no network read happens after it
    /// fires and the partial assistant text is left as it is.
    pub async fn execute(
        &self,
        conversation: &mut Conversation,
        text: &str,
        cancellation: CancellationToken,
        observer: &dyn ExchangeObserver,
    ) -> Result<ExchangeOutcome, RunExchangeError> {
        conversation.push_user(text);
        let request = ChatRequest::from_conversation(conversation);
        conversation.push_placeholder();

        let mut run = ExchangeRun::new(observer);
        run.advance(ExchangeState::Sending)?;

        let opened = tokio::select! {
            biased;
            _ = cancellation.cancelled() => None,
            result = self.transport.open(&request) => Some(result),
        };

        let stream = match opened {
            None => {
                info!("Request aborted before the response started");
                run.advance(ExchangeState::Cancelled)?;
                return Ok(run.finish(conversation));
            }
            Some(Err(e)) => {
                warn!("Chat error: {}", e);
                run.advance(ExchangeState::Failed(e.to_string()))?;
                return Ok(run.finish(conversation));
            }
            Some(Ok(stream)) => stream,
        };

        run.advance(ExchangeState::Streaming)?;
        let end = run.stream(stream, conversation, &cancellation).await?;
        run.advance(end)?;

        if run.malformed > 0 {
            debug!("Dropped {} malformed frames", run.malformed);
        }
        Ok(run.finish(conversation))
    }
}

/// Mutable state of one exchange while it runs.
struct ExchangeRun<'a> {
    observer: &'a dyn ExchangeObserver,
    state: ExchangeState,
    fragments: usize,
    malformed: usize,
}

impl<'a> ExchangeRun<'a> {
    fn new(observer: &'a dyn ExchangeObserver) -> Self {
        Self {
            observer,
            state: ExchangeState::Idle,
            fragments: 0,
            malformed: 0,
        }
    }

    fn advance(&mut self, next: ExchangeState) -> Result<(), DomainError> {
        self.state.transition(next)?;
        debug!("Exchange state: {}", self.state.name());
        self.observer.on_state(&self.state);
        Ok(())
    }

    /// Read until the stream ends; returns the terminal state to move to.
    async fn stream(
        &mut self,
        mut stream: ByteStream,
        conversation: &mut Conversation,
        cancellation: &CancellationToken,
    ) -> Result<ExchangeState, DomainError> {
        let mut decoder = FrameDecoder::new();

        loop {
            let next = tokio::select! {
                biased;
                _ = cancellation.cancelled() => {
                    info!("Request aborted after {} fragments", self.fragments);
                    return Ok(ExchangeState::Cancelled);
                }
                next = stream.next() => next,
            };

            let closed = !matches!(next, Some(Ok(_)));
            let lines = match next {
                Some(Ok(chunk)) => decoder.feed(&chunk),
                Some(Err(e)) => {
                    warn_truncated(&e, self.fragments);
                    decoder.finish()
                }
                None => decoder.finish(),
            };

            match self.apply(lines, conversation, cancellation)? {
                Flow::Done => return Ok(ExchangeState::Completed),
                Flow::Cancelled => return Ok(ExchangeState::Cancelled),
                Flow::Continue if closed => {
                    debug!("Transport closed without sentinel");
                    return Ok(ExchangeState::Completed);
                }
                Flow::Continue => {}
            }
        }
    }

    fn apply(
        &mut self,
        lines: Vec<DecodedLine>,
        conversation: &mut Conversation,
        cancellation: &CancellationToken,
    ) -> Result<Flow, DomainError> {
        for line in lines {
            match line {
                DecodedLine::Frame(StreamFrame::Done) => return Ok(Flow::Done),
                DecodedLine::Frame(StreamFrame::Content(fragment)) => {
                    if cancellation.is_cancelled() {
                        return Ok(Flow::Cancelled);
                    }
                    conversation.append_fragment(&fragment)?;
                    self.fragments += 1;
                    self.observer.on_fragment(&fragment);
                }
                DecodedLine::Malformed(raw) => {
                    self.malformed += 1;
                    debug!("Ignoring malformed frame: {}", raw);
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn finish(self, conversation: &mut Conversation) -> ExchangeOutcome {
        let text = if conversation.discard_empty_placeholder() {
            debug!("No reply text, dropped placeholder");
            String::new()
        } else {
            conversation
                .last()
                .map(|turn| turn.content.clone())
                .unwrap_or_default()
        };
        ExchangeOutcome {
            state: self.state,
            text,
            fragments: self.fragments,
            malformed: self.malformed,
        }
    }
}

fn warn_truncated(error: &TransportError, fragments: usize) {
    warn!(
        "Stream interrupted after {} fragments, keeping partial reply: {}",
        fragments, error
    );
}
