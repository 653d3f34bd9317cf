//! Chat Controller
//!
//! Keeps the chat client's state out of the REPL: the current conversation,
//! the in-memory session history, and the error of the last exchange.
//! The presentation layer only parses input and renders.

use crate::ports::exchange_observer::ExchangeObserver;
use crate::use_cases::run_exchange::{RunExchangeError, RunExchangeUseCase};
use relay_domain::{
    ChatSession, Conversation, DomainError, ExchangeOutcome, SessionId, SessionStore,
};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Errors returned by [`ChatController`] commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    #[error("Message is empty")]
    EmptyInput,

    #[error("Nothing to retry: the last exchange did not fail")]
    NothingToRetry,

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Exchange(#[from] RunExchangeError),
}

/// Cancels whichever exchange is currently in flight
///
/// Cloneable so a signal handler can hold one while the controller is busy.
#[derive(Clone, Default)]
pub struct StopHandle {
    current: Arc<Mutex<Option<CancellationToken>>>,
}

impl StopHandle {
    fn arm(&self, token: CancellationToken) {
        if let Ok(mut current) = self.current.lock() {
            *current = Some(token);
        }
    }

    fn disarm(&self) {
        if let Ok(mut current) = self.current.lock() {
            *current = None;
        }
    }

    /// Stop the in-flight exchange. Returns false if nothing was running.
    pub fn stop(&self) -> bool {
        let token = self.current.lock().ok().and_then(|c| c.clone());
        match token {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.current.lock().map(|c| c.is_some()).unwrap_or(false)
    }
}

/// Chat client state and commands
pub struct ChatController {
    exchange: RunExchangeUseCase,
    store: SessionStore,
    current: Option<SessionId>,
    conversation: Conversation,
    last_error: Option<String>,
    stop: StopHandle,
}

impl ChatController {
    pub fn new(exchange: RunExchangeUseCase) -> Self {
        Self {
            exchange,
            store: SessionStore::new(),
            current: None,
            conversation: Conversation::new(),
            last_error: None,
            stop: StopHandle::default(),
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Sessions, most recently created first.
    pub fn sessions(&self) -> &[ChatSession] {
        self.store.list()
    }

    pub fn current_session(&self) -> Option<SessionId> {
        self.current
    }

    /// Error message of the last exchange, if it failed.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Send a message and stream the reply into the current conversation.
    pub async fn submit(
        &mut self,
        text: &str,
        observer: &dyn ExchangeObserver,
    ) -> Result<ExchangeOutcome, ControllerError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ControllerError::EmptyInput);
        }
        self.last_error = None;

        let token = CancellationToken::new();
        self.stop.arm(token.clone());
        let result = self
            .exchange
            .execute(&mut self.conversation, text, token, observer)
            .await;
        self.stop.disarm();

        let outcome = result?;
        if let Some(error) = outcome.state.error() {
            self.last_error = Some(error.to_string());
        }
        self.sync_session();
        Ok(outcome)
    }

    /// Re-send the message whose exchange failed.
    pub async fn retry(
        &mut self,
        observer: &dyn ExchangeObserver,
    ) -> Result<ExchangeOutcome, ControllerError> {
        if self.last_error.is_none() {
            return Err(ControllerError::NothingToRetry);
        }
        let index = self
            .conversation
            .last_user_index()
            .ok_or(ControllerError::NothingToRetry)?;

        let discarded = self.conversation.truncate_from(index);
        let text = discarded
            .first()
            .map(|turn| turn.content.clone())
            .ok_or(ControllerError::NothingToRetry)?;
        debug!("Retrying, discarded {} turns", discarded.len());

        self.submit(&text, observer).await
    }

    /// Clear the conversation; the next message starts a new session.
    pub fn new_chat(&mut self) {
        self.conversation = Conversation::new();
        self.current = None;
        self.last_error = None;
    }

    pub fn load_session(&mut self, id: SessionId) -> Result<(), ControllerError> {
        let session = self
            .store
            .get(id)
            .ok_or_else(|| DomainError::SessionNotFound(id.to_string()))?;
        self.conversation = session.conversation().clone();
        self.current = Some(id);
        self.last_error = None;
        info!("Loaded session {}", id);
        Ok(())
    }

    /// Remove a session. Deleting the current session starts a new chat.
    pub fn delete_session(&mut self, id: SessionId) -> Result<ChatSession, ControllerError> {
        let removed = self
            .store
            .remove(id)
            .ok_or_else(|| DomainError::SessionNotFound(id.to_string()))?;
        if self.current == Some(id) {
            self.new_chat();
        }
        Ok(removed)
    }

    fn sync_session(&mut self) {
        if let Some(id) = self.current
            && let Some(session) = self.store.get_mut(id)
        {
            session.update(self.conversation.clone());
            return;
        }
        if let Some(session) = ChatSession::from_conversation(self.conversation.clone()) {
            debug!("New session {}: {}", session.id(), session.title());
            self.current = Some(session.id());
            self.store.upsert(session);
        }
    }
}
