//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Conversation is empty")]
    EmptyConversation,

    #[error("Last message has no content to send")]
    MissingContent,

    #[error("No assistant turn is in progress")]
    NoAssistantTurn,

    #[error("Invalid exchange transition: {from} -> {to}")]
    InvalidTransition { from: &'static str, to: &'static str },

    #[error("Session not found: {0}")]
    SessionNotFound(String),
}
