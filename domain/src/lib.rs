//! Domain layer for chat-relay
//!
//! This crate contains the entities and value objects of the streaming chat
//! pipeline. It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Conversation
//!
//! - **Turn**: one message, tagged `user` or `assistant`
//! - **Conversation**: ordered, append-only sequence of Turns
//!
//! ## Streaming
//!
//! - **StreamFrame**: the wire unit between Relay and Consumer
//!   (`data: {"content": ...}\n\n` or `data: [DONE]\n\n`)
//! - **FrameDecoder**: incremental byte-to-frame decoder used by the Consumer
//! - **ExchangeState**: lifecycle of one request/response exchange
//!
//! ## Sessions
//!
//! - **ChatSession** / **SessionStore**: in-memory chat history, owned by the
//!   chat controller

pub mod conversation;
pub mod core;
pub mod exchange;
pub mod session;
pub mod stream;

// Re-export commonly used types
pub use conversation::{
    entities::{Conversation, Role, Turn, TurnId},
    wire::{ChatRequest, WireMessage},
};
pub use core::error::DomainError;
pub use exchange::state::{ExchangeOutcome, ExchangeState};
pub use session::{
    entities::{ChatSession, SessionId},
    store::SessionStore,
};
pub use stream::{
    decoder::{DecodedLine, FrameDecoder, LineBuffer},
    event::StreamEvent,
    frame::{ContentPayload, DATA_PREFIX, DONE_SENTINEL, StreamFrame},
};
