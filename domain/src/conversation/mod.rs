//! Conversation domain.
//!
//! - [`entities::Turn`]: a single message, user or assistant
//! - [`entities::Conversation`]: ordered, append-only list of turns
//! - [`wire::ChatRequest`]: the JSON body posted to the relay

pub mod entities;
pub mod wire;
