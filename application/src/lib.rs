//! Application layer for chat-relay
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.
//!
//! - Relay side: [`RelayChatUseCase`] turns a chat request into a stream of
//!   wire frames, driven by an [`LlmGateway`].
//! - Consumer side: [`RunExchangeUseCase`] reads frames from a
//!   [`RelayTransport`]; [`ChatController`] owns sessions and retry.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::RelayParams;
pub use ports::{
    exchange_observer::{ExchangeObserver, NoExchangeObserver},
    llm_gateway::{GatewayError, LlmGateway, LlmSession, StreamHandle},
    relay_transport::{ByteStream, RelayTransport, TransportError},
};
pub use use_cases::chat_controller::{ChatController, ControllerError, StopHandle};
pub use use_cases::relay_chat::{FrameStream, RelayChatUseCase, RelayError};
pub use use_cases::run_exchange::{RunExchangeError, RunExchangeUseCase};
