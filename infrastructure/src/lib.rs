//! Infrastructure layer for chat-relay
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod gemini;
pub mod transport;

// Re-export commonly used types
pub use config::{
    ConfigIssue, ConfigLoader, FileClientConfig, FileConfig, FileProviderConfig, FileServerConfig,
};
pub use gemini::{
    error::GeminiError,
    gateway::{GeminiLlmGateway, GeminiSettings},
    session::GeminiSession,
};
pub use transport::HttpRelayTransport;
