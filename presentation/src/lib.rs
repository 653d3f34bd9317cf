//! Presentation layer for chat-relay
//!
//! This crate contains the HTTP server surface of the relay, CLI definitions,
//! output formatters, progress reporters, and the interactive chat client.

pub mod chat;
pub mod cli;
pub mod output;
pub mod progress;
pub mod server;

// Re-export commonly used types
pub use chat::ChatRepl;
pub use cli::commands::{Cli, Command};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::ExchangeReporter;
pub use server::{AppState, ApiError, router, serve};
