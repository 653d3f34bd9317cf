//! Interactive chat module
//!
//! Provides a line-editor chat client that talks to a relay.

mod command;
mod repl;

pub use command::ReplCommand;
pub use repl::ChatRepl;
