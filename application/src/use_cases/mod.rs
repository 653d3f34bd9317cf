//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod chat_controller;
pub mod relay_chat;
pub mod run_exchange;
