//! Chat session domain.
//!
//! - [`entities::ChatSession`]: one titled conversation in the history list
//! - [`store::SessionStore`]: in-memory store of sessions, owned by the
//!   chat controller and dropped with it

pub mod entities;
pub mod store;
