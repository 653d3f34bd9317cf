//! Exchange lifecycle.
//!
//! One exchange is one user submission and the streamed assistant reply.

pub mod state;
