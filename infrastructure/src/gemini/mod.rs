//! Google Gemini adapter (Generative Language API over SSE)

pub mod error;
pub mod gateway;
pub mod protocol;
pub mod session;
