//! Streaming wire format and decoding.
//!
//! - [`frame::StreamFrame`]: one `data: ...\n\n` unit on the wire
//! - [`decoder::FrameDecoder`]: incremental decoder over raw byte chunks
//! - [`event::StreamEvent`]: upstream provider increments

pub mod decoder;
pub mod event;
pub mod frame;
