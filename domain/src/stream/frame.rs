//! Stream frames on the Relay → Consumer wire.
//!
//! Each frame is a single `data:` line followed by a blank line:
//!
//! ```text
//! data: {"content":"Hel"}\n\n
//! data: {"content":"lo!"}\n\n
//! data: [DONE]\n\n
//! ```
//!
//! The format is deliberately minimal and must stay byte-compatible with
//! existing `EventSource`-style readers.

use serde::{Deserialize, Serialize};

/// Prefix that marks a frame line.
pub const DATA_PREFIX: &str = "data: ";

/// Payload of the terminal frame.
pub const DONE_SENTINEL: &str = "[DONE]";

/// JSON payload of a content frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPayload {
    pub content: String,
}

/// One unit of the streaming response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamFrame {
    /// A text fragment of the assistant reply.
    Content(String),
    /// The terminal sentinel; nothing follows it.
    Done,
}

impl StreamFrame {
    pub fn content(text: impl Into<String>) -> Self {
        StreamFrame::Content(text.into())
    }

    pub fn is_done(&self) -> bool {
        matches!(self, StreamFrame::Done)
    }

    /// The text after `data: `, without the trailing blank line.
    pub fn data(&self) -> String {
        match self {
            StreamFrame::Content(text) => {
                let payload = ContentPayload {
                    content: text.clone(),
                };
                // Serializing a struct with one String field cannot fail.
                serde_json::to_string(&payload).unwrap_or_default()
            }
            StreamFrame::Done => DONE_SENTINEL.to_string(),
        }
    }

    /// Full wire encoding, terminated by a double line break.
    pub fn encode(&self) -> String {
        format!("{}{}\n\n", DATA_PREFIX, self.data())
    }

    /// Interpret a single line (without its line terminator).
    ///
    /// Returns `None` when the line is not a frame line at all (blank
    /// separators, comments, other SSE fields). Returns `Some(Err(_))` when
    /// the line is a frame line whose payload cannot be parsed.
    pub fn parse_line(line: &str) -> Option<Result<StreamFrame, serde_json::Error>> {
        let data = line.strip_prefix(DATA_PREFIX)?;
        if data == DONE_SENTINEL {
            return Some(Ok(StreamFrame::Done));
        }
        Some(serde_json::from_str::<ContentPayload>(data).map(|p| StreamFrame::Content(p.content)))
    }
}
