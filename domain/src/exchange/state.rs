//! Exchange state machine.
//!
//! ```text
//! Idle → Sending → Streaming → Completed
//!           │          ├─────→ Cancelled
//!           │          └─────→ (Completed on close without sentinel)
//!           ├────────────────→ Failed
//!           └────────────────→ Cancelled
//! ```
//!
//! `Completed`, `Cancelled` and `Failed` are terminal; an exchange never goes
//! back to `Streaming` once it has finished.

use crate::core::error::DomainError;

/// Lifecycle state of one exchange
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExchangeState {
    #[default]
    Idle,
    /// Request sent, waiting for the response to start.
    Sending,
    /// Frames are arriving.
    Streaming,
    /// Sentinel seen or transport closed. May be truncated.
    Completed,
    /// Stopped by the user; partial text is kept.
    Cancelled,
    /// The request failed before any frame arrived.
    Failed(String),
}

impl ExchangeState {
    pub fn name(&self) -> &'static str {
        match self {
            ExchangeState::Idle => "idle",
            ExchangeState::Sending => "sending",
            ExchangeState::Streaming => "streaming",
            ExchangeState::Completed => "completed",
            ExchangeState::Cancelled => "cancelled",
            ExchangeState::Failed(_) => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExchangeState::Completed | ExchangeState::Cancelled | ExchangeState::Failed(_)
        )
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, ExchangeState::Sending | ExchangeState::Streaming)
    }

    /// Error message if the exchange failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            ExchangeState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Move to `next`, rejecting transitions the state machine does not allow.
    pub fn transition(&mut self, next: ExchangeState) -> Result<(), DomainError> {
        let allowed = matches!(
            (&*self, &next),
            (ExchangeState::Idle, ExchangeState::Sending)
                | (ExchangeState::Sending, ExchangeState::Streaming)
                | (ExchangeState::Sending, ExchangeState::Failed(_))
                | (ExchangeState::Sending, ExchangeState::Cancelled)
                | (ExchangeState::Streaming, ExchangeState::Completed)
                | (ExchangeState::Streaming, ExchangeState::Cancelled)
        );
        if !allowed {
            return Err(DomainError::InvalidTransition {
                from: self.name(),
                to: next.name(),
            });
        }
        *self = next;
        Ok(())
    }
}

/// Final result of one exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeOutcome {
    pub state: ExchangeState,
    /// Accumulated assistant text at the moment the exchange ended.
    pub text: String,
    /// Number of fragments applied to the assistant turn.
    pub fragments: usize,
    /// Number of malformed frames dropped.
    pub malformed: usize,
}

impl ExchangeOutcome {
    pub fn is_completed(&self) -> bool {
        self.state == ExchangeState::Completed
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == ExchangeState::Cancelled
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, ExchangeState::Failed(_))
    }
}
