//! Exchange observer port
//!
//! Lets a front-end render partial assistant output while an exchange runs.

use relay_domain::ExchangeState;

/// Callback for state changes and fragments during an exchange
///
/// Implementations live in the presentation layer. Callbacks run on the
/// exchange's task, in order, and must not block.
pub trait ExchangeObserver: Send + Sync {
    /// Called after every state transition.
    fn on_state(&self, _state: &ExchangeState) {}

    /// Called after a fragment has been appended to the assistant turn.
    fn on_fragment(&self, _fragment: &str) {}
}

/// No-op observer for when nothing needs to be rendered
pub struct NoExchangeObserver;

impl ExchangeObserver for NoExchangeObserver {}
