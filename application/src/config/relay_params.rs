//! Relay parameters: the upstream model and the streaming deadline.

use std::time::Duration;

/// Default upstream model.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default upper bound for one streamed reply.
pub const DEFAULT_MAX_DURATION: Duration = Duration::from_secs(30);

/// Static parameters of [`RelayChatUseCase`](crate::use_cases::relay_chat::RelayChatUseCase).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayParams {
    /// Model name passed to the gateway for every session.
    pub model: String,
    /// Deadline for the whole streaming phase of a response.
    pub max_duration: Duration,
}

impl Default for RelayParams {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_duration: DEFAULT_MAX_DURATION,
        }
    }
}

impl RelayParams {
    // ==================== Builder Methods ====================

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_duration(mut self, max_duration: Duration) -> Self {
        self.max_duration = max_duration;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let params = RelayParams::default();
        assert_eq!(params.model, "gemini-2.0-flash");
        assert_eq!(params.max_duration, Duration::from_secs(30));
    }

    #[test]
    fn builders_override() {
        let params = RelayParams::default()
            .with_model("gemini-2.5-pro")
            .with_max_duration(Duration::from_secs(5));
        assert_eq!(params.model, "gemini-2.5-pro");
        assert_eq!(params.max_duration, Duration::from_secs(5));
    }
}
