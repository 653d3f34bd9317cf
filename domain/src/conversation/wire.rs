//! Request body exchanged between Consumer and Relay.
//!
//! ```text
//! POST /api/chat
//! {"messages": [{"role": "user", "content": "Hi"}, ...]}
//! ```

use super::entities::{Conversation, Role, Turn};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// One role-tagged message as it travels over HTTP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: Role,
    pub content: String,
}

impl WireMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

impl From<&Turn> for WireMessage {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role,
            content: turn.content.clone(),
        }
    }
}

/// Body of a relay request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<WireMessage>,
}

impl ChatRequest {
    pub fn new(messages: Vec<WireMessage>) -> Self {
        Self { messages }
    }

    /// Build a request from the given turns.
    pub fn from_turns(turns: &[Turn]) -> Self {
        Self {
            messages: turns.iter().map(WireMessage::from).collect(),
        }
    }

    /// Build a request from a whole conversation.
    pub fn from_conversation(conversation: &Conversation) -> Self {
        Self::from_turns(conversation.turns())
    }

    /// Check that there is something to send.
    ///
    /// The list must be non-empty and the newest message must carry text.
    /// Earlier messages may hold anything, including empty strings.
    pub fn validate(&self) -> Result<(), DomainError> {
        let last = self.messages.last().ok_or(DomainError::EmptyConversation)?;
        if last.content.is_empty() {
            return Err(DomainError::MissingContent);
        }
        Ok(())
    }

    /// Split into seed history (all but the newest message) and the newest
    /// message's text.
    pub fn split_last(&self) -> Result<(&[WireMessage], &str), DomainError> {
        self.validate()?;
        let (last, history) = self
            .messages
            .split_last()
            .ok_or(DomainError::EmptyConversation)?;
        Ok((history, last.content.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_browser_body_shape() {
        let body = r#"{"messages":[{"role":"user","content":"Hi"}]}"#;
        let request: ChatRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.messages, vec![WireMessage::user("Hi")]);
    }

    #[test]
    fn rejects_unknown_role() {
        let body = r#"{"messages":[{"role":"system","content":"Hi"}]}"#;
        assert!(serde_json::from_str::<ChatRequest>(body).is_err());
    }

    #[test]
    fn validate_empty_list() {
        assert_eq!(
            ChatRequest::default().validate(),
            Err(DomainError::EmptyConversation)
        );
    }

    #[test]
    fn validate_requires_content_only_on_last() {
        let ok = ChatRequest::new(vec![WireMessage::assistant(""), WireMessage::user("go")]);
        assert!(ok.validate().is_ok());

        let bad = ChatRequest::new(vec![WireMessage::user("go"), WireMessage::user("")]);
        assert_eq!(bad.validate(), Err(DomainError::MissingContent));
    }

    #[test]
    fn split_last_separates_history() {
        let request = ChatRequest::new(vec![
            WireMessage::user("Hi"),
            WireMessage::assistant("Hello!"),
            WireMessage::user("How are you?"),
        ]);
        let (history, last) = request.split_last().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1], WireMessage::assistant("Hello!"));
        assert_eq!(last, "How are you?");
    }

    #[test]
    fn from_conversation_keeps_order() {
        let mut conversation = Conversation::new();
        conversation.push_user("a");
        conversation.push_placeholder();
        conversation.append_fragment("b").unwrap();

        let request = ChatRequest::from_conversation(&conversation);
        assert_eq!(
            request.messages,
            vec![WireMessage::user("a"), WireMessage::assistant("b")]
        );
    }
}
