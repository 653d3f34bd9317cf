//! Session domain entities

use crate::conversation::entities::Conversation;
use crate::core::string::truncate_chars;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Maximum number of characters of the first user message used as title.
pub const TITLE_MAX_CHARS: usize = 50;

/// Identifier of a chat session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A titled conversation kept in the history list (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    id: SessionId,
    title: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    conversation: Conversation,
}

impl ChatSession {
    /// Start a session for `conversation`.
    ///
    /// Returns `None` until the conversation has a user turn to take the
    /// title from.
    pub fn from_conversation(conversation: Conversation) -> Option<Self> {
        let title = derive_title(conversation.first_user_text()?);
        let now = Utc::now();
        Some(Self {
            id: SessionId::new(),
            title,
            created_at: now,
            updated_at: now,
            conversation,
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Replace the stored conversation and bump the timestamp.
    ///
    /// The title stays fixed to the first user message it was created from.
    pub fn update(&mut self, conversation: Conversation) {
        self.conversation = conversation;
        self.updated_at = Utc::now();
    }
}

/// Title shown in the history list for a session started with `text`.
pub fn derive_title(text: &str) -> String {
    truncate_chars(text, TITLE_MAX_CHARS)
}
