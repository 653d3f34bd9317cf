//! Conversation domain entities

use crate::core::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Role of a turn in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a single turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnId(Uuid);

impl TurnId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TurnId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A message in a conversation (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub id: TurnId,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: TurnId::new(),
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Ordered sequence of turns exchanged in one chat (Entity)
///
/// Append-only during an exchange. The only in-place mutation is
/// [`append_fragment`](Self::append_fragment), which extends the trailing
/// assistant turn while it is being streamed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_turns(turns: Vec<Turn>) -> Self {
        Self { turns }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Append a user turn and return its id.
    pub fn push_user(&mut self, content: impl Into<String>) -> TurnId {
        let turn = Turn::user(content);
        let id = turn.id;
        self.turns.push(turn);
        id
    }

    /// Append an empty assistant turn to be filled by streamed fragments.
    pub fn push_placeholder(&mut self) -> TurnId {
        let turn = Turn::assistant(String::new());
        let id = turn.id;
        self.turns.push(turn);
        id
    }

    /// Extend the trailing assistant turn with one fragment.
    pub fn append_fragment(&mut self, fragment: &str) -> Result<(), DomainError> {
        match self.turns.last_mut() {
            Some(turn) if turn.role == Role::Assistant => {
                turn.content.push_str(fragment);
                Ok(())
            }
            _ => Err(DomainError::NoAssistantTurn),
        }
    }

    /// Drop the trailing assistant turn if nothing was streamed into it.
    ///
    /// Returns true if a turn was removed.
    pub fn discard_empty_placeholder(&mut self) -> bool {
        match self.turns.last() {
            Some(turn) if turn.role == Role::Assistant && turn.content.is_empty() => {
                self.turns.pop();
                true
            }
            _ => false,
        }
    }

    /// Text of the first user turn, if any.
    pub fn first_user_text(&self) -> Option<&str> {
        self.turns
            .iter()
            .find(|t| t.role == Role::User)
            .map(|t| t.content.as_str())
    }

    /// Position of the most recent user turn.
    pub fn last_user_index(&self) -> Option<usize> {
        self.turns.iter().rposition(|t| t.role == Role::User)
    }

    /// Remove every turn from `index` onwards, returning them in order.
    pub fn truncate_from(&mut self, index: usize) -> Vec<Turn> {
        if index >= self.turns.len() {
            return Vec::new();
        }
        self.turns.split_off(index)
    }
}
