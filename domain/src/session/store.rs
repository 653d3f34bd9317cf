//! In-memory session store.
//!
//! Holds the chat history for the lifetime of its owner. Nothing is written
//! to disk; dropping the store drops the history.

use super::entities::{ChatSession, SessionId};

/// Ordered store of chat sessions, most recently created first
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Vec<ChatSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new session at the front, or replace an existing one in place.
    pub fn upsert(&mut self, session: ChatSession) {
        match self.sessions.iter_mut().find(|s| s.id() == session.id()) {
            Some(existing) => *existing = session,
            None => self.sessions.insert(0, session),
        }
    }

    pub fn get(&self, id: SessionId) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id() == id)
    }

    pub fn get_mut(&mut self, id: SessionId) -> Option<&mut ChatSession> {
        self.sessions.iter_mut().find(|s| s.id() == id)
    }

    /// Sessions in display order.
    pub fn list(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn remove(&mut self, id: SessionId) -> Option<ChatSession> {
        let index = self.sessions.iter().position(|s| s.id() == id)?;
        Some(self.sessions.remove(index))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::entities::Conversation;

    fn session(text: &str) -> ChatSession {
        let mut conversation = Conversation::new();
        conversation.push_user(text);
        ChatSession::from_conversation(conversation).unwrap()
    }

    #[test]
    fn new_sessions_go_first() {
        let mut store = SessionStore::new();
        store.upsert(session("older"));
        store.upsert(session("newer"));

        let titles: Vec<_> = store.list().iter().map(|s| s.title()).collect();
        assert_eq!(titles, vec!["newer", "older"]);
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut store = SessionStore::new();
        let first = session("first");
        let id = first.id();
        store.upsert(first);
        store.upsert(session("second"));

        let mut updated = store.get(id).unwrap().clone();
        let mut conversation = updated.conversation().clone();
        conversation.push_user("follow-up");
        updated.update(conversation);
        store.upsert(updated);

        assert_eq!(store.len(), 2);
        assert_eq!(store.list()[1].id(), id);
        assert_eq!(store.get(id).unwrap().conversation().len(), 2);
    }

    #[test]
    fn remove_returns_session() {
        let mut store = SessionStore::new();
        let s = session("gone");
        let id = s.id();
        store.upsert(s);

        assert_eq!(store.remove(id).unwrap().title(), "gone");
        assert!(store.is_empty());
        assert!(store.remove(id).is_none());
        assert!(store.get(id).is_none());
    }
}
