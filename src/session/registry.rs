//! Multiple independent sessions in one process.

use std::collections::HashMap;

use super::store::{SessionId, SessionStore};
use crate::error::Result;
use crate::settings::SettingsDraft;

/// Owns any number of named sessions. Sessions never share state.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<SessionId, SessionStore>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with default settings and return its id.
    pub fn create(&mut self) -> SessionId {
        self.insert(SessionStore::new())
    }

    /// Create a session whose settings come from `draft`.
    ///
    /// Nothing is registered when the draft fails validation.
    pub fn create_with(&mut self, draft: SettingsDraft) -> Result<SessionId> {
        Ok(self.insert(SessionStore::with_settings(draft)?))
    }

    fn insert(&mut self, store: SessionStore) -> SessionId {
        let id = store.id();
        self.sessions.insert(id, store);
        id
    }

    /// Get an existing session.
    pub fn get(&self, id: SessionId) -> Option<&SessionStore> {
        self.sessions.get(&id)
    }

    pub fn get_mut(&mut self, id: SessionId) -> Option<&mut SessionStore> {
        self.sessions.get_mut(&id)
    }

    /// Remove a session, handing it back to the caller.
    pub fn remove(&mut self, id: SessionId) -> Option<SessionStore> {
        self.sessions.remove(&id)
    }

    /// List session ids.
    pub fn ids(&self) -> Vec<SessionId> {
        self.sessions.keys().copied().collect()
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
    use crate::types::Message;

    #[test]
    fn sessions_are_independent() {
        let mut registry = SessionRegistry::new();
        let a = registry.create();
        let b = registry.create();

        registry
            .get_mut(a)
            .unwrap()
            .append(Message::user("only in a"))
            .unwrap();

        assert_eq!(registry.get(a).unwrap().conversation().len(), 1);
        assert!(registry.get(b).unwrap().conversation().is_empty());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn create_with_rejects_invalid_draft() {
        let mut registry = SessionRegistry::new();
        let draft = crate::settings::Settings::default()
            .draft()
            .temperature(9.5)
            .max_tokens(1);

        assert!(registry.create_with(draft).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn remove_returns_store() {
        let mut registry = SessionRegistry::new();
        let id = registry.create();
        let store = registry.remove(id).unwrap();
        assert_eq!(store.id(), id);
        assert!(registry.is_empty());
        assert!(registry.get(id).is_none());
    }
}
