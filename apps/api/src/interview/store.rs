//! Session registry. Constructed once in `main` and injected through `AppState`.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use crate::interview::models::InterviewSession;

/// Create/get/update/remove by id. Lookups hand out clones so no lock is
/// ever held across a model call.
pub trait SessionStore: Send + Sync {
    fn insert(&self, session: InterviewSession);
    fn get(&self, id: Uuid) -> Option<InterviewSession>;
    /// Replaces an existing session. Returns false if it was removed meanwhile.
    fn update(&self, session: InterviewSession) -> bool;
    fn remove(&self, id: Uuid) -> Option<InterviewSession>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<Uuid, InterviewSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, InterviewSession>> {
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for InMemorySessionStore {
    fn insert(&self, session: InterviewSession) {
        self.lock().insert(session.id, session);
    }

    fn get(&self, id: Uuid) -> Option<InterviewSession> {
        self.lock().get(&id).cloned()
    }

    fn update(&self, session: InterviewSession) -> bool {
        match self.lock().get_mut(&session.id) {
            Some(slot) => {
                *slot = session;
                true
            }
            None => false,
        }
    }

    fn remove(&self, id: Uuid) -> Option<InterviewSession> {
        self.lock().remove(&id)
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::models::PlanItem;

    fn session() -> InterviewSession {
        InterviewSession::new(
            "Grace".to_string(),
            vec![PlanItem {
                skill: "A".to_string(),
                question: "q".to_string(),
            }],
            2,
        )
    }

    #[test]
    fn test_insert_get_remove() {
        let store = InMemorySessionStore::new();
        let s = session();
        let id = s.id;
        store.insert(s);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(id).unwrap().candidate_name, "Grace");

        assert!(store.remove(id).is_some());
        assert!(store.get(id).is_none());
        assert!(store.remove(id).is_none());
    }

    #[test]
    fn test_update_after_remove_is_rejected() {
        let store = InMemorySessionStore::new();
        let mut s = session();
        store.insert(s.clone());
        store.remove(s.id);

        s.cursor = 1;
        assert!(!store.update(s));
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_sessions_are_independent() {
        let store = InMemorySessionStore::new();
        let mut a = session();
        let b = session();
        store.insert(a.clone());
        store.insert(b.clone());

        a.followup_budget = 0;
        assert!(store.update(a.clone()));
        assert_eq!(store.get(a.id).unwrap().followup_budget, 0);
        assert_eq!(store.get(b.id).unwrap().followup_budget, 2);
    }
}
