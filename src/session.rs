use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub id: Uuid,
    pub role: Role,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub turns: Vec<Turn>,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            turns: Vec::new(),
        }
    }
}

/// Process-wide conversation state keyed by requester. A single lock guards the
/// whole map; generation calls must run on a snapshot, outside the lock.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    max_turns: usize,
}

pub const DEFAULT_MAX_TURNS: usize = 10;

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TURNS)
    }
}

impl SessionStore {
    pub fn new(max_turns: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_turns,
        }
    }

    /// Returns a copy of the turns for `key`, creating the session if absent.
    pub async fn snapshot(&self, key: &str) -> Vec<Turn> {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(key.to_string())
            .or_insert_with(Session::new)
            .turns
            .clone()
    }

    /// Appends a user/assistant pair as one atomic operation, then enforces the
    /// turn bound by dropping the oldest turns.
    pub async fn append_exchange(&self, key: &str, user_text: &str, assistant_text: &str) {
        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(key.to_string()).or_insert_with(Session::new);
        session.turns.push(Turn::new(Role::User, user_text));
        session.turns.push(Turn::new(Role::Assistant, assistant_text));
        if session.turns.len() > self.max_turns {
            let excess = session.turns.len() - self.max_turns;
            session.turns.drain(..excess);
        }
        session.updated_at = Utc::now();
    }

    /// Removes the session for `key`. Returns whether one existed.
    pub async fn clear(&self, key: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        sessions.remove(key).is_some()
    }

    pub async fn turn_count(&self, key: &str) -> usize {
        let sessions = self.sessions.read().await;
        sessions.get(key).map(|s| s.turns.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn snapshot_creates_empty_session() {
        let store = SessionStore::default();
        let turns = store.snapshot("10.0.0.1").await;
        assert!(turns.is_empty());
        assert_eq!(store.turn_count("10.0.0.1").await, 0);
    }

    #[tokio::test]
    async fn append_exchange_grows_by_pairs_in_order() {
        let store = SessionStore::default();
        store.append_exchange("k", "hello", "hi there").await;
        store.append_exchange("k", "leave balance?", "12 days").await;

        let turns = store.snapshot("k").await;
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[0].text, "hello");
        assert_eq!(turns[1].role, Role::Assistant);
        assert_eq!(turns[2].text, "leave balance?");
        assert_eq!(turns[3].text, "12 days");
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let store = SessionStore::default();
        assert!(!store.clear("nobody").await);
        store.append_exchange("k", "a", "b").await;
        assert!(store.clear("k").await);
        assert!(!store.clear("k").await);
        assert_eq!(store.turn_count("k").await, 0);
    }

    #[tokio::test]
    async fn turn_bound_drops_oldest() {
        let store = SessionStore::new(4);
        store.append_exchange("k", "m1", "r1").await;
        store.append_exchange("k", "m2", "r2").await;
        store.append_exchange("k", "m3", "r3").await;

        let turns = store.snapshot("k").await;
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0].text, "m2");
        assert_eq!(turns[3].text, "r3");
    }

    #[tokio::test]
    async fn concurrent_appends_never_interleave_pairs() {
        let store = SessionStore::new(1000);
        let mut handles = Vec::new();
        for i in 0..32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .append_exchange("shared", &format!("q{i}"), &format!("a{i}"))
                    .await;
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        let turns = store.snapshot("shared").await;
        assert_eq!(turns.len(), 64);
        for pair in turns.chunks(2) {
            assert_eq!(pair[0].role, Role::User);
            assert_eq!(pair[1].role, Role::Assistant);
            assert_eq!(pair[1].text, pair[0].text.replace('q', "a"));
        }
    }
}
