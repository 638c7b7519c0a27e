use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::core::MatchingSession;

/// Errors that can occur with session registry operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Session not found: {0}")]
    NotFound(Uuid),
}

/// A session shared between request handlers; the mutex serializes review
/// actions on one dataset
pub type SharedSession = Arc<Mutex<MatchingSession>>;

/// In-memory registry of review sessions.
///
/// Sessions are evicted after sitting idle for the configured time or when the
/// capacity is exceeded. Nothing is persisted.
#[derive(Clone)]
pub struct SessionStore {
    sessions: moka::future::Cache<Uuid, SharedSession>,
}

impl SessionStore {
    /// Create a new session store
    pub fn new(max_sessions: u64, idle_secs: u64) -> Self {
        let sessions = moka::future::CacheBuilder::new(max_sessions)
            .time_to_idle(Duration::from_secs(idle_secs))
            .build();

        Self { sessions }
    }

    /// Register a session and return its id
    pub async fn insert(&self, session: MatchingSession) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.insert(id, Arc::new(Mutex::new(session))).await;
        tracing::trace!("Session stored: {}", id);
        id
    }

    /// Look up a session
    pub async fn get(&self, id: &Uuid) -> Result<SharedSession, StoreError> {
        self.sessions.get(id).await.ok_or(StoreError::NotFound(*id))
    }

    /// Drop a session
    pub async fn remove(&self, id: &Uuid) -> Result<(), StoreError> {
        self.sessions
            .remove(id)
            .await
            .map(|_| ())
            .ok_or(StoreError::NotFound(*id))
    }

    /// Get store statistics
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            sessions: self.sessions.entry_count(),
        }
    }
}

/// Store statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    pub sessions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScoringWeights;

    fn empty_session() -> MatchingSession {
        MatchingSession::new(vec![], vec![], vec![], ScoringWeights::default())
    }

    #[test]
    fn test_insert_get_remove() {
        tokio_test::block_on(async {
            let store = SessionStore::new(10, 60);

            let id = store.insert(empty_session()).await;
            let session = store.get(&id).await.unwrap();
            assert_eq!(session.lock().await.summary().match_count, 0);

            store.remove(&id).await.unwrap();
            assert!(matches!(store.get(&id).await, Err(StoreError::NotFound(_))));
        });
    }

    #[test]
    fn test_unknown_session() {
        tokio_test::block_on(async {
            let store = SessionStore::new(10, 60);
            let id = Uuid::new_v4();

            assert!(store.get(&id).await.is_err());
            assert!(store.remove(&id).await.is_err());
        });
    }

    #[tokio::test]
    async fn test_sessions_are_shared() {
        let store = SessionStore::new(10, 60);
        let id = store.insert(empty_session()).await;

        let a = store.get(&id).await.unwrap();
        let b = store.get(&id).await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
