use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

use super::traits::PersistenceStore;
use crate::engine::GenerationSession;

/// In-memory persistence used by tests and by embedders that have not
/// wired a datastore yet. Unknown subjects start at profile version 1.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    sessions: Mutex<Vec<GenerationSession>>,
    versions: Mutex<HashMap<String, u64>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mirror of the application-layer hook that runs on profile writes
    pub fn bump_profile_version(&self, subject_id: &str) -> u64 {
        let mut versions = self.versions.lock();
        let version = versions.entry(subject_id.to_string()).or_insert(1);
        *version += 1;
        *version
    }

    /// Recorded sessions, oldest first
    pub fn sessions(&self) -> Vec<GenerationSession> {
        self.sessions.lock().clone()
    }
}

#[async_trait]
impl PersistenceStore for InMemoryStore {
    async fn save_session(&self, session: &GenerationSession) -> Result<()> {
        self.sessions.lock().push(session.clone());
        Ok(())
    }

    async fn load_profile_version(&self, subject_id: &str) -> Result<u64> {
        Ok(*self.versions.lock().get(subject_id).unwrap_or(&1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{GenerationKind, GenerationSession};

    #[tokio::test]
    async fn test_unknown_subject_starts_at_version_one() {
        let store = InMemoryStore::new();
        assert_eq!(store.load_profile_version("user-1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_bump_is_monotonic() {
        let store = InMemoryStore::new();
        assert_eq!(store.bump_profile_version("user-1"), 2);
        assert_eq!(store.bump_profile_version("user-1"), 3);
        assert_eq!(store.load_profile_version("user-1").await.unwrap(), 3);
        // Other subjects are unaffected
        assert_eq!(store.load_profile_version("user-2").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_sessions_are_recorded_in_order() {
        let store = InMemoryStore::new();
        let first = GenerationSession::new(GenerationKind::Resume, "user-1", "resume:aa");
        let second = GenerationSession::new(GenerationKind::JobMatch, "user-1", "job_match:bb");
        store.save_session(&first).await.unwrap();
        store.save_session(&second).await.unwrap();

        let sessions = store.sessions();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].id, first.id);
        assert_eq!(sessions[1].kind, GenerationKind::JobMatch);
    }
}
