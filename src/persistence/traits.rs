use anyhow::Result;
use async_trait::async_trait;

use crate::engine::GenerationSession;

/// Durable storage the engine collaborates with.
///
/// Session records exist for audit and debugging; the profile version is
/// load-bearing, since it feeds fingerprinting. The engine never mutates
/// profiles; the application layer bumps the version on every profile
/// write.
#[async_trait]
pub trait PersistenceStore: Send + Sync {
    /// Durably record a session's outcome
    async fn save_session(&self, session: &GenerationSession) -> Result<()>;

    /// Current profile version for a subject
    async fn load_profile_version(&self, subject_id: &str) -> Result<u64>;
}
