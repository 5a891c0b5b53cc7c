use sha2::{Digest, Sha256};
use std::fmt;

use crate::engine::GenerationKind;

/// Deterministic cache/dedup key for a generation request.
///
/// Built from the fields that define "the same question": subject identity,
/// target entity, generation kind, and the subject's profile version.
/// Volatile inputs (timestamps, request ids) are deliberately excluded.
/// Bumping the profile version changes the key, so stale entries become
/// unreachable without any cache scanning.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    key: String,
}

impl Fingerprint {
    /// Hash the canonical field ordering into a kind-namespaced key.
    pub fn build(
        subject_id: &str,
        target_id: &str,
        kind: GenerationKind,
        profile_version: u64,
    ) -> Self {
        let mut hasher = Sha256::new();
        // Length-prefix the string fields so field boundaries can never
        // be confused across inputs
        for field in [subject_id, target_id, kind.as_str()] {
            hasher.update((field.len() as u64).to_le_bytes());
            hasher.update(field.as_bytes());
        }
        hasher.update(profile_version.to_le_bytes());
        let digest = hasher.finalize();

        Self {
            key: format!("{}:{:x}", kind, digest),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}
