use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use super::request::GenerationKind;

/// Generation session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Initial state when the session is created
    Pending,
    /// Provider work is in flight
    InProgress,
    /// Generation finished with a validated result
    Completed,
    /// Generation failed with a classified error
    Failed,
    /// Caller abandoned the flight before it settled
    Cancelled,
}

impl SessionStatus {
    /// Check if this is a terminal state (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    /// Check if this is an active state
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }

    fn can_transition_to(&self, next: SessionStatus) -> bool {
        match self {
            // A cache hit completes a pending session without provider work
            Self::Pending => matches!(
                next,
                Self::InProgress | Self::Completed | Self::Cancelled
            ),
            Self::InProgress => {
                matches!(next, Self::Completed | Self::Failed | Self::Cancelled)
            }
            Self::Completed | Self::Failed | Self::Cancelled => false,
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Invalid session status: {s}")),
        }
    }
}

/// Attempted transition out of a terminal state, or a skipped state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("illegal session transition from {from} to {to}")]
pub struct IllegalTransition {
    pub from: SessionStatus,
    pub to: SessionStatus,
}

/// Audit record for one generation flight.
///
/// Exactly one session is active per fingerprint at a time; the dedup
/// layer keys on the same fingerprint recorded here. Terminal sessions
/// are immutable; a re-request after a terminal state starts a new
/// session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSession {
    pub id: Uuid,
    pub fingerprint: String,
    pub kind: GenerationKind,
    pub subject_id: String,
    pub status: SessionStatus,
    pub attempts: u32,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error_detail: Option<String>,
    pub result_ref: Option<String>,
}

impl GenerationSession {
    pub fn new(kind: GenerationKind, subject_id: &str, fingerprint: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            fingerprint: fingerprint.to_string(),
            kind,
            subject_id: subject_id.to_string(),
            status: SessionStatus::Pending,
            attempts: 0,
            started_at: Utc::now(),
            completed_at: None,
            error_detail: None,
            result_ref: None,
        }
    }

    fn transition(&mut self, next: SessionStatus) -> Result<(), IllegalTransition> {
        if !self.status.can_transition_to(next) {
            return Err(IllegalTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        if next.is_terminal() {
            self.completed_at = Some(Utc::now());
        }
        Ok(())
    }

    pub fn mark_in_progress(&mut self) -> Result<(), IllegalTransition> {
        self.transition(SessionStatus::InProgress)
    }

    /// Settle successfully. `attempts` is 0 for a cache hit.
    pub fn complete(&mut self, attempts: u32, result_ref: &str) -> Result<(), IllegalTransition> {
        self.transition(SessionStatus::Completed)?;
        self.attempts = attempts;
        self.result_ref = Some(result_ref.to_string());
        Ok(())
    }

    pub fn fail(&mut self, attempts: u32, error_detail: &str) -> Result<(), IllegalTransition> {
        self.transition(SessionStatus::Failed)?;
        self.attempts = attempts;
        self.error_detail = Some(error_detail.to_string());
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), IllegalTransition> {
        self.transition(SessionStatus::Cancelled)
    }
}
