use std::time::Duration;
use thiserror::Error;

use crate::engine::GenerationKind;

/// Main error type for the generation engine.
///
/// Every variant is `Clone` so a single classified outcome can be fanned
/// out to all callers joined on the same in-flight generation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Provider timed out after {attempts} attempt(s): {last_error}")]
    ProviderTimeout { attempts: u32, last_error: String },

    #[error("Provider rate limited after {attempts} attempt(s): {detail}")]
    ProviderRateLimited { attempts: u32, detail: String },

    #[error("Provider rejected request: {0}")]
    ProviderRejected(String),

    #[error("Malformed {kind} payload: {detail}")]
    ResultShape {
        kind: GenerationKind,
        detail: String,
    },

    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Template rendering failed: {0}")]
    Template(String),

    #[error("Generation deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),
}

impl EngineError {
    /// Whether resubmitting the same request later is worthwhile.
    ///
    /// Shape and rejection errors are terminal for a given input; the
    /// caller must change something before trying again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ProviderTimeout { .. }
                | Self::ProviderRateLimited { .. }
                | Self::DeadlineExceeded(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        let timeout = EngineError::ProviderTimeout {
            attempts: 3,
            last_error: "attempt deadline elapsed".to_string(),
        };
        assert!(timeout.is_retryable());

        let limited = EngineError::ProviderRateLimited {
            attempts: 3,
            detail: "429".to_string(),
        };
        assert!(limited.is_retryable());

        assert!(!EngineError::ProviderRejected("bad request".to_string()).is_retryable());
        assert!(!EngineError::InvalidRequest("missing job".to_string()).is_retryable());
        assert!(!EngineError::ResultShape {
            kind: GenerationKind::JobMatch,
            detail: "not json".to_string(),
        }
        .is_retryable());
    }

    #[test]
    fn test_display_includes_attempts() {
        let err = EngineError::ProviderTimeout {
            attempts: 2,
            last_error: "connect refused".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("2 attempt"));
        assert!(rendered.contains("connect refused"));
    }
}
