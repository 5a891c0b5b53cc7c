use std::time::Duration;

use crate::constants::{
    ATTEMPT_TIMEOUT_SECS, BACKOFF_BASE_MS, BACKOFF_CAP_MS, DEFAULT_MAX_RETRIES,
};

/// Raw provider reply: HTTP-like status plus unparsed body
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub status: u16,
    pub body: String,
}

/// Parsed completion extracted from a successful provider reply
#[derive(Debug, Clone)]
pub struct Completion {
    /// The generated text
    pub content: String,
    /// Model that produced the completion
    pub model_name: String,
    /// Usage statistics if the provider reported them
    pub usage: Option<TokenUsage>,
}

/// Token usage statistics
#[derive(Debug, Clone)]
pub struct TokenUsage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

/// Retry policy for a provider call
#[derive(Debug, Clone)]
pub struct RetryOptions {
    /// Hard wall-clock deadline per attempt
    pub attempt_timeout: Duration,
    /// Retries after the initial attempt, so max_retries = 2 means at
    /// most 3 attempts total
    pub max_retries: u32,
    /// First backoff delay; doubles each retry
    pub backoff_base: Duration,
    /// Ceiling for the exponential backoff
    pub backoff_cap: Duration,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_secs(ATTEMPT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base: Duration::from_millis(BACKOFF_BASE_MS),
            backoff_cap: Duration::from_millis(BACKOFF_CAP_MS),
        }
    }
}

impl RetryOptions {
    /// Backoff before the given retry (0-based), capped
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry);
        self.backoff_base.saturating_mul(factor).min(self.backoff_cap)
    }

    /// Worst-case wall clock a full call can consume: every attempt runs
    /// to its deadline and every backoff is taken
    pub fn worst_case_budget(&self) -> Duration {
        let attempts = self.max_retries + 1;
        let mut budget = self.attempt_timeout.saturating_mul(attempts);
        for retry in 0..self.max_retries {
            budget = budget.saturating_add(self.backoff_for(retry));
        }
        budget
    }
}

/// Observable side effects of one adapter call
#[derive(Debug, Clone)]
pub struct CallMetrics {
    pub attempts: u32,
    pub total_latency: Duration,
}

/// Successful adapter call: the completion plus its metrics
#[derive(Debug, Clone)]
pub struct CallOutcome {
    pub completion: Completion,
    pub metrics: CallMetrics,
}
