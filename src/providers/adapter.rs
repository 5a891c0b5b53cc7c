use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use super::traits::GenerationProvider;
use super::types::{CallMetrics, CallOutcome, Completion, RetryOptions, TokenUsage};
use crate::constants::ERROR_BODY_PREVIEW_CHARS;
use crate::utils::EngineError;

/// What went wrong with a single attempt, and whether another is worth it
enum AttemptFailure {
    /// Timeouts, transport errors, 5xx: retry with backoff
    Transient(String),
    /// 429: retry with backoff, classified separately on exhaustion
    RateLimited(String),
}

/// Wraps a [`GenerationProvider`] with per-attempt timeout, exponential
/// backoff, and structured error classification.
///
/// Retryable failures (timeout, transport, 429, 5xx) are retried up to
/// `max_retries` times; malformed-request rejections are surfaced
/// immediately. Exhaustion surfaces a classified error, never a raw
/// transport exception.
pub struct ProviderAdapter {
    provider: Arc<dyn GenerationProvider>,
    opts: RetryOptions,
}

impl ProviderAdapter {
    pub fn new(provider: Arc<dyn GenerationProvider>, opts: RetryOptions) -> Self {
        Self { provider, opts }
    }

    pub fn retry_options(&self) -> &RetryOptions {
        &self.opts
    }

    /// Call the provider, retrying transient failures with backoff.
    pub async fn call(&self, prompt: &str) -> Result<CallOutcome, EngineError> {
        let started = Instant::now();
        let max_attempts = self.opts.max_retries + 1;
        let mut last_failure = AttemptFailure::Transient("no attempt made".to_string());

        for attempt in 1..=max_attempts {
            let outcome = tokio::time::timeout(
                self.opts.attempt_timeout,
                self.provider.invoke(prompt),
            )
            .await;

            match outcome {
                Err(_elapsed) => {
                    warn!(
                        attempt,
                        provider = self.provider.name(),
                        "provider attempt exceeded its deadline"
                    );
                    last_failure = AttemptFailure::Transient(format!(
                        "attempt deadline of {:?} elapsed",
                        self.opts.attempt_timeout
                    ));
                }
                Ok(Err(transport)) => {
                    warn!(
                        attempt,
                        provider = self.provider.name(),
                        error = %transport,
                        "provider transport failure"
                    );
                    last_failure = AttemptFailure::Transient(transport.to_string());
                }
                Ok(Ok(response)) => match response.status {
                    200..=299 => {
                        let completion =
                            extract_completion(&response.body, self.provider.name())?;
                        let metrics = CallMetrics {
                            attempts: attempt,
                            total_latency: started.elapsed(),
                        };
                        debug!(
                            attempts = metrics.attempts,
                            latency_ms = metrics.total_latency.as_millis() as u64,
                            provider = self.provider.name(),
                            "provider call succeeded"
                        );
                        return Ok(CallOutcome { completion, metrics });
                    }
                    429 => {
                        last_failure =
                            AttemptFailure::RateLimited(preview(&response.body));
                    }
                    408 => {
                        last_failure = AttemptFailure::Transient(
                            "provider reported request timeout".to_string(),
                        );
                    }
                    500..=599 => {
                        last_failure = AttemptFailure::Transient(format!(
                            "status {}: {}",
                            response.status,
                            preview(&response.body)
                        ));
                    }
                    status => {
                        // Malformed requests and policy rejections are
                        // never retried
                        return Err(EngineError::ProviderRejected(format!(
                            "status {}: {}",
                            status,
                            preview(&response.body)
                        )));
                    }
                },
            }

            if attempt < max_attempts {
                let backoff = self.opts.backoff_for(attempt - 1);
                debug!(
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    "backing off before retry"
                );
                tokio::time::sleep(backoff).await;
            }
        }

        Err(match last_failure {
            AttemptFailure::Transient(last_error) => EngineError::ProviderTimeout {
                attempts: max_attempts,
                last_error,
            },
            AttemptFailure::RateLimited(detail) => EngineError::ProviderRateLimited {
                attempts: max_attempts,
                detail,
            },
        })
    }
}

/// Parse the gateway's OpenAI-format completion envelope
fn extract_completion(body: &str, fallback_model: &str) -> Result<Completion, EngineError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body).map_err(|e| {
        EngineError::ProviderRejected(format!("unparseable completion body: {}", e))
    })?;

    let choice = parsed.choices.into_iter().next().ok_or_else(|| {
        EngineError::ProviderRejected("completion body contained no choices".to_string())
    })?;

    Ok(Completion {
        content: choice.message.content,
        model_name: parsed
            .model
            .unwrap_or_else(|| fallback_model.to_string()),
        usage: parsed.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        }),
    })
}

fn preview(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.len() <= ERROR_BODY_PREVIEW_CHARS {
        trimmed.to_string()
    } else {
        let cut = trimmed
            .char_indices()
            .take_while(|(i, _)| *i < ERROR_BODY_PREVIEW_CHARS)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}...", &trimmed[..cut])
    }
}

// Response structures for the gateway (OpenAI format)

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    model: Option<String>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: usize,
    completion_tokens: usize,
    total_tokens: usize,
}
