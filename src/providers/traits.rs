use anyhow::Result;
use async_trait::async_trait;

use super::types::ProviderResponse;

/// Core trait every generation backend must implement.
///
/// Implementations return the raw status/body pair; transport failures
/// surface as errors. Classification, timeout enforcement, and retry all
/// live in the [`ProviderAdapter`](super::ProviderAdapter) wrapping this.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Send a rendered prompt to the provider and get its raw reply
    async fn invoke(&self, prompt: &str) -> Result<ProviderResponse>;

    /// Identifier used in logs and as the model-name fallback
    fn name(&self) -> &str;
}
