mod adapter;
mod gateway;
mod traits;
mod types;

pub use adapter::ProviderAdapter;
pub use gateway::GatewayProvider;
pub use traits::GenerationProvider;
pub use types::{
    CallMetrics, CallOutcome, Completion, ProviderResponse, RetryOptions, TokenUsage,
};
