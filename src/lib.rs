pub mod app;
pub mod cache;
pub mod constants;
pub mod engine;
pub mod persistence;
pub mod providers;
pub mod scoring;
pub mod templates;
pub mod utils;

pub use app::{load_config, EngineConfig};
pub use cache::{CacheStats, CacheStore, Fingerprint, ResultCache};
pub use engine::{
    GenerationEngine, GenerationKind, GenerationOptions, GenerationRequest,
    GenerationResult, GenerationSession, SessionStatus, SingleFlight,
};
pub use persistence::{InMemoryStore, PersistenceStore};
pub use providers::{GatewayProvider, GenerationProvider, ProviderAdapter, RetryOptions};
pub use scoring::{CandidateProfile, JobRequirement, ScoreBreakdown, Scorer};
pub use templates::{PromptTemplates, TemplateRenderer};
pub use utils::{init_logger, EngineError};
