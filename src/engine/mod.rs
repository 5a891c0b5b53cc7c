// Gateway module for the generation engine
mod dedup;
mod orchestrator;
mod request;
mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use dedup::SingleFlight;
pub use orchestrator::GenerationEngine;
pub use request::{
    CompanyResearchBrief, GenerationKind, GenerationOptions, GenerationPayload,
    GenerationRequest, GenerationResult, JobContext, JobMatchAnalysis, LengthPreference,
    RequestData, SkillsGapReport, ToneStyle,
};
pub use session::{GenerationSession, IllegalTransition, SessionStatus};
