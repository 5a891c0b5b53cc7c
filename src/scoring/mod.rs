mod matcher;
mod types;

pub use matcher::Scorer;
pub use types::{
    CandidateProfile, EducationLevel, JobRequirement, ScoreBreakdown, SeniorityBand,
};
