//! Shared request fixtures for unit tests across the crate.

use crate::engine::request::{
    GenerationKind, GenerationOptions, GenerationRequest, JobContext, RequestData,
};
use crate::scoring::{CandidateProfile, EducationLevel, JobRequirement, SeniorityBand};

pub fn sample_profile() -> CandidateProfile {
    CandidateProfile {
        full_name: "Jamie Rivera".to_string(),
        headline: Some("Frontend engineer, data-heavy products".to_string()),
        summary: Some(
            "Five years building React dashboards over SQL warehouses.".to_string(),
        ),
        skills: vec!["React".to_string(), "SQL".to_string()],
        years_experience: 4.0,
        education: EducationLevel::Bachelor,
    }
}

pub fn sample_job() -> JobContext {
    JobContext {
        title: "Frontend Engineer".to_string(),
        company: "Acme Analytics".to_string(),
        description: "Build customer-facing dashboards on our cloud platform.".to_string(),
        requirement: JobRequirement {
            required_skills: vec!["React".to_string(), "AWS".to_string()],
            seniority: SeniorityBand::Mid,
            education: None,
        },
    }
}

pub fn request_of(kind: GenerationKind, subject_id: &str, target_id: &str) -> GenerationRequest {
    GenerationRequest {
        kind,
        subject_id: subject_id.to_string(),
        target_id: target_id.to_string(),
        data: RequestData {
            profile: sample_profile(),
            job: Some(sample_job()),
        },
        options: GenerationOptions::default(),
    }
}

pub fn resume_request(subject_id: &str, target_id: &str) -> GenerationRequest {
    request_of(GenerationKind::Resume, subject_id, target_id)
}

pub fn job_match_request(subject_id: &str, target_id: &str) -> GenerationRequest {
    request_of(GenerationKind::JobMatch, subject_id, target_id)
}
