use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::constants::MIN_DOCUMENT_CHARS;
use crate::scoring::{CandidateProfile, JobRequirement, ScoreBreakdown};
use crate::utils::EngineError;

/// The closed set of things the engine can generate. Each kind carries
/// its own cache TTL and payload schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationKind {
    Resume,
    CoverLetter,
    JobMatch,
    SkillsGap,
    CompanyResearch,
}

impl GenerationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resume => "resume",
            Self::CoverLetter => "cover_letter",
            Self::JobMatch => "job_match",
            Self::SkillsGap => "skills_gap",
            Self::CompanyResearch => "company_research",
        }
    }

    /// Kinds whose flow computes a deterministic match breakdown first
    pub fn uses_match_breakdown(&self) -> bool {
        matches!(self, Self::JobMatch | Self::SkillsGap)
    }

    /// Kinds that cannot be generated without a target job
    pub fn requires_job(&self) -> bool {
        matches!(
            self,
            Self::CoverLetter | Self::JobMatch | Self::SkillsGap | Self::CompanyResearch
        )
    }
}

impl fmt::Display for GenerationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GenerationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resume" => Ok(Self::Resume),
            "cover_letter" => Ok(Self::CoverLetter),
            "job_match" => Ok(Self::JobMatch),
            "skills_gap" => Ok(Self::SkillsGap),
            "company_research" => Ok(Self::CompanyResearch),
            _ => Err(format!("Invalid generation kind: {s}")),
        }
    }
}

/// Tone the generated document should take
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneStyle {
    #[default]
    Professional,
    Conversational,
    Impactful,
}

/// How long the generated document should run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthPreference {
    Concise,
    #[default]
    Standard,
    Detailed,
}

/// Recognized generation options, each with a safe default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    #[serde(default)]
    pub tone: ToneStyle,
    #[serde(default)]
    pub length: LengthPreference,
    /// Topics the document should emphasize
    #[serde(default)]
    pub focus_areas: Vec<String>,
    /// Override the kind's configured cache TTL for this request
    #[serde(default)]
    pub ttl_override: Option<Duration>,
}

/// The job posting side of a request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobContext {
    pub title: String,
    pub company: String,
    pub description: String,
    pub requirement: JobRequirement,
}

/// Structured request data; which parts are required depends on the kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestData {
    pub profile: CandidateProfile,
    pub job: Option<JobContext>,
}

/// A generation request as the application layer submits it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub kind: GenerationKind,
    /// Opaque identity supplied by the auth layer
    pub subject_id: String,
    /// Target entity, e.g. the tracked job id
    pub target_id: String,
    pub data: RequestData,
    #[serde(default)]
    pub options: GenerationOptions,
}

impl GenerationRequest {
    /// Fail-fast input validation, before any I/O happens
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.subject_id.trim().is_empty() {
            return Err(EngineError::InvalidRequest(
                "subject_id must not be empty".to_string(),
            ));
        }
        if self.target_id.trim().is_empty() {
            return Err(EngineError::InvalidRequest(
                "target_id must not be empty".to_string(),
            ));
        }
        if self.data.profile.full_name.trim().is_empty() {
            return Err(EngineError::InvalidRequest(
                "profile.full_name must not be empty".to_string(),
            ));
        }
        if self.kind.requires_job() {
            let job = self.data.job.as_ref().ok_or_else(|| {
                EngineError::InvalidRequest(format!(
                    "{} generation requires a target job",
                    self.kind
                ))
            })?;
            if self.kind == GenerationKind::CompanyResearch && job.company.trim().is_empty() {
                return Err(EngineError::InvalidRequest(
                    "company_research requires a company name".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Provider narrative for a job-match analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMatchAnalysis {
    pub summary: String,
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
}

/// Provider plan for closing a skills gap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillsGapReport {
    /// Most urgent first
    pub priorities: Vec<String>,
    pub learning_plan: String,
}

/// Provider research brief on a company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyResearchBrief {
    pub overview: String,
    pub culture: String,
    pub talking_points: Vec<String>,
}

/// Validated, kind-specific result payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GenerationPayload {
    Document {
        content: String,
    },
    JobMatch {
        breakdown: ScoreBreakdown,
        analysis: JobMatchAnalysis,
    },
    SkillsGap {
        breakdown: ScoreBreakdown,
        report: SkillsGapReport,
    },
    CompanyResearch {
        brief: CompanyResearchBrief,
    },
}

impl GenerationPayload {
    /// Validate provider output against the shape expected for `kind`.
    ///
    /// Malformed payloads are failures, never passed through; the
    /// orchestrator does not retry them, since re-sending the same prompt
    /// is assumed futile.
    pub fn from_completion(
        kind: GenerationKind,
        content: &str,
        breakdown: Option<ScoreBreakdown>,
    ) -> Result<Self, EngineError> {
        match kind {
            GenerationKind::Resume | GenerationKind::CoverLetter => {
                let trimmed = content.trim();
                if trimmed.chars().count() < MIN_DOCUMENT_CHARS {
                    return Err(shape_error(
                        kind,
                        format!(
                            "document shorter than {MIN_DOCUMENT_CHARS} characters"
                        ),
                    ));
                }
                Ok(Self::Document {
                    content: trimmed.to_string(),
                })
            }
            GenerationKind::JobMatch => {
                let analysis: JobMatchAnalysis = parse_json(kind, content)?;
                if analysis.summary.trim().is_empty() {
                    return Err(shape_error(kind, "empty summary".to_string()));
                }
                let breakdown = breakdown
                    .ok_or_else(|| shape_error(kind, "missing match breakdown".to_string()))?;
                Ok(Self::JobMatch {
                    breakdown,
                    analysis,
                })
            }
            GenerationKind::SkillsGap => {
                let report: SkillsGapReport = parse_json(kind, content)?;
                let breakdown = breakdown
                    .ok_or_else(|| shape_error(kind, "missing match breakdown".to_string()))?;
                Ok(Self::SkillsGap { breakdown, report })
            }
            GenerationKind::CompanyResearch => {
                let brief: CompanyResearchBrief = parse_json(kind, content)?;
                if brief.overview.trim().is_empty() {
                    return Err(shape_error(kind, "empty overview".to_string()));
                }
                Ok(Self::CompanyResearch { brief })
            }
        }
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(
    kind: GenerationKind,
    content: &str,
) -> Result<T, EngineError> {
    serde_json::from_str(strip_code_fence(content))
        .map_err(|e| shape_error(kind, e.to_string()))
}

fn shape_error(kind: GenerationKind, detail: String) -> EngineError {
    EngineError::ResultShape { kind, detail }
}

/// Models often wrap JSON answers in a markdown code fence; accept that.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    match rest.rfind("```") {
        Some(end) => rest[..end].trim(),
        None => rest.trim(),
    }
}

/// Final result handed back to the caller and stored in the cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub kind: GenerationKind,
    pub fingerprint: String,
    pub payload: GenerationPayload,
    pub model_name: String,
    /// Provider attempts behind this result; 0 when served from cache
    pub attempts: u32,
    pub latency_ms: u64,
    pub from_cache: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
