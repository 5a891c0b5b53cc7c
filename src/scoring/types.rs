use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{ENTRY_MIN_YEARS, EXECUTIVE_MIN_YEARS, MID_MIN_YEARS, SENIOR_MIN_YEARS};

/// Seniority band a job posting targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeniorityBand {
    Entry,
    Mid,
    Senior,
    Executive,
}

impl SeniorityBand {
    /// Minimum years of relevant experience the band expects
    pub fn min_years(&self) -> f64 {
        match self {
            Self::Entry => ENTRY_MIN_YEARS,
            Self::Mid => MID_MIN_YEARS,
            Self::Senior => SENIOR_MIN_YEARS,
            Self::Executive => EXECUTIVE_MIN_YEARS,
        }
    }
}

impl fmt::Display for SeniorityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry => write!(f, "entry"),
            Self::Mid => write!(f, "mid"),
            Self::Senior => write!(f, "senior"),
            Self::Executive => write!(f, "executive"),
        }
    }
}

/// Highest education level, ordered low to high
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    None,
    HighSchool,
    Associate,
    Bachelor,
    Master,
    Doctorate,
}

impl EducationLevel {
    /// Position on the ordinal scale used for partial credit
    pub fn rank(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::HighSchool => 1,
            Self::Associate => 2,
            Self::Bachelor => 3,
            Self::Master => 4,
            Self::Doctorate => 5,
        }
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::HighSchool => write!(f, "high_school"),
            Self::Associate => write!(f, "associate"),
            Self::Bachelor => write!(f, "bachelor"),
            Self::Master => write!(f, "master"),
            Self::Doctorate => write!(f, "doctorate"),
        }
    }
}

/// Candidate profile as the scorer and templates consume it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProfile {
    /// Candidate display name
    pub full_name: String,
    /// Short positioning line, e.g. "Backend engineer, payments"
    pub headline: Option<String>,
    /// Free-form summary paragraph for document generation
    pub summary: Option<String>,
    /// Skills as the candidate entered them
    pub skills: Vec<String>,
    /// Years of relevant experience
    pub years_experience: f64,
    /// Highest completed education level
    pub education: EducationLevel,
}

/// Structured requirement side of a job posting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRequirement {
    /// Skills the posting asks for
    pub required_skills: Vec<String>,
    /// Seniority band of the role
    pub seniority: SeniorityBand,
    /// Stated education requirement, if any
    pub education: Option<EducationLevel>,
}

/// Weighted compatibility score with its component breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// round(0.5 * skills + 0.3 * experience + 0.2 * education)
    pub overall: u8,
    pub skills_score: u8,
    pub experience_score: u8,
    pub education_score: u8,
    /// Required skills the candidate has (requirement casing preserved)
    pub matched_skills: Vec<String>,
    /// Required skills the candidate lacks
    pub missing_skills: Vec<String>,
    /// One suggestion per missing skill, capped
    pub recommendations: Vec<String>,
}
