use std::collections::HashSet;

use super::types::{CandidateProfile, JobRequirement, ScoreBreakdown};
use crate::constants::{
    DEFAULT_MAX_RECOMMENDATIONS, EDUCATION_WEIGHT, EXPERIENCE_WEIGHT, SKILLS_WEIGHT,
};

/// Deterministic job-match scorer. Pure computation, no I/O.
#[derive(Debug, Clone)]
pub struct Scorer {
    max_recommendations: usize,
}

impl Default for Scorer {
    fn default() -> Self {
        Self {
            max_recommendations: DEFAULT_MAX_RECOMMENDATIONS,
        }
    }
}

impl Scorer {
    pub fn new(max_recommendations: usize) -> Self {
        Self {
            max_recommendations,
        }
    }

    /// Score a candidate profile against a job requirement.
    ///
    /// Skill comparison is case-insensitive and whitespace-trimmed; the
    /// matched/missing lists preserve the requirement's original casing.
    pub fn score(&self, profile: &CandidateProfile, requirement: &JobRequirement) -> ScoreBreakdown {
        let candidate: HashSet<String> = profile.skills.iter().map(|s| normalize(s)).collect();

        // Dedup the requirement on the normalized form so a skill listed
        // twice cannot count twice in either direction
        let mut seen = HashSet::new();
        let mut matched = Vec::new();
        let mut missing = Vec::new();
        for skill in &requirement.required_skills {
            let norm = normalize(skill);
            if norm.is_empty() || !seen.insert(norm.clone()) {
                continue;
            }
            if candidate.contains(&norm) {
                matched.push(skill.trim().to_string());
            } else {
                missing.push(skill.trim().to_string());
            }
        }

        let required_count = matched.len() + missing.len();
        // An unconstrained requirement carries no skill penalty
        let skills_score = if required_count == 0 {
            100.0
        } else {
            matched.len() as f64 / required_count as f64 * 100.0
        };

        let experience_score = experience_score(profile, requirement);
        let education_score = education_score(profile, requirement);

        let overall = (SKILLS_WEIGHT * skills_score
            + EXPERIENCE_WEIGHT * experience_score
            + EDUCATION_WEIGHT * education_score)
            .round()
            .clamp(0.0, 100.0);

        let recommendations = missing
            .iter()
            .take(self.max_recommendations)
            .map(|skill| {
                format!(
                    "Highlight a project or transferable experience with {skill}, \
                     or add it to your skills after closing the gap"
                )
            })
            .collect();

        ScoreBreakdown {
            overall: overall as u8,
            skills_score: skills_score.round() as u8,
            experience_score: experience_score.round() as u8,
            education_score: education_score.round() as u8,
            matched_skills: matched,
            missing_skills: missing,
            recommendations,
        }
    }
}

fn normalize(skill: &str) -> String {
    skill.trim().to_lowercase()
}

/// Candidate years against the band's minimum, proportional below the bar
fn experience_score(profile: &CandidateProfile, requirement: &JobRequirement) -> f64 {
    let min_years = requirement.seniority.min_years();
    if min_years <= 0.0 {
        return 100.0;
    }
    let years = profile.years_experience.max(0.0);
    (years / min_years * 100.0).clamp(0.0, 100.0)
}

/// Full marks for meets-or-exceeds, else partial credit on the ordinal scale
fn education_score(profile: &CandidateProfile, requirement: &JobRequirement) -> f64 {
    let Some(required) = requirement.education else {
        return 100.0;
    };
    let required_rank = required.rank();
    if required_rank == 0 || profile.education.rank() >= required_rank {
        return 100.0;
    }
    f64::from(profile.education.rank()) / f64::from(required_rank) * 100.0
}
