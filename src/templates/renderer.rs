use crate::engine::{GenerationKind, GenerationRequest, LengthPreference, ToneStyle};
use crate::scoring::ScoreBreakdown;
use crate::utils::EngineError;

/// Turns a request into the prompt sent to the generation provider.
///
/// Treated as a pure, possibly slow collaborator; tests substitute a
/// canned implementation.
pub trait TemplateRenderer: Send + Sync {
    fn render(
        &self,
        request: &GenerationRequest,
        breakdown: Option<&ScoreBreakdown>,
    ) -> Result<String, EngineError>;
}

/// Built-in prompt templates for every generation kind
#[derive(Debug, Default)]
pub struct PromptTemplates;

impl TemplateRenderer for PromptTemplates {
    fn render(
        &self,
        request: &GenerationRequest,
        breakdown: Option<&ScoreBreakdown>,
    ) -> Result<String, EngineError> {
        let mut prompt = String::new();
        let profile = &request.data.profile;

        prompt.push_str(&format!("Candidate: {}\n", profile.full_name));
        if let Some(headline) = &profile.headline {
            prompt.push_str(&format!("Headline: {}\n", headline));
        }
        if let Some(summary) = &profile.summary {
            prompt.push_str(&format!("Summary: {}\n", summary));
        }
        if !profile.skills.is_empty() {
            prompt.push_str(&format!("Skills: {}\n", profile.skills.join(", ")));
        }
        prompt.push_str(&format!(
            "Experience: {:.1} years, education: {}\n",
            profile.years_experience, profile.education
        ));

        if let Some(job) = &request.data.job {
            prompt.push_str(&format!(
                "\nTarget role: {} at {}\n{}\n",
                job.title, job.company, job.description
            ));
            if !job.requirement.required_skills.is_empty() {
                prompt.push_str(&format!(
                    "Required skills: {}\n",
                    job.requirement.required_skills.join(", ")
                ));
            }
        }

        if let Some(breakdown) = breakdown {
            prompt.push_str(&format!(
                "\nComputed match: overall {}, skills {}, experience {}, education {}\n",
                breakdown.overall,
                breakdown.skills_score,
                breakdown.experience_score,
                breakdown.education_score
            ));
            prompt.push_str(&format!(
                "Matched skills: {}\nMissing skills: {}\n",
                breakdown.matched_skills.join(", "),
                breakdown.missing_skills.join(", ")
            ));
        }

        prompt.push('\n');
        prompt.push_str(&instruction_for(request)?);
        prompt.push('\n');
        prompt.push_str(&style_instructions(request));
        Ok(prompt)
    }
}

/// The task instruction for the requested kind, including the JSON shape
/// the analytics kinds must answer with
fn instruction_for(request: &GenerationRequest) -> Result<String, EngineError> {
    let job = request.data.job.as_ref();
    Ok(match request.kind {
        GenerationKind::Resume => "Write a complete, ready-to-send resume for this \
            candidate, tailored to the target role if one is given. Output plain \
            text only."
            .to_string(),
        GenerationKind::CoverLetter => {
            let job = job.ok_or_else(|| {
                EngineError::Template("cover letter requires a target job".to_string())
            })?;
            format!(
                "Write a one-page cover letter from this candidate for the {} \
                 position at {}. Output plain text only.",
                job.title, job.company
            )
        }
        GenerationKind::JobMatch => "Using the computed match above, analyse how well \
            this candidate fits the role. Respond with a JSON object with keys \
            \"summary\" (string), \"strengths\" (array of strings), and \
            \"concerns\" (array of strings). Respond with JSON only."
            .to_string(),
        GenerationKind::SkillsGap => "Using the missing skills above, lay out how the \
            candidate should close the gap. Respond with a JSON object with keys \
            \"priorities\" (array of strings, most urgent first) and \
            \"learning_plan\" (string). Respond with JSON only."
            .to_string(),
        GenerationKind::CompanyResearch => {
            let job = job.ok_or_else(|| {
                EngineError::Template("company research requires a target company".to_string())
            })?;
            format!(
                "Research brief on {} for an interview candidate. Respond with a \
                 JSON object with keys \"overview\" (string), \"culture\" (string), \
                 and \"talking_points\" (array of strings). Respond with JSON only.",
                job.company
            )
        }
    })
}

fn style_instructions(request: &GenerationRequest) -> String {
    let tone = match request.options.tone {
        ToneStyle::Professional => "Use a professional, confident tone.",
        ToneStyle::Conversational => "Use a warm, conversational tone.",
        ToneStyle::Impactful => "Use a direct, high-impact tone that leads with results.",
    };
    let length = match request.options.length {
        LengthPreference::Concise => "Keep it concise.",
        LengthPreference::Standard => "Use a standard length.",
        LengthPreference::Detailed => "Be thorough and detailed.",
    };
    let mut style = format!("{} {}", tone, length);
    if !request.options.focus_areas.is_empty() {
        style.push_str(&format!(
            " Emphasize: {}.",
            request.options.focus_areas.join(", ")
        ));
    }
    style
}
