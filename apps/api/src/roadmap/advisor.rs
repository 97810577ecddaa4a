//! Roadmap advisor: the AI collaborator that writes free-text career advice.
//!
//! `AppState` carries an `Arc<dyn RoadmapAdvisor>`. The only contract is
//! "return one block of text"; `parser::parse_roadmap_text` does the rest.

use async_trait::async_trait;

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::roadmap::models::{ExperienceLevel, NewRoadmapProfile, RoadmapProfile};
use crate::roadmap::prompts::{ROADMAP_PROMPT_TEMPLATE, ROADMAP_SYSTEM};

/// Profile facts the advisor bases its roadmap on.
#[derive(Debug, Clone)]
pub struct CareerBrief {
    pub current_education: String,
    pub current_skills: Vec<String>,
    pub interests: Vec<String>,
    pub target_role: String,
    pub experience_level: ExperienceLevel,
}

impl From<&NewRoadmapProfile> for CareerBrief {
    fn from(fields: &NewRoadmapProfile) -> Self {
        Self {
            current_education: fields.current_education.clone(),
            current_skills: fields.current_skills.clone(),
            interests: fields.interests.clone(),
            target_role: fields.target_role.clone(),
            experience_level: fields.experience_level,
        }
    }
}

impl From<&RoadmapProfile> for CareerBrief {
    fn from(profile: &RoadmapProfile) -> Self {
        Self {
            current_education: profile.current_education.clone(),
            current_skills: profile.current_skills.clone(),
            interests: profile.interests.clone(),
            target_role: profile.target_role.clone(),
            experience_level: profile.experience_level,
        }
    }
}

#[async_trait]
pub trait RoadmapAdvisor: Send + Sync {
    async fn advise(&self, brief: &CareerBrief) -> Result<String, AppError>;
}

/// Advisor backed by Claude.
pub struct LlmRoadmapAdvisor(pub LlmClient);

#[async_trait]
impl RoadmapAdvisor for LlmRoadmapAdvisor {
    async fn advise(&self, brief: &CareerBrief) -> Result<String, AppError> {
        let prompt = build_roadmap_prompt(brief);
        self.0
            .complete(&prompt, ROADMAP_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Roadmap generation failed: {e}")))
    }
}

pub fn build_roadmap_prompt(brief: &CareerBrief) -> String {
    ROADMAP_PROMPT_TEMPLATE
        .replace("{current_education}", or_unspecified(&brief.current_education))
        .replace("{current_skills}", or_unspecified(&brief.current_skills.join(", ")))
        .replace("{interests}", or_unspecified(&brief.interests.join(", ")))
        .replace("{target_role}", or_unspecified(&brief.target_role))
        .replace("{experience_level}", brief.experience_level.as_str())
}

fn or_unspecified(value: &str) -> &str {
    if value.trim().is_empty() {
        "not specified"
    } else {
        value
    }
}

/// Returns the same text for every request.
#[cfg(test)]
pub(crate) struct CannedAdvisor(pub &'static str);

#[cfg(test)]
#[async_trait]
impl RoadmapAdvisor for CannedAdvisor {
    async fn advise(&self, _brief: &CareerBrief) -> Result<String, AppError> {
        Ok(self.0.to_string())
    }
}

/// Fails every request, standing in for an unreachable LLM.
#[cfg(test)]
pub(crate) struct FailingAdvisor;

#[cfg(test)]
#[async_trait]
impl RoadmapAdvisor for FailingAdvisor {
    async fn advise(&self, _brief: &CareerBrief) -> Result<String, AppError> {
        Err(AppError::Llm("upstream unavailable".to_string()))
    }
}
