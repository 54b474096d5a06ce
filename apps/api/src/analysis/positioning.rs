//! Positioning analysis: how well a candidate profile fits the target role.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::prompts::POSITIONING_PROMPT_TEMPLATE;
use crate::analysis::query::{CandidateProfile, CareerQuery};
use crate::llm_client::prompts::finish_prompt;
use crate::llm_client::{complete_json, CompletionRequest, LlmError, TextCompletion};
use crate::models::lenient::{lossy_vec, opt_number, opt_string, or_default};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PositioningResult {
    /// Model-generated 0-100 fit heuristic.
    #[serde(deserialize_with = "opt_number")]
    pub readiness_score: Option<f64>,
    #[serde(deserialize_with = "lossy_vec")]
    pub key_strengths: Vec<String>,
    #[serde(deserialize_with = "lossy_vec")]
    pub growth_areas: Vec<String>,
    #[serde(deserialize_with = "or_default")]
    pub score_breakdown: ScoreBreakdown,
    /// Markdown-lite: `**bold**` and newlines only.
    #[serde(deserialize_with = "opt_string")]
    pub verdict: Option<String>,
    #[serde(deserialize_with = "lossy_vec")]
    pub top_sectors: Vec<String>,
    #[serde(deserialize_with = "lossy_vec")]
    pub hiring_companies: Vec<HiringCompany>,
    #[serde(deserialize_with = "opt_string")]
    pub demand_trend: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreBreakdown {
    #[serde(deserialize_with = "opt_number")]
    pub location_fit: Option<f64>,
    #[serde(deserialize_with = "opt_number")]
    pub role_demand: Option<f64>,
    #[serde(deserialize_with = "opt_number")]
    pub goal_feasibility: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HiringCompany {
    #[serde(deserialize_with = "opt_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub sector: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub match_level: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub hiring_focus: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub sector_specific_focus: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub culture_vibe: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub rationale: Option<String>,
}

pub fn build_positioning_prompt(query: &CareerQuery, profile: &CandidateProfile) -> String {
    finish_prompt(
        &POSITIONING_PROMPT_TEMPLATE
            .replace("{role}", &query.role)
            .replace("{location}", &query.location)
            .replace("{current_level}", &query.current_level)
            .replace("{goal}", &query.goal)
            .replace("{experience_level}", &profile.experience_level)
            .replace("{education}", &profile.education)
            .replace("{skills}", &profile.skills)
            .replace("{experience}", &profile.experience),
    )
}

/// Runs the positioning analysis. No web search, no thinking budget.
pub async fn analyze_positioning(
    llm: &dyn TextCompletion,
    query: &CareerQuery,
    profile: &CandidateProfile,
) -> Result<PositioningResult, LlmError> {
    let request = CompletionRequest::new(build_positioning_prompt(query, profile));
    let (result, _) = complete_json::<PositioningResult>(llm, &request, "{}").await?;
    info!(
        "Positioning ready for '{}': score={:?}, {} hiring companies",
        query.role,
        result.readiness_score,
        result.hiring_companies.len()
    );
    Ok(result)
}
