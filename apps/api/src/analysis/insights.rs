//! Local market insights: hiring companies plus city and state demand tables.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::prompts::INSIGHTS_PROMPT_TEMPLATE;
use crate::llm_client::prompts::finish_prompt;
use crate::llm_client::{complete_json, CompletionRequest, LlmError, TextCompletion};
use crate::models::lenient::{lossy_vec, opt_string};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsightsResult {
    #[serde(deserialize_with = "lossy_vec")]
    pub top_companies: Vec<Company>,
    #[serde(deserialize_with = "lossy_vec")]
    pub top_cities: Vec<RegionDemand>,
    #[serde(deserialize_with = "lossy_vec")]
    pub top_states: Vec<RegionDemand>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Company {
    #[serde(deserialize_with = "opt_string")]
    pub name: Option<String>,
    /// "Global Titan", "National Leader" or "Startup", though the model drifts.
    #[serde(deserialize_with = "opt_string")]
    pub category: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub culture_vibe: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub website: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub linkedin: Option<String>,
}

/// A row in the city or state demand table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionDemand {
    #[serde(deserialize_with = "opt_string")]
    pub location: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub salary: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub demand: Option<String>,
}

pub fn build_insights_prompt(role: &str, location: &str) -> String {
    finish_prompt(
        &INSIGHTS_PROMPT_TEMPLATE
            .replace("{role}", role)
            .replace("{location}", location),
    )
}

/// Fetches the local ecosystem view with web search enabled.
pub async fn fetch_local_insights(
    llm: &dyn TextCompletion,
    role: &str,
    location: &str,
) -> Result<InsightsResult, LlmError> {
    let request = CompletionRequest::new(build_insights_prompt(role, location)).with_web_search();
    let (insights, _) = complete_json::<InsightsResult>(llm, &request, "{}").await?;
    info!(
        "Local insights ready for '{}' in '{}': {} companies, {} cities, {} states",
        role,
        location,
        insights.top_companies.len(),
        insights.top_cities.len(),
        insights.top_states.len()
    );
    Ok(insights)
}
