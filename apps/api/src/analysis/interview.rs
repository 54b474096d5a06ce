//! Interview preparation questions for a role.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::analysis::prompts::INTERVIEW_PROMPT_TEMPLATE;
use crate::llm_client::prompts::finish_prompt;
use crate::llm_client::{complete_json, CompletionRequest, LlmError, TextCompletion};
use crate::models::lenient::opt_string;

pub const QUESTION_COUNT: usize = 15;
/// Reasoning tokens granted to the model for question generation.
pub const INTERVIEW_THINKING_BUDGET: u32 = 8192;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterviewQuestion {
    #[serde(deserialize_with = "opt_string")]
    pub question: Option<String>,
    /// "Technical", "System Design" or "Behavioral".
    #[serde(rename = "type", deserialize_with = "opt_string")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub context: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub answer: Option<String>,
}

/// Accepts a bare array or an array wrapped as `{"questions": [...]}`.
/// Elements that do not decode are dropped.
fn questions_from_reply(reply: Value) -> Vec<InterviewQuestion> {
    let items = match reply {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("questions") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}

pub fn build_interview_prompt(role: &str) -> String {
    finish_prompt(
        &INTERVIEW_PROMPT_TEMPLATE
            .replace("{count}", &QUESTION_COUNT.to_string())
            .replace("{role}", role),
    )
}

/// Generates interview questions with an extended thinking budget.
pub async fn generate_interview_questions(
    llm: &dyn TextCompletion,
    role: &str,
) -> Result<Vec<InterviewQuestion>, LlmError> {
    let request = CompletionRequest::new(build_interview_prompt(role))
        .with_thinking_budget(INTERVIEW_THINKING_BUDGET);
    let (reply, _) = complete_json::<Value>(llm, &request, "[]").await?;
    let questions = questions_from_reply(reply);
    info!("Generated {} interview questions for '{}'", questions.len(), role);
    Ok(questions)
}
