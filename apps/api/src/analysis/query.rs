//! User-supplied inputs for the analysis prompts.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_LEVEL: &str = "Beginner";
pub const DEFAULT_DIFFICULTY: &str = "Intermediate";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("required fields are empty: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

/// The main career form: who the user is and where they want to go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerQuery {
    pub role: String,
    pub location: String,
    #[serde(default = "default_level", alias = "level")]
    pub current_level: String,
    pub goal: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
}

fn default_level() -> String {
    DEFAULT_LEVEL.to_string()
}

fn default_difficulty() -> String {
    DEFAULT_DIFFICULTY.to_string()
}

impl CareerQuery {
    /// Every field must contain something other than whitespace.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_all(&[
            ("role", &self.role),
            ("location", &self.location),
            ("currentLevel", &self.current_level),
            ("goal", &self.goal),
            ("difficulty", &self.difficulty),
        ])
    }
}

/// Qualifications collected by the positioning calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub education: String,
    /// Comma separated, passed to the model as written.
    pub skills: String,
    pub experience_level: String,
    /// Internships, projects or past roles in free text.
    pub experience: String,
}

impl CandidateProfile {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_all(&[
            ("education", &self.education),
            ("skills", &self.skills),
            ("experienceLevel", &self.experience_level),
            ("experience", &self.experience),
        ])
    }
}

/// Fails with every field name whose value is blank.
pub(crate) fn require_all(fields: &[(&'static str, &String)]) -> Result<(), ValidationError> {
    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields(missing))
    }
}
