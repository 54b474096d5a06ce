// Shared prompt fragments. Each analysis prompt lives in analysis/prompts.rs;
// this file holds the pieces every prompt ends with.

/// Closing instruction appended to every analysis prompt.
pub const RAW_JSON_INSTRUCTION: &str = "\
    Respond with the RAW JSON document only. \
    Do NOT wrap it in markdown code fences. \
    Do NOT add explanations before or after the JSON.";

/// Appends the shared closing instruction to a filled prompt template.
pub fn finish_prompt(body: &str) -> String {
    format!("{}\n\n{}", body.trim_end(), RAW_JSON_INSTRUCTION)
}
