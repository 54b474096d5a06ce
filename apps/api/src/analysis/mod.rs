pub mod display;
pub mod handlers;
pub mod insights;
pub mod interview;
pub mod positioning;
pub mod prompts;
pub mod query;
pub mod roadmap;
