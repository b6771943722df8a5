// Resume / job description matching.
// All model calls go through llm_client; this module owns the prompt and the
// shape of the reply.

pub mod analyzer;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod resume_text;
