use serde::{Deserialize, Serialize};

/// Input to one analysis. Lives only for the duration of the request.
/// Absent fields decode as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzeRequest {
    pub resume: String,
    pub job_description: String,
}

/// Structured verdict decoded from the model's reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    /// Expected in 0..=100; the model is asked for that range but it is not enforced.
    pub match_score: i64,
    pub missing_skills: Vec<String>,
    pub summary: String,
}
