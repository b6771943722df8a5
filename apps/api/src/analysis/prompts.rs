// Prompt for resume / job description matching.
// The instruction pins the exact JSON shape that `AnalyzeResponse` decodes.

use crate::llm_client::Prompt;

pub const ANALYZE_SYSTEM: &str = "\
You are an ATS resume analyzer.

Return ONLY valid JSON in this EXACT format:
{
  \"match_score\": number (0-100),
  \"missing_skills\": [string],
  \"summary\": string
}";

/// Appends the resume and job description verbatim after the instruction.
pub fn build_analyze_prompt(resume: &str, job_description: &str) -> Prompt {
    Prompt::new(
        ANALYZE_SYSTEM,
        format!("Resume:\n{resume}\n\nJob Description:\n{job_description}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_inputs_verbatim() {
        let prompt = build_analyze_prompt("10 years of Rust", "Senior Go engineer");
        let rendered = prompt.render();
        assert!(rendered.starts_with("You are an ATS resume analyzer."));
        assert!(rendered.contains("\"missing_skills\": [string]"));
        assert!(rendered.ends_with("Resume:\n10 years of Rust\n\nJob Description:\nSenior Go engineer"));
    }

    #[test]
    fn test_prompt_accepts_empty_inputs() {
        let prompt = build_analyze_prompt("", "");
        assert_eq!(prompt.system, ANALYZE_SYSTEM);
        assert_eq!(prompt.user, "Resume:\n\n\nJob Description:\n");
    }
}
