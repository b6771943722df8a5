use crate::errors::AnalyzeError;

/// Returns the span from the first `{` to the last `}` inclusive.
///
/// Models often wrap their JSON in prose or markdown fences; this recovers the
/// object without checking that it is valid JSON. Decoding happens later.
pub fn extract_json(text: &str) -> Result<&str, AnalyzeError> {
    let start = text.find('{').ok_or(AnalyzeError::Extraction)?;
    let end = text.rfind('}').ok_or(AnalyzeError::Extraction)?;
    if end <= start {
        return Err(AnalyzeError::Extraction);
    }
    Ok(&text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_object_wrapped_in_prose() {
        let input = r#"Sure! {"match_score":80,"missing_skills":["Go"],"summary":"ok"} Thanks."#;
        assert_eq!(
            extract_json(input).unwrap(),
            r#"{"match_score":80,"missing_skills":["Go"],"summary":"ok"}"#
        );
    }

    #[test]
    fn test_extracts_object_from_code_fence() {
        let input = "```json\n{\"summary\": \"fine\"}\n```";
        assert_eq!(extract_json(input).unwrap(), "{\"summary\": \"fine\"}");
    }

    #[test]
    fn test_bare_object_is_returned_whole() {
        let input = r#"{"a": {"b": 1}}"#;
        assert_eq!(extract_json(input).unwrap(), input);
    }

    #[test]
    fn test_no_braces_fails() {
        assert!(matches!(
            extract_json("no braces here"),
            Err(AnalyzeError::Extraction)
        ));
    }

    #[test]
    fn test_missing_closing_brace_fails() {
        assert!(matches!(
            extract_json(r#"{"match_score": 80"#),
            Err(AnalyzeError::Extraction)
        ));
    }

    #[test]
    fn test_missing_opening_brace_fails() {
        assert!(extract_json("match_score: 80 }").is_err());
    }

    #[test]
    fn test_closing_before_opening_fails() {
        assert!(extract_json("} then {").is_err());
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(extract_json("").is_err());
    }

    #[test]
    fn test_span_is_not_validated() {
        assert_eq!(extract_json("x {not json} y").unwrap(), "{not json}");
    }
}
