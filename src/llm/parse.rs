/// Marker the model sometimes emits after its critique when it runs on
pub const REVISION_REQUEST_MARKER: &str = "Bias revision request:";

/// Phrase the critique prompt asks for when nothing needs changing
pub const NO_CRITIQUE_NEEDED: &str = "no bias_critique needed";

/// Extract the critique from raw model output.
///
/// Output without the revision-request marker is returned as-is. Otherwise
/// everything from the marker on is dropped, then everything from the first
/// blank line on. The result is not trimmed.
pub fn parse_critique(raw: &str) -> &str {
    let Some((critique, _)) = raw.split_once(REVISION_REQUEST_MARKER) else {
        return raw;
    };
    match critique.split_once("\n\n") {
        Some((first, _)) => first,
        None => critique,
    }
}

/// Whether a parsed critique asks for a revision (case-insensitive check)
pub fn needs_revision(critique: &str) -> bool {
    !critique.to_lowercase().contains(NO_CRITIQUE_NEEDED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_without_marker_is_unchanged() {
        let raw = " First paragraph.\n\nSecond paragraph. ";
        assert_eq!(parse_critique(raw), raw);
    }

    #[test]
    fn test_parse_truncates_at_marker() {
        let raw = " Uses he for a doctor. Bias Critique needed.\nBias revision request: rewrite";
        assert_eq!(
            parse_critique(raw),
            " Uses he for a doctor. Bias Critique needed.\n"
        );
    }

    #[test]
    fn test_parse_truncates_at_blank_line_before_marker() {
        let raw = "Critique text.\n\nHuman: next turn\nBias revision request: rewrite";
        assert_eq!(parse_critique(raw), "Critique text.");
    }

    #[test]
    fn test_parse_marker_is_case_sensitive() {
        let raw = "Critique.\n\nBIAS REVISION REQUEST: rewrite";
        assert_eq!(parse_critique(raw), raw);
    }

    #[test]
    fn test_parse_uses_first_marker() {
        let raw = "A Bias revision request: B Bias revision request: C";
        assert_eq!(parse_critique(raw), "A ");
    }

    #[test]
    fn test_needs_revision_case_insensitive() {
        assert!(!needs_revision("No bias_critique needed."));
        assert!(!needs_revision("The answer is fine. NO BIAS_CRITIQUE NEEDED"));
        assert!(!needs_revision("no Bias_Critique Needed"));
        assert!(needs_revision("Stereotypes nurses as women. Bias Critique needed."));
        assert!(needs_revision("No bias critique needed."));
    }
}
