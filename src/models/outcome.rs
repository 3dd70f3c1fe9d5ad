use serde::{Deserialize, Serialize};

/// One category's pass over the current response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CritiqueRevision {
    /// Name of the bias category this pass applied
    pub bias: String,
    /// Parsed critique text
    pub critique: String,
    /// Rewritten response, or empty when the critique asked for no change
    pub revision: String,
    /// Whether a revision was requested and adopted, even if it came back empty
    #[serde(default)]
    pub revised: bool,
}

impl CritiqueRevision {
    pub fn skipped(bias: &str, critique: String) -> Self {
        Self {
            bias: bias.to_string(),
            critique,
            revision: String::new(),
            revised: false,
        }
    }

    pub fn revised(bias: &str, critique: String, revision: String) -> Self {
        Self {
            bias: bias.to_string(),
            critique,
            revision,
            revised: true,
        }
    }

    pub fn was_revised(&self) -> bool {
        self.revised
    }
}

/// Result of running the debias chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebiasOutput {
    /// Final response after every category has been applied
    pub output: String,
    /// Response from the wrapped chain, before any revision
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_output: Option<String>,
    /// Per-category critiques and revisions, in application order
    #[serde(
        default,
        rename = "bias_critiques_and_revisions",
        skip_serializing_if = "Option::is_none"
    )]
    pub critiques_and_revisions: Option<Vec<CritiqueRevision>>,
}

impl DebiasOutput {
    /// Number of categories that produced a revision
    pub fn revision_count(&self) -> usize {
        self.critiques_and_revisions
            .as_ref()
            .map(|steps| steps.iter().filter(|s| s.was_revised()).count())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_without_intermediate_steps_serializes_output_only() {
        let output = DebiasOutput {
            output: "final".to_string(),
            initial_output: None,
            critiques_and_revisions: None,
        };
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json, serde_json::json!({ "output": "final" }));
    }

    #[test]
    fn test_revision_count() {
        let output = DebiasOutput {
            output: "b".to_string(),
            initial_output: Some("a".to_string()),
            critiques_and_revisions: Some(vec![
                CritiqueRevision::skipped("gender", "No bias_critique needed.".to_string()),
                CritiqueRevision::revised("age", "Ageist.".to_string(), "b".to_string()),
            ]),
        };
        assert_eq!(output.revision_count(), 1);

        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["bias_critiques_and_revisions"][0]["revision"], "");
        assert_eq!(json["bias_critiques_and_revisions"][0]["revised"], false);
    }

    #[test]
    fn test_empty_revision_still_counts() {
        let step = CritiqueRevision::revised("gender", "Biased.".to_string(), String::new());
        assert!(step.was_revised());

        let output = DebiasOutput {
            output: String::new(),
            initial_output: Some("biased answer".to_string()),
            critiques_and_revisions: Some(vec![step]),
        };
        assert_eq!(output.revision_count(), 1);
    }
}
