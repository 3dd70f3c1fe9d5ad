use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::llm::{Inputs, LanguageModel, PromptTemplate};

/// A prompt template bound to a model
#[derive(Clone)]
pub struct QueryChain {
    pub prompt: PromptTemplate,
    model: Arc<dyn LanguageModel>,
}

impl QueryChain {
    pub fn new(model: Arc<dyn LanguageModel>, prompt: PromptTemplate) -> Self {
        Self { prompt, model }
    }

    pub fn input_keys(&self) -> &[String] {
        self.prompt.input_variables()
    }

    /// Render the prompt without calling the model
    pub fn prompt_text(&self, inputs: &Inputs) -> Result<String> {
        Ok(self.prompt.format(inputs)?)
    }

    pub async fn run(&self, inputs: &Inputs) -> Result<String> {
        let prompt = self.prompt_text(inputs)?;
        debug!(model = self.model.name(), "query prompt:\n{}", prompt);
        self.model.complete(&prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::testing::ScriptedModel;
    use crate::llm::inputs;

    #[tokio::test]
    async fn test_run_renders_and_calls_model() {
        let model = Arc::new(ScriptedModel::new(["Forty-two."]));
        let chain = QueryChain::new(model.clone(), PromptTemplate::new("Q: {question} A:").unwrap());

        assert_eq!(chain.input_keys(), &["question".to_string()]);

        let answer = chain
            .run(&inputs([("question", "What is the answer?")]))
            .await
            .unwrap();
        assert_eq!(answer, "Forty-two.");
        assert_eq!(model.prompts(), vec!["Q: What is the answer? A:".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_input_fails_before_model_call() {
        let model = Arc::new(ScriptedModel::new(["unused"]));
        let chain = QueryChain::new(model.clone(), PromptTemplate::new("Q: {question} A:").unwrap());

        let err = chain.run(&Inputs::new()).await.unwrap_err();
        assert!(err.to_string().contains("question"));
        assert!(model.prompts().is_empty());
    }
}
