use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::chain::QueryChain;
use crate::llm::{
    critique_prompt, inputs, needs_revision, parse_critique, revision_prompt,
    FewShotPromptTemplate, Inputs, LanguageModel,
};
use crate::models::{CritiqueRevision, Debias, DebiasOutput};

/// Runs a query chain, then critiques and revises its answer once per
/// bias category.
///
/// Categories are applied in order; each one sees the response produced by
/// the previous one.
pub struct DebiasChain {
    chain: QueryChain,
    debiases: Vec<Debias>,
    model: Arc<dyn LanguageModel>,
    critique_prompt: FewShotPromptTemplate,
    revision_prompt: FewShotPromptTemplate,
    return_intermediate_steps: bool,
}

impl DebiasChain {
    /// Build with the default critique and revision prompts
    pub fn from_model(
        model: Arc<dyn LanguageModel>,
        chain: QueryChain,
        debiases: Vec<Debias>,
    ) -> Result<Self> {
        Ok(Self {
            chain,
            debiases,
            model,
            critique_prompt: critique_prompt()?,
            revision_prompt: revision_prompt()?,
            return_intermediate_steps: false,
        })
    }

    pub fn with_critique_prompt(mut self, prompt: FewShotPromptTemplate) -> Self {
        self.critique_prompt = prompt;
        self
    }

    pub fn with_revision_prompt(mut self, prompt: FewShotPromptTemplate) -> Self {
        self.revision_prompt = prompt;
        self
    }

    /// Also return the initial response and every critique/revision pair
    pub fn with_intermediate_steps(mut self, enabled: bool) -> Self {
        self.return_intermediate_steps = enabled;
        self
    }

    pub fn debiases(&self) -> &[Debias] {
        &self.debiases
    }

    pub fn input_keys(&self) -> &[String] {
        self.chain.input_keys()
    }

    pub fn output_keys(&self) -> Vec<&'static str> {
        if self.return_intermediate_steps {
            vec!["output", "bias_critiques_and_revisions", "initial_output"]
        } else {
            vec!["output"]
        }
    }

    /// Run the wrapped chain and every bias pass. Model errors abort the run.
    pub async fn run(&self, inputs: &Inputs) -> Result<DebiasOutput> {
        let input_prompt = self.chain.prompt_text(inputs)?;
        let mut response = self
            .chain
            .run(inputs)
            .await
            .context("Initial query failed")?;
        let initial_response = response.clone();

        info!("Initial response: {}", response);

        let mut steps = Vec::with_capacity(self.debiases.len());
        for debias in &self.debiases {
            let step = self
                .apply(debias, &input_prompt, &response)
                .await
                .with_context(|| format!("Bias pass '{}' failed", debias.name))?;

            if step.was_revised() {
                response = step.revision.clone();
            }
            steps.push(step);
        }

        let revised = steps.iter().filter(|s| s.was_revised()).count();
        info!(
            "Debias complete: {} of {} categories revised the response",
            revised,
            steps.len()
        );

        Ok(if self.return_intermediate_steps {
            DebiasOutput {
                output: response,
                initial_output: Some(initial_response),
                critiques_and_revisions: Some(steps),
            }
        } else {
            DebiasOutput {
                output: response,
                initial_output: None,
                critiques_and_revisions: None,
            }
        })
    }

    /// Critique `response` for one category, revising it if the critique asks
    async fn apply(
        &self,
        debias: &Debias,
        input_prompt: &str,
        response: &str,
    ) -> Result<CritiqueRevision> {
        let mut values = inputs([
            ("input_prompt", input_prompt),
            ("output_from_model", response),
            ("bias_critique_request", debias.critique_request.as_str()),
        ]);

        let prompt = self.critique_prompt.format(&values)?;
        debug!(bias = %debias.name, "critique prompt:\n{}", prompt);
        let raw_critique = self.model.complete(&prompt).await?;
        let critique = parse_critique(&raw_critique).trim().to_string();

        if !needs_revision(&critique) {
            debug!(bias = %debias.name, "no critique needed: {}", critique);
            return Ok(CritiqueRevision::skipped(&debias.name, critique));
        }

        values.insert("bias_critique".to_string(), critique.clone());
        values.insert(
            "bias_revision_request".to_string(),
            debias.revision_request.clone(),
        );

        let prompt = self.revision_prompt.format(&values)?;
        debug!(bias = %debias.name, "revision prompt:\n{}", prompt);
        let revision = self.model.complete(&prompt).await?.trim().to_string();

        info!("Applying {}...", debias.name);
        info!("Critique: {}", critique);
        info!("Updated response: {}", revision);

        Ok(CritiqueRevision::revised(&debias.name, critique, revision))
    }
}
