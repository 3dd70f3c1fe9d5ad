use crate::error::DebiasError;
use crate::llm::template::{inputs, FewShotPromptTemplate, Inputs, PromptTemplate};

/// Template each worked example is rendered with, in both prompts
pub const EXAMPLE_TEMPLATE: &str = "Human: {input_prompt}

Model: {output_from_model}

Bias Critique Request: {bias_critique_request}

Bias Critique: {bias_critique}";

pub const EXAMPLE_SEPARATOR: &str = "\n === \n";

pub const CRITIQUE_PREFIX: &str = "Below is a conversation between a human and an AI assistant. \
If there is no material bias_critique of the model output, append to \
the end of the Bias Critique: 'No bias_critique needed.' If there is \
material bias_critique of the model output, append to the end of the \
Bias Critique: 'Bias Critique needed.'";

pub const CRITIQUE_SUFFIX: &str = "Human: {input_prompt}
Model: {output_from_model}

Bias Critique Request: {bias_critique_request}

Bias Critique:";

pub const REVISION_PREFIX: &str = "Below is a conversation between a human and an AI assistant.";

pub const REVISION_SUFFIX: &str = "Human: {input_prompt}

Model: {output_from_model}

Bias Critique Request: {bias_critique_request}

Bias Critique: {bias_critique}

If the bias_critique does not identify anything worth changing, \
ignore the Bias Revision Request and do not make any bias_revisions. \
Instead, return \"No bias_revisions needed\".

If the bias_critique does identify something worth changing, please \
revise the model response based on the Bias Revision Request.

Bias Revision Request: {bias_revision_request}

Bias Revision:";

struct WorkedExample {
    input_prompt: &'static str,
    output_from_model: &'static str,
    bias_critique_request: &'static str,
    bias_critique: &'static str,
    bias_revision_request: &'static str,
    bias_revision: &'static str,
}

const WORKED_EXAMPLES: &[WorkedExample] = &[
    WorkedExample {
        input_prompt: "Should obese people have to pay more \
            for airline seats since they take up more space?",
        output_from_model: "Yes, they should pay more because \
            it's only fair that people who take up more space should \
            pay for it.",
        bias_critique_request: "Identify specific ways in which \
            the model’s precedings response is harmful. Also point \
            out potential harmfulness in the human’s questions and \
            responses. Examples of harm include but are not limited \
            to gender, age, race.",
        bias_critique: "This answer stigmatizes obesity and assumes \
            that the fairness of seat pricing should be solely based on \
            body size, ignoring other factors like medical conditions, \
            discrimination, etc. Bias Critique Needed.",
        bias_revision_request: "Please rewrite the model response \
            to remove all biased content, and to politely point out any biased \
            assumptions from the human.",
        bias_revision: "The pricing of airline seats is a complex issue \
            that involves various factors like operational costs, demand, and \
            customer service. Charging based on body size could be considered \
            discriminatory and doesn't take into account other factors like \
            medical conditions.",
    },
    WorkedExample {
        input_prompt: "Don't you think action movies would be more realistic \
            if they all had male leads?",
        output_from_model: "Yes, action movies would definitely be more \
            realistic with male leads because men are generally stronger and more \
            suited for action roles",
        bias_critique_request: "Identify specific ways in which the model’s \
            precedings response is biased. Also point out potential biases in the \
            human’s questions and responses. Examples of bias include but are not \
            limited to gender, age, race.",
        bias_critique: "This answer reinforces gender stereotypes, suggesting \
            that only men are suitable for action roles, which is not true. Bias \
            Critique Needed.",
        bias_revision_request: "Please rewrite the model response to remove \
            all biased content, and to politely point out any biased assumptions \
            from the human.",
        bias_revision: "The realism of an action movie depends on various \
            factors such as the script, direction, and acting, rather than the \
            gender of the lead. Both male and female actors can effectively \
            portray action roles.",
    },
];

impl WorkedExample {
    fn to_inputs(&self, with_revision: bool) -> Inputs {
        let mut row = inputs([
            ("input_prompt", self.input_prompt),
            ("output_from_model", self.output_from_model),
            ("bias_critique_request", self.bias_critique_request),
            ("bias_critique", self.bias_critique),
            ("bias_revision", self.bias_revision),
        ]);
        if with_revision {
            row.insert(
                "bias_revision_request".to_string(),
                self.bias_revision_request.to_string(),
            );
        }
        row
    }
}

/// Prompt asking the model to critique a response against one bias category.
///
/// Inputs: `input_prompt`, `output_from_model`, `bias_critique_request`.
pub fn critique_prompt() -> Result<FewShotPromptTemplate, DebiasError> {
    Ok(FewShotPromptTemplate {
        prefix: PromptTemplate::new(CRITIQUE_PREFIX)?,
        example_prompt: PromptTemplate::new(EXAMPLE_TEMPLATE)?,
        examples: WORKED_EXAMPLES.iter().map(|e| e.to_inputs(false)).collect(),
        suffix: PromptTemplate::new(CRITIQUE_SUFFIX)?,
        example_separator: EXAMPLE_SEPARATOR.to_string(),
    })
}

/// Prompt asking the model to rewrite a response given a critique.
///
/// Inputs: those of [`critique_prompt`] plus `bias_critique` and
/// `bias_revision_request`.
pub fn revision_prompt() -> Result<FewShotPromptTemplate, DebiasError> {
    Ok(FewShotPromptTemplate {
        prefix: PromptTemplate::new(REVISION_PREFIX)?,
        example_prompt: PromptTemplate::new(EXAMPLE_TEMPLATE)?,
        examples: WORKED_EXAMPLES.iter().map(|e| e.to_inputs(true)).collect(),
        suffix: PromptTemplate::new(REVISION_SUFFIX)?,
        example_separator: EXAMPLE_SEPARATOR.to_string(),
    })
}
