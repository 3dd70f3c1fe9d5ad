pub mod chain;
pub mod error;
pub mod io;
pub mod llm;
pub mod models;

pub use chain::{DebiasChain, QueryChain};
pub use error::DebiasError;
pub use io::{DebiasReport, HumanReport};
pub use llm::{
    AnthropicClient, AnthropicConfig, FewShotPromptTemplate, Inputs, LanguageModel,
    PromptTemplate,
};
pub use models::{all_biases, bias_names, get_biases, CritiqueRevision, Debias, DebiasOutput};
