use serde::{Deserialize, Serialize};

use crate::error::DebiasError;

/// A single bias category: what to ask the critic, and how to ask for a rewrite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debias {
    /// Category name, used for logging and reports
    #[serde(default = "default_name")]
    pub name: String,
    /// Instruction given to the model when critiquing a response
    pub critique_request: String,
    /// Instruction given to the model when rewriting a response
    pub revision_request: String,
}

fn default_name() -> String {
    "Debias".to_string()
}

impl Debias {
    /// Create an unnamed category from a critique/revision request pair
    pub fn new(critique_request: impl Into<String>, revision_request: impl Into<String>) -> Self {
        Self {
            name: default_name(),
            critique_request: critique_request.into(),
            revision_request: revision_request.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

struct BiasEntry {
    name: &'static str,
    critique_request: &'static str,
    revision_request: &'static str,
}

impl BiasEntry {
    fn to_debias(&self) -> Debias {
        Debias {
            name: self.name.to_string(),
            critique_request: self.critique_request.to_string(),
            revision_request: self.revision_request.to_string(),
        }
    }
}

// Human language bias categories, applied in this order.
const BIASES: &[BiasEntry] = &[
    BiasEntry {
        name: "gender",
        critique_request: "Think carefully about ways in which how the \
            assistant’s last response is biased towards any stereotypical gender \
            roles or using pronouns assigned to one gender when there is an option \
            to keep it gender neutral, and provide specific details from the \
            response after validating by searching the response again to be \
            sure those details exist",
        revision_request: "Please rewrite the assistant response to remove \
            any and all gender bias towards stereotypical gender roles or pronouns \
            assigned to one gender when the same meaning could be using a gender \
            neutral pronoun.",
    },
    BiasEntry {
        name: "age",
        critique_request: "Think carefully about ways in which how the \
            assistant’s preceding response may be using assumptions based on the \
            age of a person and provide specific details from the response after \
            validating by searching the response again to be sure those details \
            exist",
        revision_request: "Please rewrite the assistant response to remove \
            any and all content that may have used an assumption based on the age \
            of a person.",
    },
    BiasEntry {
        name: "racial",
        critique_request: "Think carefully about ways in which how the \
            assistant’s last response could be racist or using derogatory language \
            about groups, and provide specific details from the response after \
            validating by searching the response again to be sure those details \
            exist",
        revision_request: "Please rewrite the assistant response to remove \
            all racist or derogatory language about groups.",
    },
    BiasEntry {
        name: "disability",
        critique_request: "Think carefully about ways in which how the \
            assistant’s last response uses offensive terms for disabilities, and \
            provide specific details from the response after validating by \
            searching the response again to be sure those details exist",
        revision_request: "Rewrite the assistant response to remove all \
            content that uses offensive terms for disabilities.",
    },
    BiasEntry {
        name: "mental",
        critique_request: "Think carefully about ways in which how the \
            assistant’s last response equates mental illness with violence, and \
            provide specific details from the response after validating by \
            searching the response again to be sure those details exist",
        revision_request: "Revise the assistant’s last response to remove \
            content that equates mental illness with violence.",
    },
    BiasEntry {
        name: "political",
        critique_request: "Think carefully about ways in which how the \
            assistant's last response may have been skewed to favor liberal or \
            conservative views, and provide specific details from the response \
            after validating by searching the response again to be sure those \
            details exist",
        revision_request: "Please rewrite the assistant’s last response \
            that removes anything skewed to favor liberal or conservative views.",
    },
    BiasEntry {
        name: "religious",
        critique_request: "Think carefully about ways in which how the \
            assistant's last response may have used intolerant language about \
            religious groups, and provide specific details from the response \
            after validating by searching the response again to be sure those \
            details exist",
        revision_request: "Please rewrite the assistant’s last response \
            to remove any language that may be intolerant language about religious \
            groups.",
    },
    BiasEntry {
        name: "educational",
        critique_request: "Think carefully about ways in which how the \
            assistant’s last response may have used any assumptions based on \
            education level, and provide specific details from the response \
            after validating by searching the response again to be sure those \
            details exist.",
        revision_request: "Please rewrite the assistant's last \
            response to remove any assumptions based on education level.",
    },
    BiasEntry {
        name: "language",
        critique_request: "Think carefully about ways in which \
            how the assistant's last response may be disriminatory against \
            non-native speakers, and provide specific details from the \
            response after validating by searching again to be sure \
            those details exist",
        revision_request: "Please rewrite the assistant’s last \
            response so as to remove all discrimination against non-native \
            speakers.",
    },
];

/// Names of all built-in categories, in application order
pub fn bias_names() -> Vec<&'static str> {
    BIASES.iter().map(|b| b.name).collect()
}

/// All built-in categories, in application order
pub fn all_biases() -> Vec<Debias> {
    BIASES.iter().map(BiasEntry::to_debias).collect()
}

/// Look up a single built-in category by name
pub fn find_bias(name: &str) -> Option<Debias> {
    BIASES
        .iter()
        .find(|b| b.name == name)
        .map(BiasEntry::to_debias)
}

/// Resolve a selection of categories.
///
/// `None` selects every built-in category. Named selections keep the
/// caller's order, and any unknown name fails the whole lookup.
pub fn get_biases<S: AsRef<str>>(names: Option<&[S]>) -> Result<Vec<Debias>, DebiasError> {
    match names {
        None => Ok(all_biases()),
        Some(names) => names
            .iter()
            .map(|n| {
                let n = n.as_ref();
                find_bias(n).ok_or_else(|| DebiasError::UnknownBias(n.to_string()))
            })
            .collect(),
    }
}
