use thiserror::Error;

/// Typed errors raised by the library before any model call is made
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DebiasError {
    #[error("unknown bias category '{0}' (known: {known})", known = crate::models::bias_names().join(", "))]
    UnknownBias(String),

    #[error("missing value for template variable '{0}'")]
    MissingVariable(String),

    #[error("malformed template at byte {position}: {reason}")]
    MalformedTemplate { position: usize, reason: &'static str },

    #[error("invalid input '{0}', expected key=value")]
    InvalidInput(String),
}
