use crate::status::AuthorizationState;

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("status {text:?} does not match any known authorization label")]
    UnrecognisedStatus { text: String },
    #[error("{field}: no value found")]
    FieldNotFound { field: &'static str },
    #[error("{field}: line {index} is missing from the document")]
    MissingLine { field: &'static str, index: usize },
    #[error("{field}: line {index} has no token at position {token}")]
    MissingToken {
        field: &'static str,
        index: usize,
        token: usize,
    },
    #[error("{field}: no extraction rule for {status} documents")]
    UnsupportedStatus {
        field: &'static str,
        status: AuthorizationState,
    },
    #[error("{field}: no line containing {anchor:?} at or after line {from}")]
    MissingAnchor {
        field: &'static str,
        anchor: &'static str,
        from: usize,
    },
    #[error("{field}: line {line} has no value after {delimiter:?}")]
    MalformedLine {
        field: &'static str,
        line: usize,
        delimiter: char,
    },
    #[error("invalid status: '{value}'. Must match one of {accepted:?}")]
    InvalidStatus {
        value: String,
        accepted: Vec<String>,
    },
    #[error("invalid procedure code: {0}")]
    InvalidCode(#[from] referral_types::TextError),
    #[error("no operator mapping for user '{0}'")]
    UnknownOperator(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to read config file: {0}")]
    ConfigRead(std::io::Error),
    #[error("config schema mismatch at {path}: {source}")]
    ConfigSchema {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

pub type IntakeResult<T> = std::result::Result<T, IntakeError>;
