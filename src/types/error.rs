use anyhow::Error;
use thiserror::Error;

/// Application-level error types for artifact-sweep.
///
/// ## Exit Codes
///
/// Each variant maps to an exit code (via `exit_code()`):
/// - 1: Runtime failures (Api, Io)
/// - 2: Invalid configuration or input (InvalidConfig, InvalidRegex, InvalidRecord)
#[derive(Error, Debug, PartialEq)]
pub enum SweepError {
    /// Azure DevOps REST API call failed (transport error or non-success status).
    #[error("Azure DevOps API error: {0}")]
    Api(String),

    /// Configuration error.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid regex pattern.
    #[error("Invalid regex pattern: {0}")]
    InvalidRegex(String),

    /// A row of the deletion input failed validation.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// I/O error, including a closed prompt input.
    #[error("I/O error: {0}")]
    Io(String),
}

impl SweepError {
    pub fn exit_code(&self) -> i32 {
        match self {
            SweepError::InvalidConfig(_)
            | SweepError::InvalidRegex(_)
            | SweepError::InvalidRecord(_) => 2,
            _ => 1,
        }
    }
}

/// Extract the exit code from an anyhow::Error, defaulting to 1.
pub fn exit_code_from_error(e: &Error) -> i32 {
    if let Some(err) = e.downcast_ref::<SweepError>() {
        return err.exit_code();
    }
    1
}
