//! Lambda error types.

use thiserror::Error;

/// Result type for Lambda operations.
pub type Result<T> = std::result::Result<T, LambdaError>;

#[derive(Debug, Error)]
pub enum LambdaError {
    /// The invocation produced an error outcome for a non-HTTP trigger.
    #[error("Application error: {0}")]
    Application(String),

    /// The raw event could not be turned into a request.
    #[error("Unrecognized event: {0}")]
    Event(String),

    #[error("Response conversion error: {0}")]
    Response(String),

    #[error("Lambda runtime error: {0}")]
    Runtime(String),
}

impl From<lambda_runtime::Error> for LambdaError {
    fn from(err: lambda_runtime::Error) -> Self {
        Self::Runtime(err.to_string())
    }
}

impl From<serde_json::Error> for LambdaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Response(err.to_string())
    }
}
