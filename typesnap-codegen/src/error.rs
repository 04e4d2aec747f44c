//! Error types for snapshot generation.

use thiserror::Error;

/// Error type for snapshot generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Universe parsing error.
    #[error("universe parse error: {0}")]
    Parse(#[from] typesnap_schema::ParseError),

    /// Universe validation or lowering error.
    #[error("universe error: {0}")]
    Schema(#[from] typesnap_schema::SchemaError),

    /// Root resolution or definition error.
    #[error("input error: {0}")]
    Input(#[from] typesnap_core::InputError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The assembled document failed the syntax check.
    #[error("generated snapshot is not valid Go: {message}")]
    Syntax {
        /// Error message.
        message: String,
        /// The offending document.
        text: String,
    },
}

impl CodegenError {
    /// Creates a syntax error for the given document.
    pub fn syntax(message: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Syntax {
            message: message.into(),
            text: text.into(),
        }
    }
}
