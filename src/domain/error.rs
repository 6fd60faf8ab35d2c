// Section render failures - none of these abort the dashboard
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("no artifact matching '{pattern}' found")]
    NotFound { pattern: String },

    #[error("failed to parse {artifact}: {message}")]
    ParseFailure { artifact: String, message: String },

    #[error("column '{column}' not found in {artifact}")]
    SchemaMismatch { artifact: String, column: String },

    #[error("{artifact} holds data for {found:?}, expected {expected}")]
    StaleData {
        artifact: String,
        found: Option<NaiveDate>,
        expected: NaiveDate,
    },
}

impl RenderError {
    pub fn parse_failure(artifact: impl Into<String>, message: impl ToString) -> Self {
        Self::ParseFailure {
            artifact: artifact.into(),
            message: message.to_string(),
        }
    }
}
