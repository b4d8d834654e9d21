//! Domain error type.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value object could not be read from its text form.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
