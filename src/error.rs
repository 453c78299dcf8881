//! Error types for the eventual promise primitive

use thiserror::Error;

/// The opaque failure value carried through a promise chain.
///
/// The core never interprets error content: producers choose what failure to
/// report, and consumers observe it through [`on_error`](crate::Promise::on_error)
/// handlers. A rejection short-circuits every `then` stage until an `on_error`
/// or `finally` stage absorbs it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromiseError {
    /// A producer-supplied failure.
    #[error("{0}")]
    Failed(String),

    /// Every input of [`Promise::any`](crate::Promise::any) rejected; carries
    /// the individual rejection reasons in input order.
    #[error("all promises were rejected")]
    Aggregate(Vec<PromiseError>),
}

impl PromiseError {
    /// Create a failure from a message.
    pub fn failed(message: impl Into<String>) -> Self {
        PromiseError::Failed(message.into())
    }
}

impl From<&str> for PromiseError {
    fn from(message: &str) -> Self {
        PromiseError::Failed(message.to_string())
    }
}

impl From<String> for PromiseError {
    fn from(message: String) -> Self {
        PromiseError::Failed(message)
    }
}

/// Result type alias for eventual
pub type Result<T> = std::result::Result<T, PromiseError>;
