//! Domain errors for the Themis agent.

use thiserror::Error;

use super::models::session::{AgentStep, NextAction};

/// Errors raised by an evidence store adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Evidence store unreachable: {0}")]
    Unreachable(String),

    #[error("Evidence store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Query embedding failed: {0}")]
    Embedding(String),

    #[error("Malformed evidence store response: {0}")]
    Malformed(String),

    #[error("Failed to load fragments: {0}")]
    Load(String),
}

/// Errors raised by a reasoning oracle adapter.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Oracle unreachable: {0}")]
    Unreachable(String),

    #[error("Oracle returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed oracle response: {0}")]
    Malformed(String),

    #[error("Oracle has no response for this prompt")]
    NoResponse,
}

impl OracleError {
    /// Whether a retry has a chance of succeeding.
    ///
    /// Network failures, 429 and 5xx responses are transient; everything
    /// else is a permanent failure for this request.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unreachable(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Malformed(_) | Self::NoResponse => false,
        }
    }
}

/// Violations of the session state invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Final answer already written for this session")]
    AnswerAlreadyWritten,
}

/// Errors surfaced to callers of the agent entry point.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Retrieval unavailable: {0}")]
    RetrievalUnavailable(#[source] StoreError),

    #[error("Query must not be empty")]
    EmptyQuery,

    #[error("Session cancelled before {0}")]
    Cancelled(AgentStep),

    #[error("No transition from {from} on action {action:?}")]
    InvalidTransition {
        from: AgentStep,
        action: Option<NextAction>,
    },

    #[error(transparent)]
    Session(#[from] SessionError),
}

pub type AgentResult<T> = Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(OracleError::Unreachable("connection refused".into()).is_transient());
        assert!(OracleError::Status { status: 503, body: String::new() }.is_transient());
        assert!(OracleError::Status { status: 429, body: String::new() }.is_transient());
        assert!(!OracleError::Status { status: 404, body: String::new() }.is_transient());
        assert!(!OracleError::Malformed("missing field".into()).is_transient());
    }

    #[test]
    fn test_retrieval_error_keeps_source() {
        let err = AgentError::RetrievalUnavailable(StoreError::Unreachable("timeout".into()));
        assert_eq!(
            err.to_string(),
            "Retrieval unavailable: Evidence store unreachable: timeout"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
