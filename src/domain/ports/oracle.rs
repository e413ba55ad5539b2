//! Reasoning oracle port - interface for the text-completion backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::errors::OracleError;

/// The two call shapes the agent uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OraclePurpose {
    /// Strict binary question expecting a YES/NO token
    Classification,
    /// Open-ended generation (thought/action pairs, grounded answers)
    Generation,
}

/// Which node is asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OracleTask {
    /// Selector: is this fragment relevant to the query?
    Relevance,
    /// Decision node: retrieve again or answer?
    Decision,
    /// Answer generator: grounded answer from selected fragments
    Answer,
    /// Evaluation judge: does the answer agree with the expected one?
    Judge,
}

impl OracleTask {
    pub fn purpose(self) -> OraclePurpose {
        match self {
            Self::Relevance | Self::Judge => OraclePurpose::Classification,
            Self::Decision | Self::Answer => OraclePurpose::Generation,
        }
    }
}

impl fmt::Display for OracleTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Relevance => "relevance",
            Self::Decision => "decision",
            Self::Answer => "answer",
            Self::Judge => "judge",
        };
        f.write_str(name)
    }
}

/// A single stateless oracle call.
#[derive(Debug, Clone)]
pub struct OracleRequest {
    pub task: OracleTask,
    pub prompt: String,
}

impl OracleRequest {
    pub fn new(task: OracleTask, prompt: impl Into<String>) -> Self {
        Self {
            task,
            prompt: prompt.into(),
        }
    }

    pub fn purpose(&self) -> OraclePurpose {
        self.task.purpose()
    }
}

/// Trait for text-completion backends.
///
/// Every call is independent: the oracle keeps no conversation history.
/// Memory across agent iterations lives in the reasoning trace, which the
/// decision node re-sends with every prompt.
#[async_trait]
pub trait ReasoningOracle: Send + Sync {
    /// Get the oracle type name.
    fn name(&self) -> &'static str;

    /// Complete a prompt and return the raw response text.
    async fn complete(&self, request: OracleRequest) -> Result<String, OracleError>;

    /// Check if the backend is reachable.
    async fn is_available(&self) -> Result<bool, OracleError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_purpose() {
        assert_eq!(OracleTask::Relevance.purpose(), OraclePurpose::Classification);
        assert_eq!(OracleTask::Judge.purpose(), OraclePurpose::Classification);
        assert_eq!(OracleTask::Decision.purpose(), OraclePurpose::Generation);
        assert_eq!(OracleTask::Answer.purpose(), OraclePurpose::Generation);
    }
}
