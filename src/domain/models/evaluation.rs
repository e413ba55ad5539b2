//! Models for running the agent against a golden dataset.

use serde::{Deserialize, Serialize};

use super::session::{AgentStep, Fragment, Termination};

/// A reference question with the answer a reviewer expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Golden {
    pub input: String,
    pub expected_output: String,
}

/// Golden dataset file layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationDataset {
    #[serde(default)]
    pub goldens: Vec<Golden>,
}

/// Steps a grounded session is expected to take, in this order.
pub const EXPECTED_TOOL_ORDER: [AgentStep; 3] =
    [AgentStep::Retrieve, AgentStep::Select, AgentStep::Answer];

/// Whether `steps` contain retrieve, select and answer in that order.
/// Other steps may be interleaved.
pub fn tools_called_in_order(steps: &[AgentStep]) -> bool {
    let mut expected = EXPECTED_TOOL_ORDER.iter().peekable();
    for step in steps {
        if expected.peek() == Some(&step) {
            expected.next();
        }
    }
    expected.peek().is_none()
}

/// Judge verdict on a yes/no question about an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JudgeVerdict {
    Pass,
    Fail,
    /// The judge response could not be read as YES or NO
    Inconclusive,
}

/// Result of running one golden through the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationCase {
    pub input: String,
    pub expected_output: String,
    pub actual_output: Option<String>,
    /// Evidence the agent grounded its answer on
    pub retrieval_context: Vec<Fragment>,
    /// Controller steps the session executed
    pub steps: Vec<AgentStep>,
    pub iterations: u32,
    pub termination: Option<Termination>,
    /// Agreement with the expected output
    pub verdict: JudgeVerdict,
    /// Whether the answer is supported only by `retrieval_context`
    pub faithfulness: JudgeVerdict,
    /// Whether `steps` followed retrieve, select, answer
    pub tool_correctness: bool,
    /// Set when the session failed instead of answering
    pub error: Option<String>,
}

/// Aggregated evaluation results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub cases: Vec<EvaluationCase>,
}

impl EvaluationReport {
    pub fn passed(&self) -> usize {
        self.cases
            .iter()
            .filter(|c| c.verdict == JudgeVerdict::Pass)
            .count()
    }

    /// Cases whose answer stayed within the retrieved evidence
    pub fn faithful(&self) -> usize {
        self.cases
            .iter()
            .filter(|c| c.faithfulness == JudgeVerdict::Pass)
            .count()
    }

    pub fn tool_correct(&self) -> usize {
        self.cases.iter().filter(|c| c.tool_correctness).count()
    }

    /// Fraction of cases the judge accepted, 0.0 for an empty report
    pub fn pass_rate(&self) -> f64 {
        if self.cases.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let rate = self.passed() as f64 / self.cases.len() as f64;
        rate
    }
}
