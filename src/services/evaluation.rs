//! Evaluation harness: runs golden questions through the agent and scores
//! each case three ways. The oracle judges agreement with the expected
//! answer and faithfulness to the retrieved evidence. Tool correctness is
//! read off the recorded steps.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::models::{
    tools_called_in_order, EvaluationCase, EvaluationDataset, EvaluationReport, Fragment, Golden,
    JudgeVerdict,
};
use crate::domain::ports::{OracleRequest, OracleTask, ReasoningOracle};

use super::agent::LegalAgent;
use super::prompts::{context_block, faithfulness_prompt, judge_prompt};
use super::response_parser::{parse_relevance, RelevanceVerdict};

pub struct EvaluationService {
    agent: Arc<LegalAgent>,
    judge: Arc<dyn ReasoningOracle>,
}

impl EvaluationService {
    pub fn new(agent: Arc<LegalAgent>, judge: Arc<dyn ReasoningOracle>) -> Self {
        Self { agent, judge }
    }

    /// Load a golden dataset from a `.json`, `.yaml` or `.yml` file.
    pub fn load_dataset(path: &Path) -> Result<EvaluationDataset> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset {}", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let dataset = if is_json {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse dataset {}", path.display()))?
        } else {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse dataset {}", path.display()))?
        };

        Ok(dataset)
    }

    /// Evaluate every golden in order.
    pub async fn evaluate(&self, dataset: &EvaluationDataset) -> EvaluationReport {
        let total = dataset.goldens.len();
        let mut cases = Vec::with_capacity(total);

        for (index, golden) in dataset.goldens.iter().enumerate() {
            info!(case = index + 1, total, input = %golden.input, "evaluating golden");
            cases.push(self.evaluate_case(golden).await);
        }

        let report = EvaluationReport { cases };
        info!(
            passed = report.passed(),
            faithful = report.faithful(),
            tool_correct = report.tool_correct(),
            total,
            "evaluation finished"
        );
        report
    }

    /// Run one golden. Session failures are recorded on the case, not
    /// propagated.
    pub async fn evaluate_case(&self, golden: &Golden) -> EvaluationCase {
        let outcome = match self.agent.run(&golden.input).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, input = %golden.input, "session failed");
                return EvaluationCase {
                    input: golden.input.clone(),
                    expected_output: golden.expected_output.clone(),
                    actual_output: None,
                    retrieval_context: Vec::new(),
                    steps: Vec::new(),
                    iterations: 0,
                    termination: None,
                    verdict: JudgeVerdict::Fail,
                    faithfulness: JudgeVerdict::Fail,
                    tool_correctness: false,
                    error: Some(err.to_string()),
                };
            }
        };

        // The sentinel never matches a substantive expected answer, and
        // makes no claim the evidence would have to support
        let (verdict, faithfulness) = if outcome.is_insufficient() {
            (JudgeVerdict::Fail, JudgeVerdict::Pass)
        } else {
            tokio::join!(
                self.correctness(golden, &outcome.answer),
                self.faithfulness(&golden.input, &outcome.evidence, &outcome.answer),
            )
        };
        let tool_correctness = tools_called_in_order(&outcome.visited);

        EvaluationCase {
            input: golden.input.clone(),
            expected_output: golden.expected_output.clone(),
            actual_output: Some(outcome.answer),
            retrieval_context: outcome.evidence,
            steps: outcome.visited,
            iterations: outcome.iterations,
            termination: Some(outcome.termination),
            verdict,
            faithfulness,
            tool_correctness,
            error: None,
        }
    }

    async fn correctness(&self, golden: &Golden, actual: &str) -> JudgeVerdict {
        self.ask_judge(judge_prompt(&golden.input, &golden.expected_output, actual))
            .await
    }

    /// An answer without retrieved evidence cannot be grounded in it.
    async fn faithfulness(&self, query: &str, evidence: &[Fragment], answer: &str) -> JudgeVerdict {
        if evidence.is_empty() {
            return JudgeVerdict::Fail;
        }
        self.ask_judge(faithfulness_prompt(query, &context_block(evidence), answer))
            .await
    }

    async fn ask_judge(&self, prompt: String) -> JudgeVerdict {
        let request = OracleRequest::new(OracleTask::Judge, prompt);

        match self.judge.complete(request).await {
            Ok(response) => match parse_relevance(&response) {
                RelevanceVerdict::Relevant => JudgeVerdict::Pass,
                RelevanceVerdict::Irrelevant => JudgeVerdict::Fail,
                RelevanceVerdict::Ambiguous => JudgeVerdict::Inconclusive,
            },
            Err(err) => {
                warn!(error = %err, "judge call failed");
                JudgeVerdict::Inconclusive
            }
        }
    }
}
