//! Answer generator: the terminal node.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::domain::errors::AgentResult;
use crate::domain::models::{SessionState, INSUFFICIENT_EVIDENCE};
use crate::domain::ports::{OracleRequest, OracleTask, ReasoningOracle};

use super::prompts::{answer_prompt, context_block};

pub struct AnswerGenerator {
    oracle: Arc<dyn ReasoningOracle>,
}

impl AnswerGenerator {
    pub fn new(oracle: Arc<dyn ReasoningOracle>) -> Self {
        Self { oracle }
    }

    /// Write the final answer grounded on `selected`.
    ///
    /// With no selected evidence the sentinel is written and the oracle is
    /// not called. A failed or blank generation also yields the sentinel.
    #[instrument(skip_all, fields(evidence = state.selected().len()))]
    pub async fn generate(&self, state: SessionState) -> AgentResult<SessionState> {
        if state.selected().is_empty() {
            info!("no relevant evidence selected");
            return Ok(state.with_final_answer(INSUFFICIENT_EVIDENCE)?);
        }

        let context = context_block(state.selected());
        let request = OracleRequest::new(OracleTask::Answer, answer_prompt(state.query(), &context));

        let answer = match self.oracle.complete(request).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                warn!("answer oracle returned blank text");
                INSUFFICIENT_EVIDENCE.to_string()
            }
            Err(err) => {
                warn!(error = %err, "answer generation failed");
                INSUFFICIENT_EVIDENCE.to_string()
            }
        };

        info!(chars = answer.len(), "final answer written");

        Ok(state.with_final_answer(answer)?)
    }
}
