//! Decision node: asks the oracle whether to retrieve again or answer now.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::domain::models::SessionState;
use crate::domain::ports::{OracleRequest, OracleTask, ReasoningOracle};

use super::prompts::decision_prompt;
use super::response_parser::{parse_decision, Decision};

pub struct DecisionNode {
    oracle: Arc<dyn ReasoningOracle>,
}

impl DecisionNode {
    pub fn new(oracle: Arc<dyn ReasoningOracle>) -> Self {
        Self { oracle }
    }

    /// Record the oracle's thought/action in the trace and set `next_action`.
    ///
    /// Only a clear `retrieve` keeps the loop going. Unparseable responses
    /// and oracle failures both route to `answer`.
    #[instrument(skip_all, fields(iteration = state.iteration()))]
    pub async fn decide(&self, state: SessionState) -> SessionState {
        let request = OracleRequest::new(
            OracleTask::Decision,
            decision_prompt(state.query(), state.reasoning_trace()),
        );

        let (state, decision) = match self.oracle.complete(request).await {
            Ok(response) => {
                let response = response.trim();
                info!(thought = %response, "agent thinking");
                let decision = parse_decision(response);
                if decision == Decision::Unparseable {
                    warn!("decision response has no clear action, defaulting to answer");
                }
                (state.append_trace(response), decision)
            }
            Err(err) => {
                warn!(error = %err, "decision oracle call failed, defaulting to answer");
                let marker = format!("[decision unavailable: {err}]");
                (state.append_trace(&marker), Decision::Unparseable)
            }
        };

        state.with_next_action(decision.next_action())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::oracle::{ScriptRule, ScriptedOracle};
    use crate::domain::models::NextAction;

    #[tokio::test]
    async fn test_retrieve_decision_appends_trace() {
        let oracle = Arc::new(ScriptedOracle::with_rules(vec![ScriptRule::new(
            OracleTask::Decision,
        )
        .reply("Thought: I need the statute.\nAction: retrieve")]));
        let node = DecisionNode::new(oracle);

        let state = node.decide(SessionState::new("valid marriage?")).await;

        assert_eq!(state.next_action(), Some(NextAction::Retrieve));
        assert_eq!(
            state.reasoning_trace(),
            "\nThought: I need the statute.\nAction: retrieve\n"
        );
    }

    #[tokio::test]
    async fn test_prompt_carries_previous_reasoning() {
        let oracle = Arc::new(ScriptedOracle::with_rules(vec![
            ScriptRule::new(OracleTask::Decision).reply("Action: answer"),
        ]));
        let node = DecisionNode::new(oracle.clone());

        let state = SessionState::new("valid marriage?").append_trace("Action: retrieve");
        let state = node.decide(state).await;

        let calls = oracle.calls_for(OracleTask::Decision).await;
        assert!(calls[0].prompt.contains("Previous reasoning:\n\nAction: retrieve\n"));
        assert_eq!(state.next_action(), Some(NextAction::Answer));
        assert!(state.reasoning_trace().ends_with("\nAction: answer\n"));
    }

    #[tokio::test]
    async fn test_garbled_response_defaults_to_answer() {
        let oracle = Arc::new(ScriptedOracle::with_rules(vec![
            ScriptRule::new(OracleTask::Decision).reply("%%## lorem ipsum"),
        ]));
        let node = DecisionNode::new(oracle);

        let state = node.decide(SessionState::new("q")).await;

        assert_eq!(state.next_action(), Some(NextAction::Answer));
        assert!(state.reasoning_trace().contains("lorem ipsum"));
    }

    #[tokio::test]
    async fn test_oracle_failure_defaults_to_answer_and_grows_trace() {
        let oracle = Arc::new(ScriptedOracle::with_rules(vec![
            ScriptRule::new(OracleTask::Decision).fail("model offline"),
        ]));
        let node = DecisionNode::new(oracle);

        let state = node.decide(SessionState::new("q")).await;

        assert_eq!(state.next_action(), Some(NextAction::Answer));
        assert!(state.reasoning_trace().contains("decision unavailable"));
    }
}
