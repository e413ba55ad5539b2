//! Agent controller: owns the session state and drives the node graph.
//!
//! The controller runs nodes strictly one after another. Each node takes
//! the session state and returns the next one; routing between nodes is a
//! lookup in [`TRANSITIONS`](super::transitions::TRANSITIONS).
//!
//! Two safeguards sit on top of the graph:
//! - an iteration cap that forces an answer once `max_iterations` retrieval
//!   cycles have completed
//! - cooperative cancellation, checked between transitions only

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::domain::errors::{AgentError, AgentResult};
use crate::domain::models::{
    AgentConfig, AgentStep, NextAction, SessionOutcome, SessionState, Termination,
    INSUFFICIENT_EVIDENCE,
};
use crate::domain::ports::{EvidenceStore, ReasoningOracle};
use crate::services::answer::AnswerGenerator;
use crate::services::convergence::check_convergence;
use crate::services::decision::DecisionNode;
use crate::services::retriever::Retriever;
use crate::services::selector::Selector;

use super::transitions::next_step;

/// The legal question agent.
///
/// One instance can serve many sessions concurrently; nothing mutable is
/// shared between them.
pub struct LegalAgent {
    retriever: Retriever,
    selector: Selector,
    decision: DecisionNode,
    answer: AnswerGenerator,
    max_iterations: u32,
    shutdown_tx: broadcast::Sender<()>,
}

impl LegalAgent {
    pub fn new(
        oracle: Arc<dyn ReasoningOracle>,
        store: Arc<dyn EvidenceStore>,
        config: &AgentConfig,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            retriever: Retriever::new(store, config.top_k),
            selector: Selector::new(oracle.clone(), config.selector_concurrency),
            decision: DecisionNode::new(oracle.clone()),
            answer: AnswerGenerator::new(oracle),
            max_iterations: config.max_iterations,
            shutdown_tx,
        }
    }

    /// Answer a question. Returns the final answer or the sentinel.
    pub async fn answer(&self, query: &str) -> AgentResult<String> {
        self.run(query).await.map(|outcome| outcome.answer)
    }

    /// Cancel every running session at its next transition.
    pub fn shutdown(&self) {
        info!("Cancelling running agent sessions");
        let _ = self.shutdown_tx.send(());
    }

    /// Sender that cancels running sessions; for signal handlers.
    pub fn shutdown_handle(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Run one full session and report how it went.
    pub async fn run(&self, query: &str) -> AgentResult<SessionOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AgentError::EmptyQuery);
        }

        // Subscribe before the first node so a cancel sent mid-session is seen
        let shutdown_rx = self.shutdown_tx.subscribe();
        let state = SessionState::new(query);
        let span = info_span!(
            "agent_session",
            session_id = %state.session_id(),
            max_iterations = self.max_iterations,
        );

        self.drive(state, shutdown_rx).instrument(span).await
    }

    async fn drive(
        &self,
        mut state: SessionState,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> AgentResult<SessionOutcome> {
        let started = Instant::now();
        let mut step = AgentStep::Decide;
        let mut termination = Termination::Decided;

        info!(query = %state.query(), "session started");

        loop {
            if cancellation_requested(&mut shutdown_rx) {
                warn!(%step, "session cancelled");
                return Err(AgentError::Cancelled(step));
            }

            state = state.record_step(step);

            if step.is_terminal() {
                state = self.answer.generate(state).await?;
                break;
            }

            state = match step {
                AgentStep::Decide => self.decision.decide(state).await,
                AgentStep::Retrieve => self.retriever.retrieve(state).await?,
                AgentStep::Select => self.selector.select(state).await,
                AgentStep::Check => check_convergence(state).complete_iteration(),
                AgentStep::Answer => state,
            };

            let mut action = state.take_next_action();

            if step == AgentStep::Check && action == Some(NextAction::Answer) {
                termination = Termination::Converged;
            }

            if step == AgentStep::Decide
                && action == Some(NextAction::Retrieve)
                && state.iteration() >= self.max_iterations
            {
                warn!(
                    iterations = state.iteration(),
                    "iteration limit reached, answering with the evidence collected so far"
                );
                action = Some(NextAction::Answer);
                termination = Termination::IterationLimitExceeded;
            }

            let next = next_step(step, action)
                .ok_or(AgentError::InvalidTransition { from: step, action })?;
            debug!(from = %step, to = %next, ?action, "transition");
            step = next;
        }

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            %termination,
            iterations = state.iteration(),
            evidence = state.selected().len(),
            elapsed_ms,
            "session finished"
        );

        Ok(SessionOutcome {
            session_id: state.session_id(),
            query: state.query().to_string(),
            answer: state
                .final_answer()
                .unwrap_or(INSUFFICIENT_EVIDENCE)
                .to_string(),
            evidence: state.selected().to_vec(),
            reasoning_trace: state.reasoning_trace().to_string(),
            visited: state.visited().to_vec(),
            iterations: state.iteration(),
            termination,
            started_at: state.started_at(),
            elapsed_ms,
        })
    }
}

fn cancellation_requested(shutdown_rx: &mut broadcast::Receiver<()>) -> bool {
    match shutdown_rx.try_recv() {
        Ok(()) | Err(broadcast::error::TryRecvError::Lagged(_)) => true,
        Err(broadcast::error::TryRecvError::Empty | broadcast::error::TryRecvError::Closed) => {
            false
        }
    }
}
