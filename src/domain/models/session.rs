/// Domain models for a single agent session.
///
/// A session is created per user query, threaded through every node of the
/// agent loop, and discarded once the final answer has been extracted.
/// Each node consumes the state and hands back the next one, so the only
/// way to change a field is through the node-scoped `with_*` methods below.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

use crate::domain::errors::SessionError;

/// A unit of retrievable text returned by the evidence store.
pub type Fragment = String;

/// Answer written when no relevant evidence survived selection.
pub const INSUFFICIENT_EVIDENCE: &str = "No relevant legal information found.";

/// Control token produced by a node and consumed by the routing step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NextAction {
    /// Search the evidence store again
    Retrieve,
    /// Stop iterating and generate the final answer
    Answer,
    /// Re-enter the decision node
    React,
}

impl fmt::Display for NextAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            Self::Retrieve => "retrieve",
            Self::Answer => "answer",
            Self::React => "react",
        };
        f.write_str(token)
    }
}

/// States of the agent controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStep {
    Decide,
    Retrieve,
    Select,
    Check,
    Answer,
}

impl AgentStep {
    /// Returns true for the state that ends the session
    pub fn is_terminal(self) -> bool {
        self == Self::Answer
    }
}

impl fmt::Display for AgentStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Decide => "decide",
            Self::Retrieve => "retrieve",
            Self::Select => "select",
            Self::Check => "check",
            Self::Answer => "answer",
        };
        f.write_str(name)
    }
}

/// Why the session stopped iterating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The decision node chose to answer (or could not be parsed)
    Decided,
    /// Two consecutive selections produced the same non-empty evidence set
    Converged,
    /// The retrieval cycle limit was reached and an answer was forced
    IterationLimitExceeded,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Decided => "decided",
            Self::Converged => "converged",
            Self::IterationLimitExceeded => "iteration_limit_exceeded",
        };
        f.write_str(reason)
    }
}

/// State threaded through every node of one agent session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionState {
    session_id: Uuid,
    query: String,
    retrieved: Vec<Fragment>,
    selected: Vec<Fragment>,
    last_selected: Vec<Fragment>,
    reasoning_trace: String,
    next_action: Option<NextAction>,
    final_answer: Option<String>,
    iteration: u32,
    visited: Vec<AgentStep>,
    started_at: DateTime<Utc>,
}

impl SessionState {
    /// Creates a fresh session for a query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            query: query.into(),
            retrieved: Vec::new(),
            selected: Vec::new(),
            last_selected: Vec::new(),
            reasoning_trace: String::new(),
            next_action: None,
            final_answer: None,
            iteration: 0,
            visited: Vec::new(),
            started_at: Utc::now(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn retrieved(&self) -> &[Fragment] {
        &self.retrieved
    }

    pub fn selected(&self) -> &[Fragment] {
        &self.selected
    }

    pub fn last_selected(&self) -> &[Fragment] {
        &self.last_selected
    }

    pub fn reasoning_trace(&self) -> &str {
        &self.reasoning_trace
    }

    pub fn next_action(&self) -> Option<NextAction> {
        self.next_action
    }

    /// The final answer, `None` until the answer generator has run
    pub fn final_answer(&self) -> Option<&str> {
        self.final_answer.as_deref()
    }

    /// Number of completed retrieve/select/check cycles
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Controller steps executed so far, in order
    pub fn visited(&self) -> &[AgentStep] {
        &self.visited
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Replaces the retrieved fragments wholesale
    ///
    /// The current selection is cleared since it was drawn from the old
    /// candidates. `last_selected` is kept for the convergence check.
    pub fn with_retrieved(mut self, fragments: Vec<Fragment>) -> Self {
        self.retrieved = fragments;
        self.selected.clear();
        self
    }

    /// Replaces the selected fragments wholesale
    ///
    /// Selected fragments must come from the current retrieval.
    pub fn with_selected(mut self, fragments: Vec<Fragment>) -> Self {
        debug_assert!(
            fragments.iter().all(|f| self.retrieved.contains(f)),
            "selected fragments must be drawn from the latest retrieval"
        );
        self.selected = fragments;
        self
    }

    /// Snapshots the current selection for the next convergence check
    pub fn with_last_selected_snapshot(mut self) -> Self {
        self.last_selected = self.selected.clone();
        self
    }

    /// Appends a decision response to the reasoning trace
    pub fn append_trace(mut self, entry: &str) -> Self {
        self.reasoning_trace.push('\n');
        self.reasoning_trace.push_str(entry);
        self.reasoning_trace.push('\n');
        self
    }

    pub fn with_next_action(mut self, action: NextAction) -> Self {
        self.next_action = Some(action);
        self
    }

    /// Consumes the pending control token
    pub fn take_next_action(&mut self) -> Option<NextAction> {
        self.next_action.take()
    }

    /// Writes the final answer; a session accepts exactly one
    pub fn with_final_answer(mut self, answer: impl Into<String>) -> Result<Self, SessionError> {
        if self.final_answer.is_some() {
            return Err(SessionError::AnswerAlreadyWritten);
        }
        self.final_answer = Some(answer.into());
        Ok(self)
    }

    pub fn record_step(mut self, step: AgentStep) -> Self {
        self.visited.push(step);
        self
    }

    pub fn complete_iteration(mut self) -> Self {
        self.iteration += 1;
        self
    }

    /// Returns true when the current and previous selections hold the same
    /// non-empty set of fragments, ignoring order and duplicates
    pub fn selection_converged(&self) -> bool {
        if self.selected.is_empty() {
            return false;
        }
        let current: HashSet<&str> = self.selected.iter().map(String::as_str).collect();
        let previous: HashSet<&str> = self.last_selected.iter().map(String::as_str).collect();
        current == previous
    }
}

/// Everything a caller may want to know about a finished session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub session_id: Uuid,
    pub query: String,
    pub answer: String,
    /// Fragments the answer was grounded on
    pub evidence: Vec<Fragment>,
    pub reasoning_trace: String,
    pub visited: Vec<AgentStep>,
    pub iterations: u32,
    pub termination: Termination,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

impl SessionOutcome {
    /// Returns true when the answer is the insufficiency sentinel
    pub fn is_insufficient(&self) -> bool {
        self.answer == INSUFFICIENT_EVIDENCE
    }
}
