//! Routing graph of the agent controller.

use crate::domain::models::{AgentStep, NextAction};

/// Condition under which a transition fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Unconditional edge
    Always,
    /// Fires when the node left this action pending
    On(NextAction),
}

impl Guard {
    fn admits(self, action: Option<NextAction>) -> bool {
        match self {
            Self::Always => true,
            Self::On(expected) => action == Some(expected),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: AgentStep,
    pub guard: Guard,
    pub to: AgentStep,
}

const fn edge(from: AgentStep, guard: Guard, to: AgentStep) -> Transition {
    Transition { from, guard, to }
}

/// Every edge of the controller. `Answer` has no outgoing edge.
pub const TRANSITIONS: &[Transition] = &[
    edge(AgentStep::Decide, Guard::On(NextAction::Retrieve), AgentStep::Retrieve),
    edge(AgentStep::Decide, Guard::On(NextAction::Answer), AgentStep::Answer),
    edge(AgentStep::Retrieve, Guard::Always, AgentStep::Select),
    edge(AgentStep::Select, Guard::Always, AgentStep::Check),
    edge(AgentStep::Check, Guard::On(NextAction::React), AgentStep::Decide),
    edge(AgentStep::Check, Guard::On(NextAction::Answer), AgentStep::Answer),
];

/// Look up the step that follows `from` given the pending action.
///
/// Returns `None` when no edge matches, including from the terminal step.
pub fn next_step(from: AgentStep, action: Option<NextAction>) -> Option<AgentStep> {
    TRANSITIONS
        .iter()
        .find(|t| t.from == from && t.guard.admits(action))
        .map(|t| t.to)
}
