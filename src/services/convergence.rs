//! Convergence check: stops the loop once selection stabilises.

use tracing::info;

use crate::domain::models::{NextAction, SessionState};

/// Compare the current selection against the previous one.
///
/// The same non-empty set twice in a row routes to `answer`. Anything else
/// snapshots the current selection and routes back to the decision node.
/// An empty selection never converges.
pub fn check_convergence(state: SessionState) -> SessionState {
    let collected = state.selected().len();
    info!(count = collected, "collected {} legal chunks", collected);

    if state.selection_converged() {
        info!("evidence set is stable, generating final answer");
        state.with_next_action(NextAction::Answer)
    } else {
        state
            .with_last_selected_snapshot()
            .with_next_action(NextAction::React)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_selection(state: SessionState, items: &[&str]) -> SessionState {
        let fragments: Vec<String> = items.iter().map(|s| (*s).to_string()).collect();
        state.with_retrieved(fragments.clone()).with_selected(fragments)
    }

    #[test]
    fn test_first_selection_continues() {
        let state = with_selection(SessionState::new("q"), &["a", "b"]);
        let state = check_convergence(state);

        assert_eq!(state.next_action(), Some(NextAction::React));
        assert_eq!(state.last_selected(), state.selected());
    }

    #[test]
    fn test_same_set_in_any_order_converges() {
        let state = check_convergence(with_selection(SessionState::new("q"), &["a", "b"]));
        let state = with_selection(state, &["b", "a", "a"]);
        let state = check_convergence(state);

        assert_eq!(state.next_action(), Some(NextAction::Answer));
    }

    #[test]
    fn test_changed_set_updates_snapshot() {
        let state = check_convergence(with_selection(SessionState::new("q"), &["a", "b"]));
        let state = check_convergence(with_selection(state, &["a", "c"]));

        assert_eq!(state.next_action(), Some(NextAction::React));
        assert_eq!(state.last_selected(), &["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_empty_selection_never_converges() {
        let state = check_convergence(with_selection(SessionState::new("q"), &[]));
        let state = check_convergence(with_selection(state, &[]));

        assert_eq!(state.next_action(), Some(NextAction::React));
    }
}
