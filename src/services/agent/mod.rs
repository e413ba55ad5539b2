//! The agent controller and its routing graph.

pub mod controller;
pub mod transitions;

pub use controller::LegalAgent;
pub use transitions::{next_step, Guard, Transition, TRANSITIONS};
