//! Domain layer for the Themis legal agent
//!
//! This module contains the session model, configuration model and the
//! ports the agent talks to.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{AgentError, AgentResult, OracleError, SessionError, StoreError};
