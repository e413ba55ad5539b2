//! Reasoning oracle adapter implementations.

pub mod ollama;
pub mod scripted;

pub use ollama::OllamaOracle;
pub use scripted::{OracleCall, ScriptRule, ScriptedOracle};
