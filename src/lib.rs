//! Themis - grounded legal question answering
//!
//! Themis answers legal questions by retrieving candidate passages from a
//! vector store, filtering them for relevance with a language model, and
//! iterating until the evidence stabilises or the model decides to answer.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): session state, errors, and the port traits
//!   for the evidence store and the reasoning oracle
//! - **Service Layer** (`services`): the agent nodes, the controller that
//!   drives them, and the evaluation harness
//! - **Adapters** (`adapters`): Ollama, Chroma, in-memory and scripted
//!   implementations of the ports
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use themis::adapters::{create_evidence_store, create_oracle};
//! use themis::infrastructure::config::ConfigLoader;
//! use themis::LegalAgent;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let oracle = create_oracle(&config.oracle)?;
//!     let store = create_evidence_store(&config.evidence_store)?;
//!     let agent = LegalAgent::new(oracle, store, &config.agent);
//!
//!     let answer = agent.answer("What is required for a valid marriage?").await?;
//!     println!("{answer}");
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{AgentError, AgentResult, OracleError, SessionError, StoreError};
pub use domain::models::{
    AgentStep, Config, Fragment, NextAction, SessionOutcome, SessionState, Termination,
    INSUFFICIENT_EVIDENCE,
};
pub use domain::ports::{EvidenceStore, OracleRequest, OracleTask, ReasoningOracle};
pub use services::{EvaluationService, LegalAgent};
