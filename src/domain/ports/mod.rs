//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that adapters must implement:
//! - EvidenceStore: similarity search over legal text fragments
//! - ReasoningOracle: text completion for classification and generation
//!
//! These traits keep the agent loop independent of any specific vector
//! database or model server.

pub mod evidence_store;
pub mod oracle;

pub use evidence_store::EvidenceStore;
pub use oracle::{OraclePurpose, OracleRequest, OracleTask, ReasoningOracle};
