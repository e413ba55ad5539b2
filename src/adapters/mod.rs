//! Infrastructure adapters for external systems.

pub mod evidence;
pub mod oracle;
pub mod registry;

pub use registry::{create_evidence_store, create_oracle};
