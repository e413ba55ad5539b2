//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files.

use std::sync::Arc;
use tempfile::TempDir;

use themis::adapters::evidence::InMemoryEvidenceStore;
use themis::adapters::oracle::{ScriptRule, ScriptedOracle};
use themis::domain::models::AgentConfig;
use themis::LegalAgent;

/// The question used by the marriage scenarios.
#[allow(dead_code)]
pub const MARRIAGE_QUERY: &str = "What is required for a valid marriage?";

/// Three fragments for the marriage scenarios. Against [`MARRIAGE_QUERY`]
/// the in-memory store ranks them as: ceremonies, conditions, divorce.
#[allow(dead_code)]
pub const CEREMONIES: &str = "Section 7: Ceremonies required for a valid marriage";
#[allow(dead_code)]
pub const CONDITIONS: &str = "Section 5: Conditions for a Hindu marriage";
#[allow(dead_code)]
pub const DIVORCE: &str = "Section 13: Divorce is available on petition";

/// Create a temporary directory for test isolation
///
/// Returns a TempDir that will be cleaned up when dropped.
#[allow(dead_code)]
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// In-memory store holding `fragments` in load order
#[allow(dead_code)]
pub fn memory_store(fragments: &[&str]) -> Arc<InMemoryEvidenceStore> {
    Arc::new(InMemoryEvidenceStore::new(
        fragments.iter().map(|s| (*s).to_string()).collect(),
    ))
}

/// Agent wired to a scripted oracle and an in-memory store
#[allow(dead_code)]
pub fn scripted_agent(
    rules: Vec<ScriptRule>,
    fragments: &[&str],
    config: &AgentConfig,
) -> (LegalAgent, Arc<ScriptedOracle>) {
    let oracle = Arc::new(ScriptedOracle::with_rules(rules));
    let agent = LegalAgent::new(oracle.clone(), memory_store(fragments), config);
    (agent, oracle)
}
