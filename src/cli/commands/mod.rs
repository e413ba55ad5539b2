//! CLI command implementations.

pub mod ask;
pub mod chat;
pub mod eval;
pub mod health;

use anyhow::Result;
use std::sync::Arc;

use crate::adapters::{create_evidence_store, create_oracle};
use crate::domain::models::Config;
use crate::domain::ports::ReasoningOracle;
use crate::services::LegalAgent;

/// Build the agent from configuration. The oracle is returned as well so
/// commands can reuse it (e.g. as the evaluation judge).
pub(crate) fn build_agent(config: &Config) -> Result<(Arc<LegalAgent>, Arc<dyn ReasoningOracle>)> {
    let oracle = create_oracle(&config.oracle)?;
    let store = create_evidence_store(&config.evidence_store)?;

    tracing::debug!(
        oracle = oracle.name(),
        store = store.name(),
        top_k = config.agent.top_k,
        "agent assembled"
    );

    let agent = Arc::new(LegalAgent::new(oracle.clone(), store, &config.agent));
    Ok((agent, oracle))
}
