//! Adapter factory: builds the configured oracle and evidence store.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::models::{EvidenceStoreConfig, OracleConfig, StoreBackend};
use crate::domain::ports::{EvidenceStore, ReasoningOracle};

use super::evidence::{ChromaEvidenceStore, InMemoryEvidenceStore};
use super::oracle::OllamaOracle;

/// Create the reasoning oracle described by `config`.
pub fn create_oracle(config: &OracleConfig) -> Result<Arc<dyn ReasoningOracle>> {
    let oracle = OllamaOracle::new(config.clone())?;
    Ok(Arc::new(oracle))
}

/// Create the evidence store described by `config`.
pub fn create_evidence_store(config: &EvidenceStoreConfig) -> Result<Arc<dyn EvidenceStore>> {
    match config.backend {
        StoreBackend::Chroma => {
            let store = ChromaEvidenceStore::new(config.clone())?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            let path = config
                .fragments_path
                .as_deref()
                .context("Memory evidence store requires evidence_store.fragments_path")?;
            let store = InMemoryEvidenceStore::from_file(path)
                .with_context(|| format!("Failed to load fragments from {}", path.display()))?;
            if store.is_empty() {
                warn!(path = %path.display(), "fragment file is empty, every query will miss");
            } else {
                info!(path = %path.display(), count = store.len(), "loaded fragments");
            }
            Ok(Arc::new(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_by_backend() {
        let chroma = create_evidence_store(&EvidenceStoreConfig::default()).unwrap();
        assert_eq!(chroma.name(), "chroma");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fragments.yaml");
        std::fs::write(&path, "- Section 5: Conditions for a Hindu marriage\n").unwrap();

        let memory = create_evidence_store(&EvidenceStoreConfig {
            backend: StoreBackend::Memory,
            fragments_path: Some(path),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(memory.name(), "memory");
    }

    #[test]
    fn test_memory_backend_requires_path() {
        let result = create_evidence_store(&EvidenceStoreConfig {
            backend: StoreBackend::Memory,
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_create_oracle() {
        let oracle = create_oracle(&OracleConfig::default()).unwrap();
        assert_eq!(oracle.name(), "ollama");
    }
}
