//! Retriever node: fetches a fixed-size candidate set from the evidence store.

use std::sync::Arc;
use tracing::{info, instrument};

use crate::domain::errors::{AgentError, AgentResult};
use crate::domain::models::SessionState;
use crate::domain::ports::EvidenceStore;

pub struct Retriever {
    store: Arc<dyn EvidenceStore>,
    top_k: usize,
}

impl Retriever {
    pub fn new(store: Arc<dyn EvidenceStore>, top_k: usize) -> Self {
        Self { store, top_k }
    }

    /// Replace `retrieved` with the store's top-K fragments for the query.
    ///
    /// Store order is kept as-is. A store failure ends the session.
    #[instrument(skip_all, fields(store = self.store.name(), k = self.top_k))]
    pub async fn retrieve(&self, state: SessionState) -> AgentResult<SessionState> {
        let fragments = self
            .store
            .search(state.query(), self.top_k)
            .await
            .map_err(AgentError::RetrievalUnavailable)?;

        info!(count = fragments.len(), "retrieved {} chunks", fragments.len());

        Ok(state.with_retrieved(fragments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::evidence::InMemoryEvidenceStore;
    use crate::domain::errors::StoreError;
    use crate::domain::models::Fragment;
    use async_trait::async_trait;

    struct DownStore;

    #[async_trait]
    impl EvidenceStore for DownStore {
        fn name(&self) -> &'static str {
            "down"
        }

        async fn search(&self, _query: &str, _k: usize) -> Result<Vec<Fragment>, StoreError> {
            Err(StoreError::Unreachable("connection refused".to_string()))
        }

        async fn is_available(&self) -> Result<bool, StoreError> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn test_retrieve_overwrites_candidates() {
        let store = Arc::new(InMemoryEvidenceStore::new(vec![
            "Section 5: Conditions for a Hindu marriage".to_string(),
            "Section 7: Ceremonies for a Hindu marriage".to_string(),
            "Section 13: Divorce".to_string(),
        ]));
        let retriever = Retriever::new(store, 2);

        let state = SessionState::new("hindu marriage")
            .with_retrieved(vec!["stale".to_string()]);
        let state = retriever.retrieve(state).await.unwrap();

        assert_eq!(state.retrieved().len(), 2);
        assert!(!state.retrieved().contains(&"stale".to_string()));
    }

    #[tokio::test]
    async fn test_selection_stays_within_latest_retrieval() {
        let store = Arc::new(InMemoryEvidenceStore::new(vec![
            "Section 13: divorce grounds".to_string(),
        ]));
        let retriever = Retriever::new(store, 5);
        let state = SessionState::new("divorce grounds")
            .with_retrieved(vec!["Section 5: marriage".to_string()])
            .with_selected(vec!["Section 5: marriage".to_string()]);

        let state = retriever.retrieve(state).await.unwrap();

        assert_eq!(state.retrieved(), &["Section 13: divorce grounds".to_string()]);
        assert!(state
            .selected()
            .iter()
            .all(|fragment| state.retrieved().contains(fragment)));
        assert!(state.selected().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_retrieval_unavailable() {
        let retriever = Retriever::new(Arc::new(DownStore), 10);

        let result = retriever.retrieve(SessionState::new("q")).await;

        assert!(matches!(result, Err(AgentError::RetrievalUnavailable(_))));
    }
}
