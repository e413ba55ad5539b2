//! Evidence store port - interface for similarity search over legal fragments.

use async_trait::async_trait;

use crate::domain::errors::StoreError;
use crate::domain::models::Fragment;

/// Similarity index over text fragments.
///
/// Implementations return fragments in their own relevance-ranked order.
/// Scores and provenance are dropped at this boundary; the agent only
/// consumes the text.
#[async_trait]
pub trait EvidenceStore: Send + Sync {
    /// Get the store type name.
    fn name(&self) -> &'static str;

    /// Return up to `k` fragments most similar to `query`, best first.
    ///
    /// An empty list is a valid answer. Any error means the store could not
    /// be queried at all.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Fragment>, StoreError>;

    /// Check if the store is reachable and the collection exists.
    async fn is_available(&self) -> Result<bool, StoreError>;
}
