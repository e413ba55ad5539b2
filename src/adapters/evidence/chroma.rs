//! Chroma evidence store adapter.
//!
//! Embeds the query with an Ollama-compatible `/api/embeddings` endpoint,
//! then runs a nearest-neighbour query against a Chroma collection over its
//! REST API. Only the document text is requested; distances and metadata
//! stay on the server.
//!
//! Failures are returned as-is. The agent treats any store error as fatal
//! for the session, so nothing here retries.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::domain::errors::StoreError;
use crate::domain::models::{EvidenceStoreConfig, Fragment};
use crate::domain::ports::EvidenceStore;

/// Chroma-backed evidence store.
pub struct ChromaEvidenceStore {
    config: EvidenceStoreConfig,
    client: reqwest::Client,
    collection_id: OnceCell<String>,
}

impl ChromaEvidenceStore {
    pub fn new(config: EvidenceStoreConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client for evidence store")?;

        Ok(Self {
            config,
            client,
            collection_id: OnceCell::new(),
        })
    }

    fn chroma_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn embedding_url(&self) -> String {
        format!(
            "{}/api/embeddings",
            self.config.embedding_url.trim_end_matches('/')
        )
    }

    async fn embed_query(&self, query: &str) -> Result<Vec<f32>, StoreError> {
        let response = self
            .client
            .post(self.embedding_url())
            .json(&EmbeddingRequest {
                model: &self.config.embedding_model,
                prompt: query,
            })
            .send()
            .await
            .map_err(|e| StoreError::Embedding(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(StoreError::Embedding(format!(
                "embedding endpoint returned {status}: {body}"
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Embedding(e.to_string()))?;

        if parsed.embedding.is_empty() {
            return Err(StoreError::Embedding(
                "embedding endpoint returned an empty vector".to_string(),
            ));
        }

        Ok(parsed.embedding)
    }

    async fn resolve_collection_id(&self) -> Result<&str, StoreError> {
        let id = self
            .collection_id
            .get_or_try_init(|| async {
                let response = self
                    .client
                    .get(self.chroma_url(&format!(
                        "/api/v1/collections/{}",
                        self.config.collection
                    )))
                    .send()
                    .await
                    .map_err(|e| StoreError::Unreachable(e.to_string()))?;

                let status = response.status();
                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(StoreError::CollectionNotFound(self.config.collection.clone()));
                }
                if !status.is_success() {
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "unable to read response body".to_string());
                    return Err(StoreError::Status {
                        status: status.as_u16(),
                        body,
                    });
                }

                let collection: CollectionResponse = response
                    .json()
                    .await
                    .map_err(|e| StoreError::Malformed(e.to_string()))?;
                Ok(collection.id)
            })
            .await?;

        Ok(id.as_str())
    }
}

#[async_trait]
impl EvidenceStore for ChromaEvidenceStore {
    fn name(&self) -> &'static str {
        "chroma"
    }

    async fn search(&self, query: &str, k: usize) -> Result<Vec<Fragment>, StoreError> {
        let embedding = self.embed_query(query).await?;
        let collection_id = self.resolve_collection_id().await?;

        let response = self
            .client
            .post(self.chroma_url(&format!("/api/v1/collections/{collection_id}/query")))
            .json(&QueryRequest {
                query_embeddings: vec![embedding],
                n_results: k,
                include: vec!["documents"],
            })
            .send()
            .await
            .map_err(|e| StoreError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Malformed(e.to_string()))?;

        // One query embedding in, one result row out
        let fragments: Vec<Fragment> = parsed
            .documents
            .and_then(|rows| rows.into_iter().next())
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .collect();

        debug!(
            collection = %self.config.collection,
            requested = k,
            returned = fragments.len(),
            "chroma query finished"
        );

        Ok(fragments)
    }

    async fn is_available(&self) -> Result<bool, StoreError> {
        let response = self
            .client
            .get(self.chroma_url("/api/v1/heartbeat"))
            .send()
            .await
            .map_err(|e| StoreError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Ok(false);
        }

        match self.resolve_collection_id().await {
            Ok(_) => Ok(true),
            Err(StoreError::CollectionNotFound(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }
}

// -- Ollama embeddings / Chroma API request/response types --

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct CollectionResponse {
    id: String,
}

#[derive(Debug, Serialize)]
struct QueryRequest {
    query_embeddings: Vec<Vec<f32>>,
    n_results: usize,
    include: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    documents: Option<Vec<Vec<Option<String>>>>,
}
