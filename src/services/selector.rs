//! Selector node: relevance-filters the retrieved candidates.
//!
//! One classification call per fragment. Calls run concurrently up to a
//! fixed width and results are reassembled in retrieval order before the
//! node returns. A failed or unclear classification rejects that fragment
//! only; the others are still evaluated.

use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::domain::models::{Fragment, SessionState};
use crate::domain::ports::{OracleRequest, OracleTask, ReasoningOracle};

use super::prompts::relevance_prompt;
use super::response_parser::{parse_relevance, RelevanceVerdict};

pub struct Selector {
    oracle: Arc<dyn ReasoningOracle>,
    concurrency: usize,
}

impl Selector {
    pub fn new(oracle: Arc<dyn ReasoningOracle>, concurrency: usize) -> Self {
        Self {
            oracle,
            concurrency: concurrency.max(1),
        }
    }

    #[instrument(skip_all, fields(candidates = state.retrieved().len(), concurrency = self.concurrency))]
    pub async fn select(&self, state: SessionState) -> SessionState {
        let query = state.query();

        // buffered() yields in input order, so the output keeps retrieval order
        let verdicts: Vec<bool> = stream::iter(state.retrieved().iter().enumerate())
            .map(|(position, fragment)| self.classify(query, position, fragment))
            .buffered(self.concurrency)
            .collect()
            .await;

        let selected: Vec<Fragment> = state
            .retrieved()
            .iter()
            .zip(verdicts)
            .filter_map(|(fragment, keep)| keep.then(|| fragment.clone()))
            .collect();

        info!(count = selected.len(), "shortlisted {} relevant chunks", selected.len());

        state.with_selected(selected)
    }

    async fn classify(&self, query: &str, position: usize, fragment: &str) -> bool {
        let request = OracleRequest::new(OracleTask::Relevance, relevance_prompt(query, fragment));

        match self.oracle.complete(request).await {
            Ok(response) => {
                let verdict = parse_relevance(&response);
                if verdict == RelevanceVerdict::Ambiguous {
                    warn!(position, response = %response.trim(), "ambiguous relevance verdict, rejecting fragment");
                } else {
                    debug!(position, ?verdict, "fragment classified");
                }
                verdict.is_affirmative()
            }
            Err(err) => {
                warn!(position, error = %err, "relevance classification failed, rejecting fragment");
                false
            }
        }
    }
}
