//! Ollama oracle adapter.
//!
//! Calls the `/api/generate` endpoint of an Ollama-compatible model server
//! with streaming disabled. Outgoing requests are throttled with a token
//! bucket so a wide selector fan-out cannot overload a local model, and
//! transient failures (connection errors, 429, 5xx) are retried with
//! exponential backoff.

use anyhow::{Context, Result};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::domain::errors::OracleError;
use crate::domain::models::OracleConfig;
use crate::domain::ports::{OraclePurpose, OracleRequest, ReasoningOracle};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

const INITIAL_BACKOFF: Duration = Duration::from_millis(500);
const MAX_BACKOFF: Duration = Duration::from_secs(10);

/// Ollama-backed reasoning oracle.
pub struct OllamaOracle {
    config: OracleConfig,
    client: reqwest::Client,
    limiter: DirectRateLimiter,
}

impl OllamaOracle {
    pub fn new(config: OracleConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client for oracle")?;

        let rps = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let limiter = RateLimiter::direct(Quota::per_second(rps));

        Ok(Self {
            config,
            client,
            limiter,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn temperature_for(&self, purpose: OraclePurpose) -> f32 {
        match purpose {
            OraclePurpose::Classification => self.config.classification_temperature,
            OraclePurpose::Generation => self.config.temperature,
        }
    }

    async fn send_generate(&self, request: &OracleRequest) -> Result<String, OracleError> {
        let body = GenerateRequest {
            model: &self.config.model,
            prompt: &request.prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature_for(request.purpose()),
            },
        };

        let response = self
            .client
            .post(self.endpoint("/api/generate"))
            .json(&body)
            .send()
            .await
            .map_err(|e| OracleError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(OracleError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| OracleError::Malformed(e.to_string()))?;

        Ok(parsed.response)
    }
}

#[async_trait]
impl ReasoningOracle for OllamaOracle {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn complete(&self, request: OracleRequest) -> Result<String, OracleError> {
        let started = Instant::now();
        let attempts = AtomicU32::new(0);
        let attempts = &attempts;
        let request = &request;

        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(INITIAL_BACKOFF)
            .with_max_interval(MAX_BACKOFF)
            .with_max_elapsed_time(None)
            .build();

        let result = backoff::future::retry(policy, || async move {
            self.limiter.until_ready().await;
            let attempt = attempts.fetch_add(1, Ordering::Relaxed);

            match self.send_generate(request).await {
                Ok(text) => Ok(text),
                Err(err) if err.is_transient() && attempt < self.config.max_retries => {
                    warn!(task = %request.task, attempt, error = %err, "oracle call failed, retrying");
                    Err(backoff::Error::transient(err))
                }
                Err(err) => Err(backoff::Error::permanent(err)),
            }
        })
        .await;

        debug!(
            task = %request.task,
            model = %self.config.model,
            prompt_chars = request.prompt.len(),
            attempts = attempts.load(Ordering::Relaxed),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            ok = result.is_ok(),
            "oracle call finished"
        );

        result
    }

    async fn is_available(&self) -> Result<bool, OracleError> {
        let response = self
            .client
            .get(self.endpoint("/api/tags"))
            .send()
            .await
            .map_err(|e| OracleError::Unreachable(e.to_string()))?;

        Ok(response.status().is_success())
    }
}

// -- Ollama API request/response types --

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::OracleTask;

    #[test]
    fn test_temperature_by_purpose() {
        let oracle = OllamaOracle::new(OracleConfig {
            temperature: 0.6,
            classification_temperature: 0.0,
            ..Default::default()
        })
        .expect("client builds");

        assert!((oracle.temperature_for(OraclePurpose::Generation) - 0.6).abs() < f32::EPSILON);
        assert!(oracle.temperature_for(OraclePurpose::Classification).abs() < f32::EPSILON);
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest {
            model: "mistral:7b",
            prompt: "Is this relevant?",
            stream: false,
            options: GenerateOptions { temperature: 0.0 },
        };
        let json = serde_json::to_value(&body).expect("serializes");

        assert_eq!(json["model"], "mistral:7b");
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["temperature"], 0.0);
        assert_eq!(
            OracleRequest::new(OracleTask::Relevance, "x").purpose(),
            OraclePurpose::Classification
        );
    }
}
