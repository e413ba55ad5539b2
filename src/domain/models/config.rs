use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for Themis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Agent loop configuration
    #[serde(default)]
    pub agent: AgentConfig,

    /// Reasoning oracle configuration
    #[serde(default)]
    pub oracle: OracleConfig,

    /// Evidence store configuration
    #[serde(default)]
    pub evidence_store: EvidenceStoreConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Agent loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AgentConfig {
    /// Number of fragments requested from the evidence store per retrieval
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Maximum retrieve/select/check cycles before an answer is forced
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Relevance classifications in flight at once (1 = sequential)
    #[serde(default = "default_selector_concurrency")]
    pub selector_concurrency: usize,
}

const fn default_top_k() -> usize {
    10
}

const fn default_max_iterations() -> u32 {
    6
}

const fn default_selector_concurrency() -> usize {
    4
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            max_iterations: default_max_iterations(),
            selector_concurrency: default_selector_concurrency(),
        }
    }
}

/// Reasoning oracle (Ollama-compatible server) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OracleConfig {
    /// Base URL of the model server
    #[serde(default = "default_oracle_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_oracle_model")]
    pub model: String,

    /// Sampling temperature for generation calls
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Sampling temperature for relevance classification calls
    #[serde(default)]
    pub classification_temperature: f32,

    /// HTTP timeout per call in seconds
    #[serde(default = "default_oracle_timeout_secs")]
    pub timeout_secs: u64,

    /// Requests per second allowed against the model server
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// Retries for transient failures (0 disables retrying)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_oracle_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_oracle_model() -> String {
    "mistral:7b".to_string()
}

const fn default_temperature() -> f32 {
    0.6
}

const fn default_oracle_timeout_secs() -> u64 {
    300
}

const fn default_requests_per_second() -> u32 {
    8
}

const fn default_max_retries() -> u32 {
    2
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: default_oracle_url(),
            model: default_oracle_model(),
            temperature: default_temperature(),
            classification_temperature: 0.0,
            timeout_secs: default_oracle_timeout_secs(),
            requests_per_second: default_requests_per_second(),
            max_retries: default_max_retries(),
        }
    }
}

/// Evidence store backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Chroma collection queried with Ollama embeddings
    #[default]
    Chroma,
    /// Fragments loaded from a local YAML/JSON file
    Memory,
}

/// Evidence store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EvidenceStoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Base URL of the Chroma server
    #[serde(default = "default_store_url")]
    pub base_url: String,

    /// Collection holding the legal fragments
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Base URL of the embedding server
    #[serde(default = "default_oracle_url")]
    pub embedding_url: String,

    /// Embedding model name
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// HTTP timeout per call in seconds
    #[serde(default = "default_store_timeout_secs")]
    pub timeout_secs: u64,

    /// Fragment file for the memory backend
    #[serde(default)]
    pub fragments_path: Option<PathBuf>,
}

fn default_store_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_collection() -> String {
    "legal_sections".to_string()
}

fn default_embedding_model() -> String {
    "mistral".to_string()
}

const fn default_store_timeout_secs() -> u64 {
    60
}

impl Default for EvidenceStoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            base_url: default_store_url(),
            collection: default_collection(),
            embedding_url: default_oracle_url(),
            embedding_model: default_embedding_model(),
            timeout_secs: default_store_timeout_secs(),
            fragments_path: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stderr only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// File rotation: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}
