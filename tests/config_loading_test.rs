//! Configuration loading from files and environment overrides

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use themis::domain::models::StoreBackend;
use themis::infrastructure::config::ConfigLoader;

fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("themis.yaml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_file_values_override_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r"
agent:
  top_k: 4
oracle:
  model: llama3:8b
evidence_store:
  backend: memory
  fragments_path: demos/fragments.yaml
",
    );

    let config = temp_env::with_vars_unset(["THEMIS_AGENT__TOP_K", "THEMIS_ORACLE__MODEL"], || {
        ConfigLoader::load_from_file(&path).unwrap()
    });

    assert_eq!(config.agent.top_k, 4);
    assert_eq!(config.agent.max_iterations, 6);
    assert_eq!(config.oracle.model, "llama3:8b");
    assert_eq!(config.evidence_store.backend, StoreBackend::Memory);
}

#[test]
fn test_environment_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "agent:\n  top_k: 4\n");

    let config = temp_env::with_vars(
        [
            ("THEMIS_AGENT__TOP_K", Some("3")),
            ("THEMIS_ORACLE__MODEL", Some("phi3")),
        ],
        || ConfigLoader::load_from_file(&path).unwrap(),
    );

    assert_eq!(config.agent.top_k, 3);
    assert_eq!(config.oracle.model, "phi3");
}

#[test]
fn test_invalid_file_values_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "agent:\n  max_iterations: 0\n");

    let err = ConfigLoader::load_from_file(&path).unwrap_err();

    assert!(err.to_string().contains("max_iterations"));
}

#[test]
fn test_memory_backend_without_fragments_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "evidence_store:\n  backend: memory\n");

    assert!(ConfigLoader::load_from_file(&path).is_err());
}

#[test]
fn test_override_path_takes_precedence() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "logging:\n  level: debug\n");

    let config = ConfigLoader::load_with_override(Some(&path)).unwrap();

    assert_eq!(config.logging.level, "debug");
}
