// Integration test for logger initialization
// Note: installs the global subscriber, so it lives alone in this binary

use std::fs;
use tempfile::TempDir;
use tracing::{info, instrument};

use themis::infrastructure::logging::{LogConfig, LogFormat, LoggerImpl, RotationPolicy};

#[instrument]
fn classify(fragment: &str) -> bool {
    info!(chars = fragment.len(), "classifying fragment");
    fragment.contains("marriage")
}

#[test]
fn test_logging_writes_json_file_and_rejects_second_init() {
    let temp_dir = TempDir::new().unwrap();

    let config = LogConfig {
        level: "info".to_string(),
        format: LogFormat::Json,
        log_dir: Some(temp_dir.path().to_path_buf()),
        rotation: RotationPolicy::Never,
    };

    let logger = LoggerImpl::init(&config).unwrap();
    assert!(logger.writes_files());

    info!(session_id = "s-1", "session started");
    assert!(classify("Section 5: Conditions for a Hindu marriage"));

    // A second global subscriber is refused instead of panicking
    assert!(LoggerImpl::init(&LogConfig::default()).is_err());

    // Dropping the guard flushes the non-blocking writer
    drop(logger);

    let log_path = temp_dir.path().join("themis.log");
    let contents = fs::read_to_string(&log_path).unwrap();

    let lines: Vec<serde_json::Value> = contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("log line is JSON"))
        .collect();

    assert!(lines
        .iter()
        .any(|line| line["fields"]["message"] == "session started"));
    assert!(lines
        .iter()
        .any(|line| line["fields"]["message"] == "classifying fragment"
            && line["span"]["name"] == "classify"));
}
