//! Unit tests for configuration resolution
//!
//! Note: uses the serial_test crate to prevent ENV variable race
//! conditions. Tests that manipulate RILL_* variables are marked with
//! #[serial] so they run sequentially, not in parallel.

use rill_common::config::ProcessorConfig;
use serial_test::serial;
use std::env;
use std::io::Write;
use std::time::Duration;

const ENV_VARS: &[&str] = &[
    "RILL_API_URL",
    "RILL_TOKEN_URL",
    "RILL_CLIENT_ID",
    "RILL_CLIENT_SECRET",
    "RILL_CALLBACK_QUEUE",
    "RILL_PUBLISH_INTERVAL_SECS",
    "RILL_RETRY_INTERVAL_SECS",
];

fn clear_env() {
    for var in ENV_VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn defaults_apply_without_file_or_env() {
    clear_env();

    let config = ProcessorConfig::default();
    assert_eq!(config.callback_queue, "DROPLET_CALLBACK_QUEUE");
    assert_eq!(config.retry_interval, Duration::from_secs(30));
    assert_eq!(config.publish_interval, Duration::from_secs(10));
}

#[test]
#[serial]
fn toml_file_overrides_defaults() {
    clear_env();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
api_url = "https://archive.example.com/v1"
client_id = "rill"
retry_interval_secs = 5
"#
    )
    .unwrap();

    let config = ProcessorConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.api_url, "https://archive.example.com/v1");
    assert_eq!(config.client_id, "rill");
    assert_eq!(config.retry_interval, Duration::from_secs(5));
    // Untouched fields keep their defaults
    assert_eq!(config.callback_queue, "DROPLET_CALLBACK_QUEUE");
}

#[test]
#[serial]
fn env_overrides_toml() {
    clear_env();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, r#"api_url = "https://from-toml.example.com/v1""#).unwrap();

    env::set_var("RILL_API_URL", "https://from-env.example.com/v1");
    env::set_var("RILL_PUBLISH_INTERVAL_SECS", "2");

    let config = ProcessorConfig::load(Some(file.path())).unwrap();
    clear_env();

    assert_eq!(config.api_url, "https://from-env.example.com/v1");
    assert_eq!(config.publish_interval, Duration::from_secs(2));
}

#[test]
#[serial]
fn non_numeric_interval_is_ignored() {
    clear_env();
    env::set_var("RILL_RETRY_INTERVAL_SECS", "soon");

    let config = ProcessorConfig::load(None).unwrap();
    clear_env();

    assert_eq!(config.retry_interval, Duration::from_secs(30));
}

#[test]
#[serial]
fn explicit_missing_path_is_an_error() {
    clear_env();

    let result = ProcessorConfig::load(Some(std::path::Path::new(
        "/nonexistent/rill/rill.toml",
    )));
    assert!(result.is_err());
}

#[test]
#[serial]
fn explicit_malformed_file_is_an_error() {
    clear_env();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "api_url = [not toml").unwrap();

    assert!(ProcessorConfig::load(Some(file.path())).is_err());
}
