use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use notebook_podcast::config::{load_env_file, ClientConfig, EnvFile, StartupConfig};

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_defaults_when_nothing_is_set() {
    let config = ClientConfig::from_lookup(lookup_from(&[]));

    assert_eq!(config, ClientConfig::default());
    assert_eq!(config.api_url, "http://127.0.0.1:8787");
    assert_eq!(config.poll_interval, Duration::from_millis(2_000));
    assert!(config.storage_path.ends_with(".notebooklm/storage_state.json"));
}

#[test]
fn test_overrides_are_applied() {
    let config = ClientConfig::from_lookup(lookup_from(&[
        ("NOTEBOOK_API_URL", "https://notebooks.example.com/"),
        ("NOTEBOOK_STORAGE_PATH", "/tmp/session.json"),
        ("NOTEBOOK_REQUEST_TIMEOUT_SECS", "5"),
        ("NOTEBOOK_POLL_INTERVAL_MS", "250"),
        ("NOTEBOOK_SOURCE_TIMEOUT_SECS", "30"),
        ("NOTEBOOK_ARTIFACT_TIMEOUT_SECS", " 600 "),
    ]));

    assert_eq!(config.api_url, "https://notebooks.example.com");
    assert_eq!(config.storage_path, PathBuf::from("/tmp/session.json"));
    assert_eq!(config.request_timeout, Duration::from_secs(5));
    assert_eq!(config.poll_interval, Duration::from_millis(250));
    assert_eq!(config.source_timeout, Duration::from_secs(30));
    assert_eq!(config.artifact_timeout, Duration::from_secs(600));
}

#[test]
fn test_unparsable_values_fall_back() {
    let config = ClientConfig::from_lookup(lookup_from(&[
        ("NOTEBOOK_POLL_INTERVAL_MS", "soon"),
        ("NOTEBOOK_ARTIFACT_TIMEOUT_SECS", "-1"),
        ("NOTEBOOK_API_URL", "   "),
    ]));

    let defaults = ClientConfig::default();
    assert_eq!(config.poll_interval, defaults.poll_interval);
    assert_eq!(config.artifact_timeout, defaults.artifact_timeout);
    assert_eq!(config.api_url, defaults.api_url);
}

#[test]
fn test_missing_env_file_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env.local");

    let status = load_env_file(&path).unwrap();
    assert_eq!(status, EnvFile::Missing(path));
}

#[test]
fn test_env_file_is_loaded_into_process() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env.local");
    std::fs::write(&path, "NOTEBOOK_PODCAST_TEST_MARKER=loaded\n").unwrap();

    let status = load_env_file(&path).unwrap();

    assert_eq!(status, EnvFile::Loaded(path));
    assert_eq!(std::env::var("NOTEBOOK_PODCAST_TEST_MARKER").as_deref(), Ok("loaded"));
}

#[test]
fn test_malformed_env_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env.local");
    std::fs::write(&path, "BROKEN=\"unterminated\n").unwrap();

    let err = load_env_file(&path).unwrap_err();
    assert!(err.to_string().contains("failed to load env file"), "got {err:#}");
}

#[test]
fn test_zero_poll_interval_falls_back() {
    let config = ClientConfig::from_lookup(lookup_from(&[("NOTEBOOK_POLL_INTERVAL_MS", "0")]));

    assert_eq!(config.poll_interval, Duration::from_millis(2_000));
    assert!(!config.poll_interval.is_zero());
}

#[test]
fn test_zero_timeouts_are_kept() {
    let config = ClientConfig::from_lookup(lookup_from(&[("NOTEBOOK_SOURCE_TIMEOUT_SECS", "0")]));

    assert_eq!(config.source_timeout, Duration::ZERO);
}

#[test]
fn test_startup_config_with_missing_env_file() {
    let dir = tempfile::tempdir().unwrap();
    let env_file = load_env_file(&dir.path().join("absent.env")).unwrap();
    let startup = StartupConfig::from_env_file(env_file);

    assert!(matches!(startup.env_file, EnvFile::Missing(_)));
}
