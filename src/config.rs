//! Startup configuration.
//!
//! Loaded exactly once in `main`, before the session factory or the
//! generator exist: env file first, then logging, then [`ClientConfig`]
//! from the resulting process environment.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::services::notebook::StorageState;

pub const DEFAULT_ENV_FILE: &str = ".env.local";

const DEFAULT_API_URL: &str = "http://127.0.0.1:8787";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;
const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 300;
const DEFAULT_ARTIFACT_TIMEOUT_SECS: u64 = 1_800;

/// Outcome of reading the env file. A missing file is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvFile {
    Loaded(PathBuf),
    Missing(PathBuf),
}

/// Reads `path` into the process environment without overriding
/// variables that are already set. Contents are not interpreted here.
pub fn load_env_file(path: &Path) -> Result<EnvFile> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(EnvFile::Loaded(path.to_path_buf())),
        Err(e) if e.not_found() => Ok(EnvFile::Missing(path.to_path_buf())),
        Err(e) => Err(e).with_context(|| format!("failed to load env file {}", path.display())),
    }
}

/// Settings for the HTTP notebook client and its wait primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub storage_path: PathBuf,
    pub request_timeout: Duration,
    pub poll_interval: Duration,
    pub source_timeout: Duration,
    pub artifact_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            storage_path: StorageState::default_path(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            source_timeout: Duration::from_secs(DEFAULT_SOURCE_TIMEOUT_SECS),
            artifact_timeout: Duration::from_secs(DEFAULT_ARTIFACT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Load from environment variables with defaults.
    ///
    /// | Env Var                          | Default                            |
    /// |----------------------------------|------------------------------------|
    /// | `NOTEBOOK_API_URL`               | `http://127.0.0.1:8787`            |
    /// | `NOTEBOOK_STORAGE_PATH`          | `~/.notebooklm/storage_state.json` |
    /// | `NOTEBOOK_REQUEST_TIMEOUT_SECS`  | `60`                               |
    /// | `NOTEBOOK_POLL_INTERVAL_MS`      | `2000`                             |
    /// | `NOTEBOOK_SOURCE_TIMEOUT_SECS`   | `300`                              |
    /// | `NOTEBOOK_ARTIFACT_TIMEOUT_SECS` | `1800`                             |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup("NOTEBOOK_API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.api_url);

        let storage_path = lookup("NOTEBOOK_STORAGE_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.storage_path);

        Self {
            api_url,
            storage_path,
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "NOTEBOOK_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )),
            poll_interval: Duration::from_millis(parse_nonzero_or(
                &lookup,
                "NOTEBOOK_POLL_INTERVAL_MS",
                DEFAULT_POLL_INTERVAL_MS,
            )),
            source_timeout: Duration::from_secs(parse_or(
                &lookup,
                "NOTEBOOK_SOURCE_TIMEOUT_SECS",
                DEFAULT_SOURCE_TIMEOUT_SECS,
            )),
            artifact_timeout: Duration::from_secs(parse_or(
                &lookup,
                "NOTEBOOK_ARTIFACT_TIMEOUT_SECS",
                DEFAULT_ARTIFACT_TIMEOUT_SECS,
            )),
        }
    }
}

fn parse_or<F>(lookup: &F, key: &str, default: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, default, "Ignoring unparsable setting");
            default
        }),
    }
}

/// Like [`parse_or`], but zero also falls back: a zero poll interval
/// would spin on the service.
fn parse_nonzero_or<F>(lookup: &F, key: &str, default: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    match parse_or(lookup, key, default) {
        0 => {
            tracing::warn!(key, default, "Ignoring zero setting");
            default
        }
        value => value,
    }
}

/// Everything `main` needs before constructing components.
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub env_file: EnvFile,
    pub client: ClientConfig,
}

impl StartupConfig {
    /// Builds the client config from the process environment once the env
    /// file has been applied. Called after logging is up, so the env file
    /// may set `RUST_LOG` and setting warnings are not lost.
    pub fn from_env_file(env_file: EnvFile) -> Self {
        match &env_file {
            EnvFile::Loaded(path) => tracing::debug!(path = %path.display(), "Loaded env file"),
            EnvFile::Missing(path) => tracing::debug!(path = %path.display(), "No env file, using process environment"),
        }

        Self {
            env_file,
            client: ClientConfig::from_env(),
        }
    }
}
