use std::path::PathBuf;
use std::time::Duration;

/// Errors raised by the notebook service layer.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The persisted session could not be read or turned into credentials.
    #[error("session storage error ({path}): {reason}")]
    Storage { path: PathBuf, reason: String },

    /// The HTTP request itself failed (network, DNS, TLS, decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-2xx status code.
    #[error("notebook service error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("source {source_id} failed to process")]
    SourceFailed { source_id: String },

    #[error("audio generation failed for task {task_id}: {reason}")]
    GenerationFailed { task_id: String, reason: String },

    /// A wait primitive gave up before the remote side finished.
    #[error("timed out after {waited:?} waiting for {what}")]
    Timeout { what: String, waited: Duration },
}
