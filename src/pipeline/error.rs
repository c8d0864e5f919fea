use std::path::PathBuf;

use super::telemetry::Step;
use crate::services::notebook::{NotebookId, ServiceError};

/// Coarse classification used by callers to map failures to exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Local checks failed; the remote service was never contacted.
    Precondition,
    /// Anything raised by the notebook service.
    Remote,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("PDF file not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("cannot create output directory {}: {source}", .path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `step` is `None` when the session itself could not be opened.
    /// `notebook` is set when a notebook was created and not deleted.
    #[error("{source}")]
    Remote {
        step: Option<Step>,
        notebook: Option<NotebookId>,
        #[source]
        source: ServiceError,
    },
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::MissingInput(_) | PipelineError::OutputDirectory { .. } => ErrorKind::Precondition,
            PipelineError::Remote { .. } => ErrorKind::Remote,
        }
    }

    pub fn failed_step(&self) -> Option<Step> {
        match self {
            PipelineError::Remote { step, .. } => *step,
            _ => None,
        }
    }

    pub fn orphaned_notebook(&self) -> Option<&NotebookId> {
        match self {
            PipelineError::Remote { notebook, .. } => notebook.as_ref(),
            _ => None,
        }
    }
}
