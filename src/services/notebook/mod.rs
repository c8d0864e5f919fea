//! Notebook service collaborator.
//!
//! The pipeline only talks to the traits below. [`client::HttpNotebookClient`]
//! is the networked implementation; tests substitute an in-memory one.

pub mod client;
pub mod error;
pub mod storage;
pub mod types;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub use client::{HttpNotebookClient, HttpSessionFactory};
pub use error::ServiceError;
pub use storage::StorageState;
pub use types::*;

/// Opens sessions against the notebook service.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    type Session: NotebookService;

    async fn open(&self) -> Result<Self::Session, ServiceError>;
}

/// Operations available on an open session.
///
/// `add_file` with `wait` and `wait_for_completion` own all polling and
/// timeout behaviour; callers never poll themselves.
#[async_trait]
pub trait NotebookService: Send + Sync {
    async fn create_notebook(&self, title: &str) -> Result<Notebook, ServiceError>;

    async fn delete_notebook(&self, notebook: &NotebookId) -> Result<(), ServiceError>;

    async fn add_file(
        &self,
        notebook: &NotebookId,
        path: &Path,
        wait: bool,
    ) -> Result<Source, ServiceError>;

    async fn generate_audio(
        &self,
        notebook: &NotebookId,
        options: &AudioOptions,
    ) -> Result<GenerationStatus, ServiceError>;

    async fn wait_for_completion(
        &self,
        notebook: &NotebookId,
        task: &TaskId,
    ) -> Result<GenerationStatus, ServiceError>;

    async fn download_audio(
        &self,
        notebook: &NotebookId,
        dest: &Path,
    ) -> Result<PathBuf, ServiceError>;

    /// Releases the session. Called exactly once on every exit path.
    async fn close(&self);
}
