#![allow(dead_code)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use notebook_podcast::services::notebook::*;

pub const NOTEBOOK_ID: &str = "nb-1";
pub const TASK_ID: &str = "task-1";
pub const AUDIO_BYTES: &[u8] = b"ID3-fake-audio";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Open,
    Create(String),
    Upload { path: PathBuf, wait: bool },
    GenerateAudio(AudioOptions),
    WaitForCompletion(String),
    Download(PathBuf),
    Delete(String),
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Open,
    Create,
    Upload,
    GenerateAudio,
    Wait,
    Download,
    Delete,
}

impl FailAt {
    pub const ALL: [FailAt; 7] = [
        FailAt::Open,
        FailAt::Create,
        FailAt::Upload,
        FailAt::GenerateAudio,
        FailAt::Wait,
        FailAt::Download,
        FailAt::Delete,
    ];
}

/// In-memory notebook service that records every call.
///
/// Acts as its own session factory; clones share the call log.
#[derive(Debug, Clone, Default)]
pub struct FakeNotebookService {
    calls: Arc<Mutex<Vec<Call>>>,
    fail_at: Option<FailAt>,
}

impl FakeNotebookService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(fail_at: FailAt) -> Self {
        Self {
            fail_at: Some(fail_at),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| matches(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, at: FailAt) -> Result<(), ServiceError> {
        if self.fail_at == Some(at) {
            return Err(ServiceError::Api {
                status: 500,
                body: format!("boom at {:?}", at),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SessionFactory for FakeNotebookService {
    type Session = FakeNotebookService;

    async fn open(&self) -> Result<FakeNotebookService, ServiceError> {
        self.record(Call::Open);
        self.check(FailAt::Open)?;
        Ok(self.clone())
    }
}

#[async_trait]
impl NotebookService for FakeNotebookService {
    async fn create_notebook(&self, title: &str) -> Result<Notebook, ServiceError> {
        self.record(Call::Create(title.to_string()));
        self.check(FailAt::Create)?;
        Ok(Notebook {
            id: NotebookId::new(NOTEBOOK_ID),
            title: title.to_string(),
        })
    }

    async fn delete_notebook(&self, notebook: &NotebookId) -> Result<(), ServiceError> {
        self.record(Call::Delete(notebook.to_string()));
        self.check(FailAt::Delete)
    }

    async fn add_file(&self, _notebook: &NotebookId, path: &Path, wait: bool) -> Result<Source, ServiceError> {
        self.record(Call::Upload {
            path: path.to_path_buf(),
            wait,
        });
        self.check(FailAt::Upload)?;
        Ok(Source {
            id: SourceId::new("src-1"),
            title: "doc.pdf".to_string(),
            status: SourceStatus::Ready,
        })
    }

    async fn generate_audio(&self, _notebook: &NotebookId, options: &AudioOptions) -> Result<GenerationStatus, ServiceError> {
        self.record(Call::GenerateAudio(options.clone()));
        self.check(FailAt::GenerateAudio)?;
        Ok(GenerationStatus {
            task_id: TaskId::new(TASK_ID),
            status: ArtifactStatus::Pending,
            error: None,
        })
    }

    async fn wait_for_completion(&self, _notebook: &NotebookId, task: &TaskId) -> Result<GenerationStatus, ServiceError> {
        self.record(Call::WaitForCompletion(task.to_string()));
        self.check(FailAt::Wait)?;
        Ok(GenerationStatus {
            task_id: task.clone(),
            status: ArtifactStatus::Completed,
            error: None,
        })
    }

    async fn download_audio(&self, _notebook: &NotebookId, dest: &Path) -> Result<PathBuf, ServiceError> {
        self.record(Call::Download(dest.to_path_buf()));
        self.check(FailAt::Download)?;
        std::fs::write(dest, AUDIO_BYTES)?;
        Ok(dest.to_path_buf())
    }

    async fn close(&self) {
        self.record(Call::Close);
    }
}

/// Writes a placeholder PDF into `dir` and returns its path.
pub fn write_pdf(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"%PDF-1.4\n%fake\n").unwrap();
    path
}
