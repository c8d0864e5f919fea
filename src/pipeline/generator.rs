use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::time::Instant;

use super::error::PipelineError;
use super::telemetry::{Step, StepOutcome, StepRecorder};
use crate::services::notebook::{AudioOptions, NotebookId, NotebookService, ServiceError, SessionFactory};

pub const NOTEBOOK_TITLE_PREFIX: &str = "Temp Podcast: ";

/// Title for the temporary notebook, built from the PDF's file name.
pub fn notebook_title(pdf: &Path) -> String {
    let name = pdf
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| pdf.display().to_string());
    format!("{NOTEBOOK_TITLE_PREFIX}{name}")
}

/// Local preconditions, checked before any remote call.
///
/// Creates the output's parent directory if needed; an existing
/// directory is fine.
pub fn check_inputs(pdf: &Path, output: &Path) -> Result<(), PipelineError> {
    if !pdf.exists() {
        return Err(PipelineError::MissingInput(pdf.to_path_buf()));
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| PipelineError::OutputDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    Ok(())
}

/// Turns a PDF into an audio overview through a notebook service session.
///
/// The run is strictly linear: create notebook, upload, generate, wait,
/// download, delete. The first failure stops it. Nothing is retried and a
/// notebook created before a failure is left behind (its id is carried in
/// the error).
pub struct PodcastGenerator<F: SessionFactory> {
    factory: F,
    options: AudioOptions,
    telemetry: StepRecorder,
}

impl<F: SessionFactory> PodcastGenerator<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            options: AudioOptions::default(),
            telemetry: StepRecorder::new(),
        }
    }

    pub fn with_options(mut self, options: AudioOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &AudioOptions {
        &self.options
    }

    /// Events from the most recent run.
    pub fn telemetry(&self) -> &StepRecorder {
        &self.telemetry
    }

    pub async fn generate(&mut self, pdf: &Path, output: &Path) -> Result<PathBuf, PipelineError> {
        self.telemetry.clear();
        check_inputs(pdf, output)?;

        let session = self.factory.open().await.map_err(|source| PipelineError::Remote {
            step: None,
            notebook: None,
            source,
        })?;

        let result = self.run(&session, pdf, output).await;
        session.close().await;

        let summary = self.telemetry.snapshot();
        match &result {
            Ok(path) => {
                tracing::info!(
                    output = %path.display(),
                    elapsed_ms = summary.total_elapsed.as_millis() as u64,
                    "Podcast generated"
                );
            }
            Err(e) => {
                tracing::debug!(step = ?e.failed_step(), "Podcast generation failed: {}", e);
                if let Some(notebook) = e.orphaned_notebook() {
                    tracing::warn!(notebook = %notebook, "Notebook was not deleted and must be removed manually");
                }
            }
        }

        result
    }

    async fn run(&mut self, session: &F::Session, pdf: &Path, output: &Path) -> Result<PathBuf, PipelineError> {
        let title = notebook_title(pdf);
        let notebook = timed(&mut self.telemetry, Step::CreateNotebook, None, session.create_notebook(&title)).await?;
        let id = notebook.id;
        println!("Created notebook: {}", id);

        println!("Uploading source: {}", pdf.display());
        timed(&mut self.telemetry, Step::UploadSource, Some(&id), session.add_file(&id, pdf, true)).await?;

        println!("Generating Audio Overview (this may take a few minutes)...");
        let task = timed(
            &mut self.telemetry,
            Step::GenerateAudio,
            Some(&id),
            session.generate_audio(&id, &self.options),
        )
        .await?;
        tracing::debug!(task = %task.task_id, status = ?task.status, "Audio generation started");

        timed(
            &mut self.telemetry,
            Step::WaitForAudio,
            Some(&id),
            session.wait_for_completion(&id, &task.task_id),
        )
        .await?;

        println!("Downloading to: {}", output.display());
        let path = timed(&mut self.telemetry, Step::DownloadAudio, Some(&id), session.download_audio(&id, output)).await?;

        println!("Cleaning up notebook: {}", id);
        timed(&mut self.telemetry, Step::DeleteNotebook, Some(&id), session.delete_notebook(&id)).await?;

        println!("Done!");
        Ok(path)
    }
}

/// Awaits one remote step, recording it and tagging any failure with the
/// step and the notebook it leaves behind.
async fn timed<T, Fut>(
    telemetry: &mut StepRecorder,
    step: Step,
    notebook: Option<&NotebookId>,
    call: Fut,
) -> Result<T, PipelineError>
where
    Fut: Future<Output = Result<T, ServiceError>>,
{
    telemetry.started(step);
    let started = Instant::now();

    match call.await {
        Ok(value) => {
            telemetry.finished(step, StepOutcome::Completed, started.elapsed());
            Ok(value)
        }
        Err(source) => {
            telemetry.finished(step, StepOutcome::Failed, started.elapsed());
            Err(PipelineError::Remote {
                step: Some(step),
                notebook: notebook.cloned(),
                source,
            })
        }
    }
}
