use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::{multipart, Client};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::time::Instant;

use super::error::ServiceError;
use super::storage::StorageState;
use super::types::*;
use super::{NotebookService, SessionFactory};
use crate::config::ClientConfig;

/// HTTP client for one authenticated notebook service session.
#[derive(Clone)]
pub struct HttpNotebookClient {
    client: Client,
    base_url: String,
    poll_interval: Duration,
    source_timeout: Duration,
    artifact_timeout: Duration,
}

#[derive(Serialize)]
struct CreateNotebookRequest<'a> {
    title: &'a str,
}

impl HttpNotebookClient {
    /// Builds a client that sends the stored cookies on every request.
    pub fn new(config: &ClientConfig, storage: &StorageState) -> Result<Self, ServiceError> {
        let mut cookie = HeaderValue::from_str(&storage.cookie_header()).map_err(|e| ServiceError::Storage {
            path: config.storage_path.clone(),
            reason: format!("cookie value is not a valid header: {e}"),
        })?;
        cookie.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, cookie);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            poll_interval: config.poll_interval,
            source_timeout: config.source_timeout,
            artifact_timeout: config.artifact_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn notebook_url(&self, notebook: &NotebookId, rest: &str) -> String {
        format!("{}/v1/notebooks/{}{}", self.base_url, notebook, rest)
    }

    async fn source_status(&self, notebook: &NotebookId, source: &SourceId) -> Result<Source, ServiceError> {
        let response = self
            .client
            .get(self.notebook_url(notebook, &format!("/sources/{source}")))
            .send()
            .await?;

        parse_response(response).await
    }

    async fn task_status(&self, notebook: &NotebookId, task: &TaskId) -> Result<GenerationStatus, ServiceError> {
        let response = self
            .client
            .get(self.notebook_url(notebook, &format!("/artifacts/{task}")))
            .send()
            .await?;

        parse_response(response).await
    }

    async fn wait_for_source(&self, notebook: &NotebookId, mut source: Source) -> Result<Source, ServiceError> {
        let started = Instant::now();
        loop {
            match source.status {
                SourceStatus::Ready => return Ok(source),
                SourceStatus::Error => {
                    return Err(ServiceError::SourceFailed {
                        source_id: source.id.to_string(),
                    })
                }
                SourceStatus::Processing => {}
            }

            if started.elapsed() >= self.source_timeout {
                return Err(ServiceError::Timeout {
                    what: format!("source {} to finish processing", source.id),
                    waited: started.elapsed(),
                });
            }

            tokio::time::sleep(self.poll_interval).await;
            source = self.source_status(notebook, &source.id).await?;
            tracing::debug!(source = %source.id, status = ?source.status, "Polled source");
        }
    }

    async fn stream_to_file(mut response: reqwest::Response, file: &mut tokio::fs::File) -> Result<u64, ServiceError> {
        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        file.sync_all().await?;
        Ok(written)
    }
}

#[async_trait]
impl NotebookService for HttpNotebookClient {
    async fn create_notebook(&self, title: &str) -> Result<Notebook, ServiceError> {
        let response = self
            .client
            .post(format!("{}/v1/notebooks", self.base_url))
            .json(&CreateNotebookRequest { title })
            .send()
            .await?;

        parse_response(response).await
    }

    async fn delete_notebook(&self, notebook: &NotebookId) -> Result<(), ServiceError> {
        let response = self.client.delete(self.notebook_url(notebook, "")).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn add_file(&self, notebook: &NotebookId, path: &Path, wait: bool) -> Result<Source, ServiceError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("source.pdf")
            .to_string();

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/pdf")?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.notebook_url(notebook, "/sources"))
            .multipart(form)
            .send()
            .await?;

        let source: Source = parse_response(response).await?;
        tracing::debug!(source = %source.id, status = ?source.status, "Source uploaded");

        if !wait {
            return Ok(source);
        }
        self.wait_for_source(notebook, source).await
    }

    async fn generate_audio(&self, notebook: &NotebookId, options: &AudioOptions) -> Result<GenerationStatus, ServiceError> {
        let response = self
            .client
            .post(self.notebook_url(notebook, "/artifacts/audio"))
            .json(options)
            .send()
            .await?;

        parse_response(response).await
    }

    async fn wait_for_completion(&self, notebook: &NotebookId, task: &TaskId) -> Result<GenerationStatus, ServiceError> {
        let started = Instant::now();
        loop {
            let status = self.task_status(notebook, task).await?;
            tracing::debug!(task = %task, status = ?status.status, "Polled artifact task");

            match status.status {
                ArtifactStatus::Completed => return Ok(status),
                ArtifactStatus::Failed => {
                    return Err(ServiceError::GenerationFailed {
                        task_id: task.to_string(),
                        reason: status.error.unwrap_or_else(|| "no reason given".to_string()),
                    })
                }
                ArtifactStatus::Pending | ArtifactStatus::InProgress => {}
            }

            if started.elapsed() >= self.artifact_timeout {
                return Err(ServiceError::Timeout {
                    what: format!("audio task {task}"),
                    waited: started.elapsed(),
                });
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn download_audio(&self, notebook: &NotebookId, dest: &Path) -> Result<PathBuf, ServiceError> {
        let response = self
            .client
            .get(self.notebook_url(notebook, "/artifacts/audio/content"))
            .send()
            .await?;
        let response = ensure_success(response).await?;

        // Written beside the destination and renamed, so `dest` never holds a partial file.
        let name = dest
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio");
        let temp = dest.with_file_name(format!(".{}.{}.part", name, uuid::Uuid::new_v4()));

        let mut file = tokio::fs::File::create(&temp).await?;
        match Self::stream_to_file(response, &mut file).await {
            Ok(bytes) => {
                drop(file);
                tokio::fs::rename(&temp, dest).await?;
                tracing::debug!(path = %dest.display(), bytes, "Audio downloaded");
                Ok(dest.to_path_buf())
            }
            Err(e) => {
                drop(file);
                if let Err(cleanup) = tokio::fs::remove_file(&temp).await {
                    tracing::warn!(path = %temp.display(), "Failed to remove partial download: {}", cleanup);
                }
                Err(e)
            }
        }
    }

    async fn close(&self) {
        tracing::debug!(base_url = %self.base_url, "Notebook session closed");
    }
}

/// Opens [`HttpNotebookClient`] sessions from the persisted storage file.
#[derive(Debug, Clone)]
pub struct HttpSessionFactory {
    config: ClientConfig,
}

impl HttpSessionFactory {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SessionFactory for HttpSessionFactory {
    type Session = HttpNotebookClient;

    async fn open(&self) -> Result<HttpNotebookClient, ServiceError> {
        let storage = StorageState::load(&self.config.storage_path).await?;
        let client = HttpNotebookClient::new(&self.config, &storage)?;
        tracing::info!(base_url = %client.base_url(), "Notebook session opened");
        Ok(client)
    }
}

/// Returns the response unchanged on 2xx, otherwise [`ServiceError::Api`] with the body text.
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(ServiceError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

async fn parse_response<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T, ServiceError> {
    let response = ensure_success(response).await?;
    Ok(response.json::<T>().await?)
}
