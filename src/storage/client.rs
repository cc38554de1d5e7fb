//! Storage service client.

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use super::error::{Result, StorageError};
use super::progress::progress_stream;
use super::types::{FileRecord, UploadOptions, UploadPayload};

/// Capability exposed by the storage-and-OCR service.
///
/// The concrete HTTP client implements this; tests substitute a fake that
/// resolves or rejects deterministically.
#[async_trait]
pub trait StorageClient: Send + Sync + std::fmt::Debug {
    /// Upload a file and return the record the service created for it.
    ///
    /// `options.on_progress` is called with 0–100 while the body is sent.
    async fn upload(&self, payload: UploadPayload, options: UploadOptions) -> Result<FileRecord>;

    /// Name of the backing service, for logging.
    fn provider_name(&self) -> &'static str;
}

/// HTTP client for the Storage Brain API.
#[derive(Debug, Clone)]
pub struct StorageBrainClient {
    base_url: Url,
    api_key: String,
    http: reqwest::Client,
}

impl StorageBrainClient {
    /// Path of the upload endpoint, relative to the base URL.
    const UPLOAD_PATH: &'static str = "api/v1/files";

    /// Create a client. No request is made here.
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Self {
        Self::with_client(base_url, api_key, reqwest::Client::new())
    }

    /// Create a client with a custom reqwest client.
    pub fn with_client(base_url: Url, api_key: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            base_url: ensure_trailing_slash(base_url),
            api_key: api_key.into(),
            http,
        }
    }

    fn url(&self, path: &str) -> Url {
        self.base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone())
    }

    async fn handle_response(response: reqwest::Response) -> Result<FileRecord> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(StorageError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        serde_json::from_str::<UploadResponse>(&body)
            .map(UploadResponse::into_record)
            .map_err(|e| StorageError::Decode(e.to_string()))
    }
}

#[async_trait]
impl StorageClient for StorageBrainClient {
    async fn upload(&self, payload: UploadPayload, options: UploadOptions) -> Result<FileRecord> {
        let UploadPayload {
            file_name,
            content_type,
            data,
        } = payload;
        let size = data.len() as u64;

        tracing::debug!(
            file_name = %file_name,
            content_type = %content_type,
            size_bytes = size,
            context = %options.context,
            "Uploading file to storage service"
        );

        let body = reqwest::Body::wrap_stream(progress_stream(data, options.on_progress.clone()));
        let part = reqwest::multipart::Part::stream_with_length(body, size)
            .file_name(file_name)
            .mime_str(&content_type)
            .map_err(|e| StorageError::Upload(format!("Invalid content type: {e}")))?;

        let tags = serde_json::to_string(&options.tags)
            .map_err(|e| StorageError::Upload(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("context", options.context.clone())
            .text("tags", tags);

        let response = self
            .http
            .post(self.url(Self::UPLOAD_PATH))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let record = Self::handle_response(response).await?;
        options.report_progress(100);
        Ok(record)
    }

    fn provider_name(&self) -> &'static str {
        "Storage Brain"
    }
}

/// Upload responses come either bare or wrapped in `{"file": ...}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum UploadResponse {
    Wrapped { file: FileRecord },
    Bare(FileRecord),
}

impl UploadResponse {
    fn into_record(self) -> FileRecord {
        match self {
            Self::Wrapped { file } | Self::Bare(file) => file,
        }
    }
}

/// Pull a message out of an error body: `error.message`, `error`, `message`,
/// or the raw text.
fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };

    let candidates = [
        value.pointer("/error/message"),
        value.get("error"),
        value.get("message"),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(|v| v.as_str())
        .map_or_else(|| body.trim().to_string(), str::to_string)
}

fn ensure_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
