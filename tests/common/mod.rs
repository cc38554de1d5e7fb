//! Shared test fixtures: a scripted storage client and record builders.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use receipt_ocr::storage::{
    FileMetadata, FileRecord, OcrMetadata, ProcessingStatus, StorageClient, StorageError,
    UploadOptions, UploadPayload,
};
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// What the fake saw for one upload call.
#[derive(Debug, Clone)]
pub struct SeenUpload {
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
    pub context: String,
    pub tags: BTreeMap<String, String>,
}

/// Storage client that replays scripted results.
///
/// Each call reports `progress` steps, then waits on the gate (if any),
/// then pops the next scripted result. `Err(message)` becomes
/// `StorageError::Upload(message)`.
#[derive(Debug, Default)]
pub struct FakeStorage {
    results: Mutex<VecDeque<Result<FileRecord, String>>>,
    progress: Vec<u8>,
    gate: Option<Arc<Notify>>,
    seen: Mutex<Vec<SeenUpload>>,
}

impl FakeStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn succeed(self, record: FileRecord) -> Self {
        self.results.lock().unwrap().push_back(Ok(record));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.results
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn with_progress(mut self, steps: &[u8]) -> Self {
        self.progress = steps.to_vec();
        self
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn seen(&self) -> Vec<SeenUpload> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl StorageClient for FakeStorage {
    async fn upload(
        &self,
        payload: UploadPayload,
        options: UploadOptions,
    ) -> receipt_ocr::storage::Result<FileRecord> {
        self.seen.lock().unwrap().push(SeenUpload {
            file_name: payload.file_name.clone(),
            content_type: payload.content_type.clone(),
            size: payload.len(),
            context: options.context.clone(),
            tags: options.tags.clone(),
        });

        for step in &self.progress {
            options.report_progress(*step);
        }

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let next = self.results.lock().unwrap().pop_front();
        match next {
            Some(Ok(record)) => Ok(record),
            Some(Err(message)) => Err(StorageError::Upload(message)),
            None => Err(StorageError::Upload("no scripted result".to_string())),
        }
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

/// A record as the service returns it after OCR.
pub fn record(name: &str, file_type: &str, text: Option<&str>, confidence: Option<f64>) -> FileRecord {
    FileRecord {
        id: format!("file_{}", name.replace('.', "_")),
        original_name: name.to_string(),
        file_type: file_type.to_string(),
        size_bytes: 48_213,
        url: format!("https://cdn.example.com/files/{name}"),
        processing_status: ProcessingStatus::Completed,
        metadata: Some(FileMetadata {
            ocr_data: Some(OcrMetadata {
                full_text: text.map(str::to_string),
                confidence,
            }),
        }),
        created_at: Utc.with_ymd_and_hms(2026, 10, 1, 14, 30, 0).unwrap(),
    }
}

pub fn payload(name: &str) -> UploadPayload {
    UploadPayload::new(name, None, name.as_bytes().to_vec())
}
