//! Records and options exchanged with the storage service.
//!
//! These types mirror the service's JSON DTOs (camelCase on the wire).

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// File Records
// =============================================================================

/// Lifecycle stage of a file inside the storage service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    /// Stored, OCR not started yet.
    Pending,
    /// OCR running.
    Processing,
    /// OCR finished; metadata is authoritative.
    Completed,
    /// OCR gave up.
    Failed,
}

impl ProcessingStatus {
    /// Wire name of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OCR output attached to a file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrMetadata {
    /// Full extracted text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_text: Option<String>,
    /// Confidence score in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// Service-side metadata of a file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    /// OCR results, once the service produced any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr_data: Option<OcrMetadata>,
}

/// An uploaded file as described by the storage service.
///
/// Records are created by the service and never mutated locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Opaque identifier.
    pub id: String,
    /// Filename as uploaded.
    pub original_name: String,
    /// MIME type.
    pub file_type: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Publicly resolvable content URL.
    pub url: String,
    /// Where the file is in the OCR pipeline.
    pub processing_status: ProcessingStatus,
    /// Service metadata (OCR data lives here).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<FileMetadata>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl FileRecord {
    /// Raw OCR metadata, regardless of processing status.
    #[must_use]
    pub fn ocr(&self) -> Option<&OcrMetadata> {
        self.metadata.as_ref().and_then(|m| m.ocr_data.as_ref())
    }

    /// Whether OCR metadata can be trusted.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.processing_status == ProcessingStatus::Completed
    }

    /// Extracted text, only when processing completed and the text is non-empty.
    ///
    /// Stale text on a `processing` or `failed` record is never returned.
    #[must_use]
    pub fn extracted_text(&self) -> Option<&str> {
        if !self.is_completed() {
            return None;
        }
        self.ocr()
            .and_then(|ocr| ocr.full_text.as_deref())
            .filter(|text| !text.is_empty())
    }

    /// Confidence score, only when processing completed.
    #[must_use]
    pub fn confidence(&self) -> Option<f64> {
        if !self.is_completed() {
            return None;
        }
        self.ocr().and_then(|ocr| ocr.confidence)
    }

    /// Whether the file should be previewed as an image.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.file_type.starts_with("image/")
    }
}

// =============================================================================
// Upload Input
// =============================================================================

/// A file handed to the storage service.
#[derive(Debug, Clone)]
pub struct UploadPayload {
    /// Filename reported by the browser.
    pub file_name: String,
    /// MIME type reported by the browser (or guessed from the name).
    pub content_type: String,
    /// File contents.
    pub data: Bytes,
}

impl UploadPayload {
    /// Build a payload, guessing the MIME type from the filename when none is given.
    pub fn new(
        file_name: impl Into<String>,
        content_type: Option<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        let file_name = file_name.into();
        let content_type = content_type
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or_else(|| {
                mime_guess::from_path(&file_name)
                    .first_or_octet_stream()
                    .to_string()
            });
        Self {
            file_name,
            content_type,
            data: data.into(),
        }
    }

    /// Size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Callback receiving upload progress as an integer percentage (0–100).
pub type ProgressCallback = Arc<dyn Fn(u8) + Send + Sync>;

/// Options for a single upload.
#[derive(Clone, Default)]
pub struct UploadOptions {
    /// Processing context, selects the service's extraction pipeline.
    pub context: String,
    /// Free-form string tags stored with the file.
    pub tags: BTreeMap<String, String>,
    /// Progress callback.
    pub on_progress: Option<ProgressCallback>,
}

impl UploadOptions {
    /// Options for the given processing context.
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            ..Default::default()
        }
    }

    /// Add a tag.
    #[must_use]
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Register a progress callback.
    #[must_use]
    pub fn on_progress(mut self, callback: impl Fn(u8) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Arc::new(callback));
        self
    }

    /// Report progress to the callback, if any.
    pub fn report_progress(&self, percent: u8) {
        if let Some(cb) = &self.on_progress {
            cb(percent.min(100));
        }
    }
}

impl fmt::Debug for UploadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadOptions")
            .field("context", &self.context)
            .field("tags", &self.tags)
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn record(status: ProcessingStatus, text: Option<&str>) -> FileRecord {
        FileRecord {
            id: "file_1".to_string(),
            original_name: "receipt.png".to_string(),
            file_type: "image/png".to_string(),
            size_bytes: 2048,
            url: "https://cdn.example.com/receipt.png".to_string(),
            processing_status: status,
            metadata: Some(FileMetadata {
                ocr_data: Some(OcrMetadata {
                    full_text: text.map(str::to_string),
                    confidence: Some(0.9),
                }),
            }),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_decode_service_json() {
        let json = r#"{
            "id": "f_123",
            "originalName": "lunch.jpg",
            "fileType": "image/jpeg",
            "sizeBytes": 48213,
            "url": "https://cdn.example.com/f_123",
            "processingStatus": "completed",
            "createdAt": "2025-01-15T10:30:00Z",
            "tenantId": "ignored",
            "metadata": { "ocrData": { "fullText": "TOTAL 12.50", "confidence": 0.873 } }
        }"#;
        let file: FileRecord = serde_json::from_str(json).unwrap();
        assert_eq!(file.original_name, "lunch.jpg");
        assert_eq!(file.size_bytes, 48213);
        assert_eq!(file.processing_status, ProcessingStatus::Completed);
        assert_eq!(file.extracted_text(), Some("TOTAL 12.50"));
        assert_eq!(file.confidence(), Some(0.873));
    }

    #[test]
    fn test_decode_without_metadata() {
        let json = r#"{
            "id": "f_1", "originalName": "a.pdf", "fileType": "application/pdf",
            "sizeBytes": 0, "url": "u", "processingStatus": "pending",
            "createdAt": "2025-01-15T10:30:00Z"
        }"#;
        let file: FileRecord = serde_json::from_str(json).unwrap();
        assert!(file.ocr().is_none());
        assert!(file.extracted_text().is_none());
        assert!(!file.is_image());
    }

    #[test]
    fn test_stale_text_hidden_unless_completed() {
        for status in [
            ProcessingStatus::Pending,
            ProcessingStatus::Processing,
            ProcessingStatus::Failed,
        ] {
            let file = record(status, Some("stale text"));
            assert_eq!(file.extracted_text(), None, "status {status}");
            assert_eq!(file.confidence(), None, "status {status}");
        }
        let file = record(ProcessingStatus::Completed, Some("fresh"));
        assert_eq!(file.extracted_text(), Some("fresh"));
    }

    #[test]
    fn test_empty_text_is_absent() {
        let file = record(ProcessingStatus::Completed, Some(""));
        assert_eq!(file.extracted_text(), None);
    }

    #[test]
    fn test_payload_guesses_mime() {
        let payload = UploadPayload::new("scan.pdf", None, vec![1_u8, 2, 3]);
        assert_eq!(payload.content_type, "application/pdf");
        assert_eq!(payload.len(), 3);

        let payload = UploadPayload::new("blob", Some(String::new()), Vec::<u8>::new());
        assert_eq!(payload.content_type, "application/octet-stream");
        assert!(payload.is_empty());
    }

    #[test]
    fn test_options_report_progress_clamps() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let options = UploadOptions::new("invoice")
            .tag("source", "test")
            .on_progress(move |p| sink.lock().unwrap().push(p));

        options.report_progress(40);
        options.report_progress(250);

        assert_eq!(*seen.lock().unwrap(), vec![40, 100]);
        assert_eq!(options.tags.get("source").map(String::as_str), Some("test"));
    }
}
