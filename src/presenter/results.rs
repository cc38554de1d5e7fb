//! View model of the results screen.

use serde::Serialize;

use super::format::{confidence_label, format_bytes, format_timestamp};
use crate::storage::{FileRecord, ProcessingStatus};

/// What the preview panel shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Preview {
    /// Render the content URL as an image.
    Image {
        /// Content URL.
        url: String,
        /// Alt text (the original filename).
        alt: String,
    },
    /// Generic document placeholder (PDFs and any non-image type).
    Document {
        /// Caption under the placeholder icon.
        label: &'static str,
    },
}

/// What the extracted-text panel shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TextPanel {
    /// Extracted text, copyable verbatim.
    Extracted(String),
    /// Status-dependent message in place of text.
    Message(&'static str),
}

/// Rows of the file details table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDetails {
    /// File ID.
    pub id: String,
    /// MIME type.
    pub file_type: String,
    /// Human-readable size.
    pub size: String,
    /// Processing status (drives the badge color).
    pub status: ProcessingStatus,
}

/// Everything the results screen renders, derived from one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsView {
    /// Original filename.
    pub title: String,
    /// Human-readable upload time.
    pub uploaded_at: String,
    /// RFC 3339 upload time.
    pub uploaded_at_iso: String,
    /// Preview panel.
    pub preview: Preview,
    /// Extracted text panel.
    pub text: TextPanel,
    /// Confidence badge label, e.g. `"87%"`.
    pub confidence: Option<String>,
    /// Metadata table.
    pub details: FileDetails,
}

impl ResultsView {
    /// Build the view model. Pure: depends only on `record`.
    pub fn from_record(record: &FileRecord) -> Self {
        Self {
            title: record.original_name.clone(),
            uploaded_at: format_timestamp(&record.created_at),
            uploaded_at_iso: record.created_at.to_rfc3339(),
            preview: preview(record),
            text: text_panel(record),
            confidence: record.confidence().map(confidence_label),
            details: FileDetails {
                id: record.id.clone(),
                file_type: record.file_type.clone(),
                size: format_bytes(record.size_bytes),
                status: record.processing_status,
            },
        }
    }
}

fn preview(record: &FileRecord) -> Preview {
    if record.is_image() {
        Preview::Image {
            url: record.url.clone(),
            alt: record.original_name.clone(),
        }
    } else if record.file_type == "application/pdf" {
        Preview::Document {
            label: "PDF Document",
        }
    } else {
        Preview::Document { label: "Document" }
    }
}

fn text_panel(record: &FileRecord) -> TextPanel {
    match record.extracted_text() {
        Some(text) => TextPanel::Extracted(text.to_string()),
        None => TextPanel::Message(status_message(record.processing_status)),
    }
}

/// Message shown when there is no text to display.
pub fn status_message(status: ProcessingStatus) -> &'static str {
    match status {
        ProcessingStatus::Processing => "OCR processing in progress...",
        ProcessingStatus::Failed => "OCR processing failed",
        ProcessingStatus::Pending | ProcessingStatus::Completed => "No text extracted",
    }
}
