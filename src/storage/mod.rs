//! Client for the external storage-and-OCR service.
//!
//! All storage, OCR extraction and status tracking happens in the service;
//! this module only builds a configured handle and speaks its upload API.
//!
//! # Usage
//!
//! ```rust,ignore
//! use receipt_ocr::storage::{StorageClientFactory, UploadOptions, UploadPayload};
//!
//! let client = StorageClientFactory::create(&config.storage)?;
//! let payload = UploadPayload::new("receipt.jpg", None, bytes);
//! let record = client
//!     .upload(payload, UploadOptions::new("invoice").on_progress(|p| println!("{p}%")))
//!     .await?;
//! ```

mod client;
mod error;
mod factory;
mod progress;
mod types;

pub use client::{StorageBrainClient, StorageClient};
pub use error::{GENERIC_UPLOAD_FAILURE, Result, StorageError};
pub use factory::StorageClientFactory;
pub use progress::{CHUNK_SIZE, ProgressReporter, progress_stream};
pub use types::{
    FileMetadata, FileRecord, OcrMetadata, ProcessingStatus, ProgressCallback, UploadOptions,
    UploadPayload,
};
