//! Upload coordination.
//!
//! The coordinator owns the drag/drop/select interaction: it picks the first
//! file of a selection, calls the storage client with the fixed invoice
//! context and provenance tag, tracks progress, and turns failures into a
//! display message.
//!
//! # Example
//!
//! ```rust,ignore
//! use receipt_ocr::upload::{UploadCoordinator, UploadOutcome};
//!
//! let coordinator = UploadCoordinator::new(client);
//! match coordinator.submit(files).await {
//!     UploadOutcome::Completed(record) => println!("uploaded {}", record.id),
//!     UploadOutcome::Failed(message) => eprintln!("{message}"),
//!     UploadOutcome::Refused(reason) => eprintln!("{reason:?}"),
//! }
//! ```

mod coordinator;

pub use coordinator::{
    PROCESSING_CONTEXT, Refusal, SOURCE_TAG, UploadCoordinator, UploadOutcome, UploadPhase,
    UploadState,
};
