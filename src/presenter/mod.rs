//! Results presentation.
//!
//! [`ResultsView::from_record`] turns a [`FileRecord`](crate::storage::FileRecord)
//! into everything the results screen shows; the `ui` module renders it.

mod format;
mod results;

pub use format::{confidence_label, confidence_percent, format_bytes, format_timestamp};
pub use results::{FileDetails, Preview, ResultsView, TextPanel, status_message};
