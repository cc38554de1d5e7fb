//! Which screen a workspace shows.

use serde::Serialize;

use crate::storage::FileRecord;

/// Two-screen navigation: the uploader, or the results for one file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "view", content = "file", rename_all = "snake_case")]
pub enum ViewState {
    /// No file displayed; the upload widget is shown.
    #[default]
    NoFile,
    /// Results for the most recent upload.
    DisplayingFile(FileRecord),
}

impl ViewState {
    /// Display `record`, replacing whatever was shown.
    pub fn show(&mut self, record: FileRecord) {
        *self = Self::DisplayingFile(record);
    }

    /// Discard the displayed record and return to the uploader.
    ///
    /// Returns the discarded record, if any.
    pub fn reset(&mut self) -> Option<FileRecord> {
        match std::mem::take(self) {
            Self::DisplayingFile(record) => Some(record),
            Self::NoFile => None,
        }
    }

    /// The displayed record.
    #[must_use]
    pub fn current(&self) -> Option<&FileRecord> {
        match self {
            Self::DisplayingFile(record) => Some(record),
            Self::NoFile => None,
        }
    }

    /// Whether the uploader is shown.
    #[must_use]
    pub fn is_uploader(&self) -> bool {
        matches!(self, Self::NoFile)
    }
}
