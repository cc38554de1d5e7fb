//! Receipt OCR
//!
//! A small web application that uploads a receipt or invoice (image or PDF)
//! to the Storage Brain storage-and-OCR service and shows the extracted text
//! next to the file's metadata.
//!
//! # Architecture
//!
//! - **Server**: Axum, server-rendered HTML enhanced with htmx
//! - **Storage client**: reqwest multipart upload with streamed progress
//! - **Sessions**: one in-memory workspace per browser (cookie)
//!
//! # Modules
//!
//! - [`storage`]: Service client, factory, record types and errors
//! - [`upload`]: Upload coordinator (one upload at a time, progress, errors)
//! - [`presenter`]: Results view model and display formatting
//! - [`session`]: Per-browser view state and workspace store
//! - [`ui`]: HTML rendering
//! - [`server`]: Router and handlers

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::implicit_hasher)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod config;
pub mod error;
pub mod presenter;
pub mod server;
pub mod session;
pub mod storage;
pub mod telemetry;
pub mod ui;
pub mod upload;

use crate::config::AppConfig;

use session::WorkspaceStore;
use std::sync::Arc;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Per-browser workspaces.
    pub workspaces: WorkspaceStore,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("workspaces", &self.workspaces.len())
            .field("config", &self.config)
            .finish()
    }
}
