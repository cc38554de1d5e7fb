//! Per-session view state.
//!
//! Each browser session gets a [`Workspace`] holding the single "currently
//! displayed file" slot and its own upload coordinator. Workspaces are
//! identified by UUID (carried in a cookie) and kept in memory only.
//!
//! # Architecture
//!
//! - [`ViewState`]: `NoFile | DisplayingFile(record)` with explicit transitions
//! - [`Workspace`]: one session's view plus uploader
//! - [`WorkspaceStore`]: thread-safe store for all active workspaces

mod view;
mod workspace;

pub use view::ViewState;
pub use workspace::{Workspace, WorkspaceStore};
