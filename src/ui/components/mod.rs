//! Reusable HTML components.
//!
//! # Components
//!
//! - [`button`]: Clickable button with variants
//! - [`card`]: Titled panel
//! - [`badge`]: Status badge
//! - icons: inline SVG icons

mod badge;
mod button;
mod card;
mod icons;

pub use badge::{BadgeVariant, badge};
pub use button::{ButtonVariant, button};
pub use card::card;
pub use icons::{document_icon, spinner_icon, upload_icon};
