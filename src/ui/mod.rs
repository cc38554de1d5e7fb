//! Server-rendered HTML.
//!
//! Pages are plain strings built with `format!`, enhanced with htmx
//! attributes. Every screen also works as a plain form post without
//! JavaScript.
//!
//! # Structure
//!
//! - [`app`]: Page shell and the swappable `#app-view` region
//! - [`uploader`]: Drop zone, progress bar and error banner
//! - [`results`]: Preview, extracted text and file details
//! - [`components`]: Reusable pieces (card, badge, button, icons)

pub mod app;
pub mod components;
pub mod results;
pub mod uploader;

/// Escape text for HTML element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
