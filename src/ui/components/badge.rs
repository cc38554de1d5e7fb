//! Badge component for status indicators and tags.

use crate::storage::ProcessingStatus;
use crate::ui::escape;

/// Badge visual variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BadgeVariant {
    /// Neutral gray.
    #[default]
    Default,
    /// Success/positive badge.
    Success,
    /// Warning badge.
    Warning,
    /// Error/destructive badge.
    Error,
}

impl BadgeVariant {
    /// Get CSS classes for this variant.
    #[must_use]
    pub fn classes(self) -> &'static str {
        match self {
            Self::Default => "bg-gray-100 text-gray-700",
            Self::Success => "bg-green-100 text-green-700",
            Self::Warning => "bg-yellow-100 text-yellow-700",
            Self::Error => "bg-red-100 text-red-700",
        }
    }

    /// Color of a processing status.
    #[must_use]
    pub fn for_status(status: ProcessingStatus) -> Self {
        match status {
            ProcessingStatus::Completed => Self::Success,
            ProcessingStatus::Processing => Self::Warning,
            ProcessingStatus::Failed => Self::Error,
            ProcessingStatus::Pending => Self::Default,
        }
    }
}

/// Render a badge; `text` is escaped.
///
/// # Example
///
/// ```rust,ignore
/// badge(BadgeVariant::Success, "completed", "status-badge");
/// ```
pub fn badge(variant: BadgeVariant, text: &str, class: &str) -> String {
    format!(
        r#"<span class="inline-flex items-center px-2 py-0.5 rounded-full text-xs font-medium {} {}">{}</span>"#,
        variant.classes(),
        class,
        escape(text)
    )
}
