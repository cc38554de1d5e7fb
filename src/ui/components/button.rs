//! Button component with variants.

/// Button visual variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonVariant {
    /// Primary action button.
    #[default]
    Primary,
    /// Outline button.
    Outline,
    /// Tinted, low-emphasis button.
    Subtle,
}

impl ButtonVariant {
    /// Get CSS classes for this variant.
    #[must_use]
    pub fn classes(self) -> &'static str {
        match self {
            Self::Primary => "text-white bg-blue-600 hover:bg-blue-700",
            Self::Outline => "text-gray-700 bg-white border border-gray-300 hover:bg-gray-50",
            Self::Subtle => "text-blue-600 bg-blue-50 hover:bg-blue-100",
        }
    }
}

/// Render a `<button>`.
///
/// `attrs` is inserted verbatim (caller-controlled markup only); `label`
/// must already be safe HTML.
pub fn button(variant: ButtonVariant, attrs: &str, label: &str) -> String {
    format!(
        r#"<button {attrs} class="px-4 py-2 text-sm font-medium rounded-lg transition-colors {}">{label}</button>"#,
        variant.classes()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_markup() {
        let html = button(ButtonVariant::Outline, r#"type="submit""#, "Upload Another");
        assert!(html.starts_with(r#"<button type="submit""#));
        assert!(html.contains("border-gray-300"));
        assert!(html.ends_with("Upload Another</button>"));
    }
}
