//! Card component: titled panel with a header bar.

use crate::ui::escape;

/// Render a card.
///
/// `title` is escaped; `header_extra` and `body` must already be safe HTML.
///
/// # Example
///
/// ```rust,ignore
/// card("Preview", "", &preview_html);
/// ```
pub fn card(title: &str, header_extra: &str, body: &str) -> String {
    format!(
        r#"<section class="bg-white rounded-xl shadow-sm border border-gray-200 overflow-hidden">
    <div class="px-4 py-3 border-b border-gray-200 bg-gray-50 flex items-center justify-between">
        <h3 class="font-medium text-gray-900">{}</h3>
        {header_extra}
    </div>
    <div class="p-4">
        {body}
    </div>
</section>"#,
        escape(title)
    )
}
