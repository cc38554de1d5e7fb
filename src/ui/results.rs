//! Results screen: preview, extracted text and file details.

use crate::presenter::{Preview, ResultsView, TextPanel};
use crate::storage::FileRecord;
use crate::ui::components::{BadgeVariant, ButtonVariant, badge, button, card, document_icon};
use crate::ui::escape;

const COPY_SCRIPT: &str = "navigator.clipboard.writeText(document.getElementById('ocr-text').textContent)\
.then(() => { this.textContent = 'Copied!'; setTimeout(() => this.textContent = 'Copy', 2000); })";

/// Render the results screen for `record`.
pub fn results(record: &FileRecord) -> String {
    render(&ResultsView::from_record(record))
}

/// Render a prepared view model.
pub fn render(view: &ResultsView) -> String {
    let reset = button(ButtonVariant::Outline, r#"type="submit""#, "Upload Another");

    format!(
        r##"<div class="results space-y-6">
    <div class="flex items-center justify-between">
        <div>
            <h2 class="text-xl font-semibold break-all">{title}</h2>
            <p class="text-sm text-gray-500">Uploaded <time datetime="{iso}">{uploaded_at}</time></p>
        </div>
        <form action="/reset" method="post" hx-post="/reset" hx-target="#app-view">
            {reset}
        </form>
    </div>
    <div class="grid gap-6 md:grid-cols-2">
        {preview}
        {text}
    </div>
    {details}
</div>"##,
        title = escape(&view.title),
        iso = escape(&view.uploaded_at_iso),
        uploaded_at = escape(&view.uploaded_at),
        preview = card("Preview", "", &preview(&view.preview)),
        text = text_card(view),
        details = card("File Details", "", &details(view)),
    )
}

fn preview(preview: &Preview) -> String {
    match preview {
        Preview::Image { url, alt } => format!(
            r#"<img src="{}" alt="{}" class="w-full max-h-96 object-contain rounded-lg">"#,
            escape(url),
            escape(alt)
        ),
        Preview::Document { label } => format!(
            r#"<div class="document-placeholder flex flex-col items-center justify-center gap-2 h-64 text-gray-400">
    {}
    <span class="text-sm">{}</span>
</div>"#,
            document_icon("h-16 w-16"),
            escape(label)
        ),
    }
}

fn text_card(view: &ResultsView) -> String {
    let confidence = view
        .confidence
        .as_deref()
        .map(|pct| badge(BadgeVariant::Success, &format!("{pct} confidence"), "confidence-badge"))
        .unwrap_or_default();

    let body = match &view.text {
        TextPanel::Extracted(text) => {
            let copy = button(
                ButtonVariant::Subtle,
                &format!(r#"type="button" onclick="{COPY_SCRIPT}""#),
                "Copy",
            );
            // HTML parsing eats the first newline after <pre>; give it this one
            // so copied text stays verbatim.
            format!(
                r#"<pre id="ocr-text" class="whitespace-pre-wrap text-sm font-mono bg-gray-50 rounded-lg p-3 max-h-96 overflow-y-auto">
{}</pre>
<div class="mt-3 flex items-center gap-3">
    {copy}
    <a href="/results/text" class="text-sm text-gray-500 underline">Plain text</a>
</div>"#,
                escape(text)
            )
        }
        TextPanel::Message(message) => format!(
            r#"<p class="text-sm text-gray-500 italic">{}</p>"#,
            escape(message)
        ),
    };

    card("Extracted Text", &confidence, &body)
}

fn details(view: &ResultsView) -> String {
    let d = &view.details;
    let status = badge(
        BadgeVariant::for_status(d.status),
        d.status.as_str(),
        "status-badge",
    );
    format!(
        r#"<dl class="grid grid-cols-[auto_1fr] gap-x-6 gap-y-2 text-sm">
    <dt class="text-gray-500">File ID</dt><dd class="font-mono break-all">{id}</dd>
    <dt class="text-gray-500">Type</dt><dd>{file_type}</dd>
    <dt class="text-gray-500">Size</dt><dd>{size}</dd>
    <dt class="text-gray-500">Status</dt><dd>{status}</dd>
</dl>"#,
        id = escape(&d.id),
        file_type = escape(&d.file_type),
        size = escape(&d.size),
    )
}
