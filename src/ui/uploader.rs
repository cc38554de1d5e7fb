//! Upload widget: drop zone, file picker, progress bar and error banner.
//!
//! The form posts to `/upload`. With htmx loaded it is submitted in the
//! background and the progress panel polls `/upload/progress` while the
//! request is pending; htmx marks the form with `htmx-request`, which the
//! stylesheet uses to swap the drop zone for the progress panel.

use crate::ui::components::{ButtonVariant, button, spinner_icon, upload_icon};
use crate::ui::escape;
use crate::upload::UploadState;

/// MIME types offered by the file picker. Advisory only.
pub const ACCEPT: &str = "image/*,application/pdf";

const DROP_HANDLERS: &str = concat!(
    r#"ondragover="event.preventDefault(); this.classList.add('is-dragging')" "#,
    r#"ondragleave="this.classList.remove('is-dragging')" "#,
    r#"ondrop="event.preventDefault(); this.classList.remove('is-dragging'); "#,
    r#"const input = this.querySelector('input[type=file]'); "#,
    r#"if (input.disabled || !event.dataTransfer.files.length) return; "#,
    r#"input.files = event.dataTransfer.files; input.form.requestSubmit()""#,
);

/// Render the widget for the given state.
pub fn uploader(state: &UploadState) -> String {
    if state.is_uploading {
        return uploading(state);
    }

    let banner = state.error.as_deref().map(error_banner).unwrap_or_default();
    let submit = button(ButtonVariant::Primary, r#"type="submit""#, "Upload");

    format!(
        r##"<div class="uploader space-y-4">
    {banner}
    <form class="upload-form" action="/upload" method="post" enctype="multipart/form-data"
          hx-post="/upload" hx-encoding="multipart/form-data" hx-target="#app-view"
          hx-disabled-elt="find input[type=file]">
        <label class="dropzone flex flex-col items-center justify-center gap-3 p-12 border-2 border-dashed border-gray-300 rounded-xl bg-white cursor-pointer hover:border-blue-400 transition-colors"
               {DROP_HANDLERS}>
            {icon}
            <span class="text-lg font-medium">Drop your receipt here</span>
            <span class="text-sm text-gray-500">or click to browse</span>
            <span class="text-xs text-gray-400">Supports JPG, PNG, WebP, GIF, AVIF, and PDF</span>
            <input type="file" name="file" accept="{ACCEPT}" class="sr-only"
                   onchange="if (this.files.length) this.form.requestSubmit()">
        </label>
        <noscript><div class="mt-4 text-center">{submit}</div></noscript>
        <div class="progress-panel p-8 bg-white rounded-xl border border-gray-200"
             hx-get="/upload/progress" hx-swap="innerHTML"
             hx-trigger="every 500ms [this.closest('form').classList.contains('htmx-request')]">
            {progress}
        </div>
    </form>
</div>"##,
        icon = upload_icon("h-12 w-12 text-gray-400"),
        progress = progress(state),
    )
}

/// Page rendered while an upload is already in flight: no form, just the
/// progress panel, polling until the upload settles.
fn uploading(state: &UploadState) -> String {
    format!(
        r#"<div class="uploader space-y-4">
    <div class="progress-panel is-active p-8 bg-white rounded-xl border border-gray-200"
         hx-get="/upload/progress?follow=1" hx-trigger="every 500ms" hx-swap="innerHTML">
        {progress}
    </div>
    <noscript><p class="text-sm text-center text-gray-500"><a href="/" class="underline">Refresh</a> to see the result.</p></noscript>
</div>"#,
        progress = progress(state),
    )
}

/// Inner content of the progress panel.
pub fn progress(state: &UploadState) -> String {
    let percent = state.progress.min(100);
    format!(
        r#"<div class="flex flex-col items-center gap-3" aria-live="polite">
    {spinner}
    <p class="font-medium">Processing receipt...</p>
    <p class="text-sm text-gray-500">Extracting text with OCR</p>
    <div class="w-full h-2 bg-gray-200 rounded-full overflow-hidden" role="progressbar" aria-valuemin="0" aria-valuemax="100" aria-valuenow="{percent}">
        <div class="h-full bg-blue-600 transition-all" style="width: {percent}%"></div>
    </div>
    <p class="text-xs text-gray-500">{percent}%</p>
</div>"#,
        spinner = spinner_icon("h-8 w-8 text-blue-600"),
    )
}

fn error_banner(message: &str) -> String {
    format!(
        r#"<div class="error-banner p-4 rounded-lg bg-red-50 border border-red-200 text-sm text-red-700" role="alert">{}</div>"#,
        escape(message)
    )
}
