//! Page shell and the main view switch.

use crate::session::ViewState;
use crate::ui::{escape, results, uploader};
use crate::upload::UploadState;

/// Id of the region htmx swaps after upload and reset.
pub const APP_VIEW_ID: &str = "app-view";

/// Render a full HTML document around `content`, loading htmx from
/// `htmx_src`.
pub fn page(content: &str, htmx_src: &str) -> String {
    let htmx_src = escape(htmx_src);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="Upload receipts and invoices to extract text with OCR">
    <title>Receipt OCR</title>

    <script src="{htmx_src}"></script>
    <link rel="stylesheet" href="/static/app.css">
</head>
<body class="min-h-screen bg-gray-50 text-gray-900 antialiased">
    <div id="app-shell" class="flex flex-col min-h-screen">
        <header class="bg-white border-b border-gray-200">
            <div class="container mx-auto px-4 py-4 max-w-5xl">
                <a href="/" class="text-xl font-semibold">Receipt OCR</a>
                <p class="text-sm text-gray-500">Upload a receipt or invoice to extract its text</p>
            </div>
        </header>

        <main id="app" class="flex-1 container mx-auto px-4 py-8 max-w-5xl">
            <div id="{APP_VIEW_ID}">
{content}
            </div>
        </main>

        <footer class="py-4">
            <p class="text-xs text-gray-400 text-center">
                Storage and OCR by Storage Brain
            </p>
        </footer>
    </div>
</body>
</html>"#
    )
}

/// Contents of `#app-view`: the uploader while nothing is displayed,
/// otherwise the results of the current file.
pub fn app_view(view: &ViewState, upload: &UploadState) -> String {
    match view.current() {
        Some(record) => results::results(record),
        None => uploader::uploader(upload),
    }
}
