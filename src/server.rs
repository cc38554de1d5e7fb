use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use tracing::info;

use crate::AppState;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::session::{ViewState, Workspace, WorkspaceStore};
use crate::storage::{StorageClient, UploadPayload};
use crate::ui::{app, uploader};
use crate::upload::{Refusal, UploadOutcome, UploadPhase, UploadState};

/// Cookie carrying the workspace id.
pub const SESSION_COOKIE: &str = "receipt_ocr_session";

/// Longest a follow poll waits for the upload to settle; below the
/// page's 500 ms poll interval.
const FOLLOW_WAIT: Duration = Duration::from_millis(400);

/// Start the Axum server with the provided configuration.
pub async fn start_server(
    config: Arc<AppConfig>,
    client: Arc<dyn StorageClient>,
) -> anyhow::Result<()> {
    info!(
        name: "storage.config.loaded",
        provider = client.provider_name(),
        base_url = %config.storage.base_url,
        "Storage configuration loaded"
    );

    let workspaces = WorkspaceStore::new(client);
    let _sweeper = workspaces.spawn_sweeper(
        Duration::from_secs(config.session.idle_timeout_secs),
        Duration::from_secs(config.session.sweep_interval_secs),
    );

    let state = AppState {
        workspaces,
        config: Arc::clone(&config),
    };
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        static_dir = %config.server.static_dir,
        "Server started"
    );

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let static_dir = state.config.server.static_dir.clone();
    let body_limit = state.config.server.max_body_bytes;

    Router::new()
        // HTML pages and fragments
        .route("/", get(index_handler))
        .route("/upload", post(upload_handler))
        .route("/upload/progress", get(progress_handler))
        .route("/reset", post(reset_handler))
        .route("/results/text", get(results_text_handler))
        // JSON
        .route("/api/state", get(api_state))
        // Static assets
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!(name: "server.shutdown", "Shutting down");
}

// ─────────────────────────────────────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────────────────────────────────────

/// Resolve the caller's workspace, issuing a session cookie for new visitors.
///
/// A well-formed id from an unknown session (e.g. after a restart or sweep)
/// gets a fresh empty workspace under the same id.
fn resolve_workspace(state: &AppState, jar: CookieJar) -> (CookieJar, Workspace) {
    let known = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|id| Uuid::parse_str(id).is_ok());

    if let Some(id) = known {
        let workspace = state.workspaces.get_or_create(&id);
        workspace.touch();
        return (jar, workspace);
    }

    let workspace = state.workspaces.create();
    tracing::debug!(session_id = %workspace.id(), "Created new session");
    let cookie = Cookie::build((SESSION_COOKIE, workspace.id().to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    (jar.add(cookie), workspace)
}

/// Whether the request was issued by htmx (expects a fragment).
fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("HX-Request")
        .is_some_and(|v| v.as_bytes().eq_ignore_ascii_case(b"true"))
}

// ─────────────────────────────────────────────────────────────────────────────
// HTML Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Full page: uploader or results for this session.
async fn index_handler(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let (jar, workspace) = resolve_workspace(&state, jar);
    let body = app::app_view(&workspace.view(), &workspace.uploader().state());
    (jar, Html(app::page(&body, &state.config.server.htmx_url)))
}

/// Multipart upload from the drop zone or file picker.
///
/// Every failure renders the upload widget with its error banner: as a
/// fragment for htmx (status 200, so htmx swaps it in), otherwise as a full
/// page carrying the failure's status.
async fn upload_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let (jar, workspace) = resolve_workspace(&state, jar);
    let htmx = is_htmx(&headers);

    let files = match read_files(&mut multipart).await {
        Ok(files) => files,
        Err(e) => {
            tracing::warn!(
                name: "http.multipart.rejected",
                session_id = %workspace.id(),
                error = %e,
                "Multipart read failed"
            );
            workspace.uploader().reject(e.user_message());
            let response = widget_response(&state, &workspace, htmx, e.status());
            return (jar, response).into_response();
        }
    };

    tracing::debug!(
        session_id = %workspace.id(),
        files = files.len(),
        htmx,
        "Upload request received"
    );

    let response = match workspace.upload(files).await {
        UploadOutcome::Completed(_) => {
            if htmx {
                Html(app::app_view(&workspace.view(), &UploadState::default())).into_response()
            } else {
                Redirect::to("/").into_response()
            }
        }
        UploadOutcome::Failed(_) => widget_response(&state, &workspace, htmx, StatusCode::OK),
        UploadOutcome::Refused(Refusal::NoFile) => {
            if htmx {
                StatusCode::NO_CONTENT.into_response()
            } else {
                Redirect::to("/").into_response()
            }
        }
        // Shows the running upload's progress view
        UploadOutcome::Refused(Refusal::Busy) => {
            widget_response(&state, &workspace, htmx, StatusCode::CONFLICT)
        }
    };

    (jar, response).into_response()
}

/// The upload widget for the workspace's current state.
fn widget_response(
    state: &AppState,
    workspace: &Workspace,
    htmx: bool,
    status: StatusCode,
) -> Response {
    let widget = uploader::uploader(&workspace.uploader().state());
    if htmx {
        Html(widget).into_response()
    } else {
        (status, Html(app::page(&widget, &state.config.server.htmx_url))).into_response()
    }
}

/// Collect every file part of the form, in order. Empty picks (a file
/// input submitted with nothing selected) are skipped.
async fn read_files(multipart: &mut Multipart) -> Result<Vec<UploadPayload>, AppError> {
    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        if file_name.is_empty() {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?;
        files.push(UploadPayload::new(file_name, content_type, data));
    }
    Ok(files)
}

#[derive(Debug, Default, Deserialize)]
struct ProgressQuery {
    /// Set by the standalone progress page; once the upload settles the
    /// response asks htmx to reload the page.
    follow: Option<u8>,
}

/// Progress fragment, polled while an upload runs.
///
/// A follow poll is held for up to [`FOLLOW_WAIT`] so the page reloads as
/// soon as the upload settles.
async fn progress_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<ProgressQuery>,
) -> Response {
    let (jar, workspace) = resolve_workspace(&state, jar);
    let follow = query.follow.is_some_and(|v| v != 0);

    let mut upload = workspace.uploader().state();
    if follow && upload.is_uploading {
        let mut rx = workspace.uploader().subscribe();
        upload = match tokio::time::timeout(FOLLOW_WAIT, rx.wait_for(|s| !s.is_uploading)).await
        {
            Ok(Ok(settled)) => settled.clone(),
            _ => workspace.uploader().state(),
        };
    }
    let fragment = Html(uploader::progress(&upload));

    if follow && !upload.is_uploading {
        return (
            jar,
            [("HX-Refresh", HeaderValue::from_static("true"))],
            fragment,
        )
            .into_response();
    }
    (jar, fragment).into_response()
}

/// "Upload Another": drop the current file and show the uploader.
async fn reset_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Response {
    let (jar, workspace) = resolve_workspace(&state, jar);
    if let Some(previous) = workspace.reset() {
        tracing::debug!(session_id = %workspace.id(), file_id = %previous.id, "View reset");
    }

    if is_htmx(&headers) {
        let body = app::app_view(&workspace.view(), &workspace.uploader().state());
        (jar, Html(body)).into_response()
    } else {
        (jar, Redirect::to("/")).into_response()
    }
}

/// The extracted text of the current file, verbatim.
async fn results_text_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let (jar, workspace) = resolve_workspace(&state, jar);
    let text = workspace
        .current_file()
        .and_then(|record| record.extracted_text().map(str::to_string))
        .ok_or_else(|| AppError::NotFound("No extracted text".to_string()))?;

    Ok((
        jar,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        )],
        text,
    )
        .into_response())
}

// ─────────────────────────────────────────────────────────────────────────────
// API Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Snapshot of one session.
#[derive(Debug, Serialize)]
struct SessionSnapshot {
    session_id: String,
    #[serde(flatten)]
    view: ViewState,
    phase: UploadPhase,
    upload: UploadState,
}

async fn api_state(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let (jar, workspace) = resolve_workspace(&state, jar);
    let upload = workspace.uploader().state();
    let snapshot = SessionSnapshot {
        session_id: workspace.id().to_string(),
        view: workspace.view(),
        phase: upload.phase(),
        upload,
    };
    (jar, Json(snapshot))
}
