//! HTTP surface: the router, handlers, and multipart plumbing.
//!
//! Three routes, matching the form on the index page:
//!
//! - `GET  /`           — the upload form
//! - `POST /pdf-to-txt` — multipart field `pdf_file`, `.pdf` required
//! - `POST /transcribe` — multipart field `audio_file`, `.wav` required
//!
//! Every error is caught at the handler boundary and rendered into the
//! page; the browser always gets the form back with either a result or an
//! error box. The upload size cap is enforced by [`DefaultBodyLimit`]
//! before a handler runs.

pub mod page;

use crate::config::ServerConfig;
use crate::convert::{self, UploadKind};
use crate::error::TextpressError;
use crate::extract::SharedTranscriber;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::response::Html;
use axum::routing::{get, post};
use axum::Router;
use page::{Page, PageBody};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Shared handler state: the configuration plus the optional speech-to-text
/// service, both constructed once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub transcriber: Option<SharedTranscriber>,
}

impl AppState {
    pub fn new(config: ServerConfig, transcriber: Option<SharedTranscriber>) -> Self {
        Self {
            config: Arc::new(config),
            transcriber,
        }
    }

    fn audio_enabled(&self) -> bool {
        self.transcriber.is_some()
    }
}

/// Build the application router.
///
/// Separate from serving so tests can drive it with `tower::ServiceExt`
/// without binding a socket.
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/", get(index))
        .route("/pdf-to-txt", post(pdf_to_txt))
        .route("/transcribe", post(transcribe))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Handlers ─────────────────────────────────────────────────────────────

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(page::render(&Page::form(state.audio_enabled())))
}

async fn pdf_to_txt(State(state): State<AppState>, multipart: Multipart) -> Html<String> {
    let outcome = handle_pdf(&state, multipart).await;
    respond(&state, outcome.map(PageBody::PdfText))
}

async fn transcribe(State(state): State<AppState>, multipart: Multipart) -> Html<String> {
    let outcome = handle_transcribe(&state, multipart).await;
    respond(&state, outcome.map(PageBody::Transcript))
}

async fn handle_pdf(state: &AppState, multipart: Multipart) -> Result<String, TextpressError> {
    let (filename, bytes) = read_upload(multipart, UploadKind::Pdf).await?;
    convert::pdf_to_text(&state.config, &filename, &bytes).await
}

async fn handle_transcribe(
    state: &AppState,
    multipart: Multipart,
) -> Result<String, TextpressError> {
    let (filename, bytes) = read_upload(multipart, UploadKind::Audio).await?;
    convert::transcribe_audio(
        &state.config,
        state.transcriber.as_ref(),
        &filename,
        &bytes,
    )
    .await
}

/// Render the final page for a request outcome.
///
/// Errors become a message in the page, never a raw failure; the status is
/// 200 either way, matching classic form-post behaviour.
fn respond(state: &AppState, outcome: Result<PageBody, TextpressError>) -> Html<String> {
    let body = match outcome {
        Ok(body) => body,
        Err(e) => {
            warn!("Request failed: {e}");
            PageBody::Error(e.to_string())
        }
    };
    Html(page::render(&Page {
        audio_enabled: state.audio_enabled(),
        body,
    }))
}

/// Pull the expected file field out of the multipart stream.
///
/// Returns the user-supplied filename (for validation and error text only —
/// it never becomes a path) and the raw bytes.
async fn read_upload(
    mut multipart: Multipart,
    kind: UploadKind,
) -> Result<(String, Bytes), TextpressError> {
    let field_name = kind.form_field();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| TextpressError::Multipart {
            detail: e.to_string(),
        })?
    {
        if field.name() != Some(field_name) {
            continue;
        }

        let filename = field.file_name().unwrap_or("").to_string();
        if filename.is_empty() {
            return Err(TextpressError::EmptyFilename { field: field_name });
        }

        let bytes = field.bytes().await.map_err(|e| TextpressError::Multipart {
            detail: e.to_string(),
        })?;
        return Ok((filename, bytes));
    }

    Err(TextpressError::MissingFile { field: field_name })
}
