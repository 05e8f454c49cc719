//! Browser page: render, process uploads, start over.

use axum::{
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::{debug, info};

use crate::core::pipeline::{PipelineOptions, process_uploads};
use crate::core::session::SessionId;
use crate::errors::AppResult;
use crate::handlers::form::read_label_form;
use crate::render::render_page;
use crate::state::AppState;
use crate::utils::{SESSION_COOKIE, read_cookie, session_cookie_header};

/// The request's live session, if its cookie names one
fn existing_session(state: &AppState, headers: &HeaderMap) -> Option<SessionId> {
    let raw = read_cookie(headers, SESSION_COOKIE);
    state.sessions.find(raw.as_deref())
}

/// Resolve the request's session, creating one if the cookie is absent or stale
fn resolve_session(state: &AppState, headers: &HeaderMap) -> (SessionId, bool) {
    let raw = read_cookie(headers, SESSION_COOKIE);
    state.sessions.get_or_create(raw.as_deref())
}

/// Attach the session cookie when the session was just created
fn with_session_cookie(mut response: Response, id: SessionId, created: bool) -> Response {
    if created {
        if let Some(value) = session_cookie_header(&id.to_string()) {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
    }
    response
}

fn back_to_page() -> Response {
    Redirect::to("/").into_response()
}

/// Render the page for the caller's session
///
/// A visitor without a session sees the initial page; the session itself is
/// only created on the first submit.
pub async fn index(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let session = existing_session(&state, &headers)
        .and_then(|id| state.sessions.get(&id))
        .unwrap_or_default();

    let html = render_page(&session, &state.config);
    (StatusCode::OK, Html(html)).into_response()
}

/// Apply the submitted controls and re-run processing for the held uploads
///
/// New files replace the previous set; a submit without files keeps the
/// current set and re-processes it with the new language and mode.
pub async fn process(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> AppResult<Response> {
    let form = read_label_form(multipart, state.config.max_images_per_upload).await?;
    let (id, created) = resolve_session(&state, &headers);

    let session = state.sessions.update(id, |session| {
        if let Some(language) = form.language {
            session.language = language;
        }
        session.advanced_mode = form.advanced;
        if !form.images.is_empty() {
            session.replace_uploads(form.images);
        }
        session.clone()
    });

    if session.has_uploads() {
        let options = PipelineOptions {
            language: session.language,
            advanced_mode: session.advanced_mode,
            tts_timeout: state.config.tts_timeout(),
        };

        info!(
            session = %id,
            images = session.uploads.len(),
            language = %options.language,
            advanced = options.advanced_mode,
            "Processing uploads"
        );

        let outcomes = process_uploads(
            &session.uploads,
            &options,
            state.summarizer.as_ref(),
            &state.tts,
            &state.request_token(),
        )
        .await;

        state.sessions.update(id, |current| {
            // A concurrent submit may have swapped the uploads meanwhile
            if current.uploads == session.uploads {
                current.outcomes = outcomes;
            } else {
                debug!(session = %id, "Uploads changed during processing, discarding outcomes");
            }
        });
    } else {
        state.sessions.update(id, |current| current.outcomes.clear());
    }

    Ok(with_session_cookie(back_to_page(), id, created))
}

/// Drop everything the session holds and start from the initial page
pub async fn reset(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(id) = existing_session(&state, &headers) {
        state.sessions.reset(id);
        info!(session = %id, "Session reset");
    }

    back_to_page()
}
