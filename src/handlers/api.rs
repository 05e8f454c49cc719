use axum::{
    Json,
    extract::{Multipart, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::core::language::Language;
use crate::core::pipeline::{OutcomeSummary, PipelineOptions, process_uploads};
use crate::core::tts::synthesize_with_deadline;
use crate::errors::{AppError, AppResult};
use crate::handlers::form::read_label_form;
use crate::state::AppState;

/// Liveness probe
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "OK" })))
}

/// Request body for `/api/speak`
#[derive(Debug, Deserialize)]
pub struct SpeakRequest {
    pub text: String,
    #[serde(default)]
    pub language: Language,
}

/// Synthesize text in the requested language and return the mp3 bytes
pub async fn speak(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SpeakRequest>,
) -> AppResult<Response> {
    if request.text.trim().is_empty() {
        return Err(AppError::BadRequest("text must not be empty".to_string()));
    }

    let provider = state.tts.route(request.language);
    info!(
        provider = provider.provider_name(),
        chars = request.text.chars().count(),
        "Speak request"
    );

    let clip = synthesize_with_deadline(
        provider,
        &request.text,
        state.config.tts_timeout(),
        &state.request_token(),
    )
    .await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, clip.format.mime_type())],
        clip.data,
    )
        .into_response())
}

/// Both speech backends with their resolved settings
pub async fn providers(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "summarizer": state.summarizer.name(),
        "providers": state.tts.providers_info(),
    }))
}

/// Process uploaded labels and return every outcome as JSON
///
/// Stateless counterpart of the page: nothing is stored in a session.
pub async fn labels(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> AppResult<Json<serde_json::Value>> {
    let form = read_label_form(multipart, state.config.max_images_per_upload).await?;
    if form.images.is_empty() {
        return Err(AppError::BadRequest("no images uploaded".to_string()));
    }

    let options = PipelineOptions {
        language: form.language.unwrap_or_default(),
        advanced_mode: form.advanced,
        tts_timeout: state.config.tts_timeout(),
    };

    info!(
        images = form.images.len(),
        language = %options.language,
        advanced = options.advanced_mode,
        "Label batch received"
    );

    let outcomes = process_uploads(
        &form.images,
        &options,
        state.summarizer.as_ref(),
        &state.tts,
        &state.request_token(),
    )
    .await;

    let outcomes: Vec<OutcomeSummary> = outcomes.iter().map(OutcomeSummary::from).collect();

    Ok(Json(json!({
        "language": options.language,
        "advanced_mode": options.advanced_mode,
        "outcomes": outcomes,
    })))
}
