use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::interview::service::{Finalized, RecoveryPrompt, SessionView};
use crate::models::profile::ProfileForm;
use crate::resume::decode::ResumeUpload;
use crate::resume::ResumeIntake;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AnswerRequest {
    pub text: String,
}

/// GET /api/v1/session
pub async fn handle_get_session(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.sessions.view().await)
}

/// GET /api/v1/session/recovery
pub async fn handle_get_recovery(State(state): State<AppState>) -> Json<Option<RecoveryPrompt>> {
    Json(state.sessions.recovery_prompt().await)
}

/// POST /api/v1/session/resume
/// Multipart form with a single `file` part.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ResumeIntake>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("resume").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;

        let upload = ResumeUpload {
            file_name,
            content_type,
            bytes,
        };
        let intake = state.sessions.upload_resume(upload).await?;
        return Ok(Json(intake));
    }
    Err(AppError::Validation("Missing `file` part".to_string()))
}

/// POST /api/v1/session/profile
pub async fn handle_submit_profile(
    State(state): State<AppState>,
    Json(form): Json<ProfileForm>,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.sessions.submit_profile(form).await?))
}

/// PUT /api/v1/session/draft
pub async fn handle_stage_draft(
    State(state): State<AppState>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<SessionView>, AppError> {
    state.sessions.stage_draft(req.text).await?;
    Ok(Json(state.sessions.view().await))
}

/// POST /api/v1/session/answer
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<Finalized>, AppError> {
    Ok(Json(state.sessions.submit_answer(req.text).await?))
}

/// POST /api/v1/session/pause
pub async fn handle_pause(State(state): State<AppState>) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.sessions.pause().await?))
}

/// POST /api/v1/session/continue
pub async fn handle_continue(State(state): State<AppState>) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.sessions.resume().await?))
}

/// POST /api/v1/session/restart
pub async fn handle_restart(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.sessions.restart().await)
}
