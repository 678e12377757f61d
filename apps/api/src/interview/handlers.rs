//! Axum route handlers for the Interview API. Thin glue over `flow` and `finish`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::finish::{finish_interview, FinishResponse};
use crate::interview::flow::{
    abandon_interview, current_turn, generate_answer, generate_exercise_answer, start_interview,
    submit_answer,
};
use crate::interview::models::{TurnView, SKIPPED_MARKER};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct StartRequest {
    #[serde(default)]
    pub candidate_name: String,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: Option<String>,
    #[serde(default)]
    pub skip: bool,
}

impl AnswerRequest {
    /// Skipping wins over any answer text.
    fn into_answer(self) -> Result<String, AppError> {
        if self.skip {
            return Ok(SKIPPED_MARKER.to_string());
        }
        self.answer.ok_or_else(|| {
            AppError::Validation("answer is required unless skip is true".to_string())
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LevelRequest {
    pub level: u8,
}

#[derive(Debug, Serialize)]
pub struct GeneratedAnswerResponse {
    pub level: u8,
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct FinishRequest {
    #[serde(default)]
    pub exercise_answer: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/interviews
///
/// Plans the interview and returns the first question.
pub async fn handle_start(
    State(state): State<AppState>,
    Json(request): Json<StartRequest>,
) -> Result<(StatusCode, Json<TurnView>), AppError> {
    let view = start_interview(
        &state.llm,
        state.sessions.as_ref(),
        &state.matrix,
        &state.settings,
        &request.candidate_name,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/v1/interviews/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TurnView>, AppError> {
    Ok(Json(current_turn(
        state.sessions.as_ref(),
        &state.settings,
        id,
    )?))
}

/// DELETE /api/v1/interviews/:id
pub async fn handle_abandon(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    abandon_interview(state.sessions.as_ref(), id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/interviews/:id/answers
pub async fn handle_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<TurnView>, AppError> {
    let answer = request.into_answer()?;
    let view = submit_answer(
        &state.llm,
        state.sessions.as_ref(),
        &state.settings,
        id,
        &answer,
    )
    .await?;
    Ok(Json(view))
}

/// POST /api/v1/interviews/:id/auto-answer
///
/// Simulated candidate answer for the open question. The client decides
/// whether to submit it.
pub async fn handle_auto_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<LevelRequest>,
) -> Result<Json<GeneratedAnswerResponse>, AppError> {
    let level = request.level.clamp(1, 9);
    let answer = generate_answer(
        &state.llm,
        state.sessions.as_ref(),
        &state.matrix,
        &state.settings,
        id,
        level,
    )
    .await?;
    Ok(Json(GeneratedAnswerResponse { level, answer }))
}

/// POST /api/v1/interviews/:id/auto-exercise
pub async fn handle_auto_exercise(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<LevelRequest>,
) -> Result<Json<GeneratedAnswerResponse>, AppError> {
    let level = request.level.clamp(1, 9);
    let answer = generate_exercise_answer(
        &state.llm,
        state.sessions.as_ref(),
        &state.matrix,
        &state.settings,
        id,
        level,
    )
    .await?;
    Ok(Json(GeneratedAnswerResponse { level, answer }))
}

/// POST /api/v1/interviews/:id/finish
///
/// Runs the assessor panel. The session is gone afterwards.
pub async fn handle_finish(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<FinishRequest>,
) -> Result<Json<FinishResponse>, AppError> {
    let response = finish_interview(
        &state.llm,
        state.sessions.as_ref(),
        &state.matrix,
        &state.settings,
        id,
        &request.exercise_answer,
    )
    .await?;
    Ok(Json(response))
}
