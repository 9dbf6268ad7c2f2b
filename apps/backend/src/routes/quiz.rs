//! Quiz endpoints

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::error::{ApiError, Result};
use crate::models::{QuizSnapshot, SubmitAnswerRequest};
use crate::AppState;

/// GET /api/quiz
pub async fn current(State(state): State<AppState>) -> Json<QuizSnapshot> {
    Json(state.quiz.snapshot().await)
}

/// POST /api/quiz/answer
/// Records the answer for the current card; repeated answers are ignored
pub async fn answer(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SubmitAnswerRequest>, JsonRejection>,
) -> Result<Json<QuizSnapshot>> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let snapshot = state.quiz.submit_answer(payload.preposition).await?;
    Ok(Json(snapshot))
}

/// POST /api/quiz/next
pub async fn next(State(state): State<AppState>) -> Json<QuizSnapshot> {
    Json(state.quiz.advance().await)
}

/// POST /api/quiz/restart
/// Starts a fresh session; the new deck loads in the background
pub async fn restart(State(state): State<AppState>) -> Json<QuizSnapshot> {
    state.quiz.restart().await;
    Json(state.quiz.snapshot().await)
}
