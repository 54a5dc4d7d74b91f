//! Axum route handlers for the candidate-facing test API.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::evaluation::evaluator::{evaluate_submission, EvaluationResult, EvaluationStatus};
use crate::models::test::{PublicQuestion, QuestionSetRow, TestSubmission};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct FetchTestResponse {
    pub questions: Vec<PublicQuestion>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub score: u32,
    pub max_score: u32,
    pub percentage: f64,
    pub status: EvaluationStatus,
    pub raw_feedback: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_error: Option<String>,
}

/// GET /api/test/:question_set_id
///
/// Serves the questions of a live set. A missing set and an expired set are
/// distinct, caller-visible conditions (404 vs 410). Stored answers are never
/// included.
pub async fn handle_fetch_test(
    State(state): State<AppState>,
    Path(question_set_id): Path<Uuid>,
) -> Result<Json<FetchTestResponse>, AppError> {
    let set: Option<QuestionSetRow> =
        sqlx::query_as("SELECT * FROM question_sets WHERE id = $1")
            .bind(question_set_id)
            .fetch_optional(&state.db)
            .await?;

    let set = set.ok_or_else(|| AppError::NotFound("Test not found".to_string()))?;

    if Utc::now() > set.expires_at {
        return Err(AppError::Gone("Test expired".to_string()));
    }

    let questions: Vec<PublicQuestion> = sqlx::query_as(
        "SELECT question, options FROM questions WHERE question_set_id = $1 ORDER BY position",
    )
    .bind(question_set_id)
    .fetch_all(&state.db)
    .await?;

    if questions.is_empty() {
        return Err(AppError::NotFound("No questions found".to_string()));
    }

    Ok(Json(FetchTestResponse { questions }))
}

/// POST /api/test/submit
///
/// Grades the submission and records the result. Persistence is best-effort:
/// a failed insert must not discard the evaluation — the result is more
/// valuable to the candidate than the write — so the response carries a
/// `database_error` annotation instead.
pub async fn handle_submit_test(
    State(state): State<AppState>,
    Json(submission): Json<TestSubmission>,
) -> Result<Json<SubmitResponse>, AppError> {
    let result = evaluate_submission(&state.llm, &submission).await;

    let (result_id, database_error) = match persist_result(&state, &submission, &result).await {
        Ok(id) => (Some(id), None),
        Err(e) => {
            warn!("Failed to persist test result: {e}");
            (None, Some(e.to_string()))
        }
    };

    Ok(Json(SubmitResponse {
        score: result.score,
        max_score: result.max_score,
        percentage: result.percentage,
        status: result.status,
        raw_feedback: result.raw_feedback,
        result_id,
        database_error,
    }))
}

async fn persist_result(
    state: &AppState,
    submission: &TestSubmission,
    result: &EvaluationResult,
) -> Result<Uuid, sqlx::Error> {
    let (id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO test_results \
            (question_set_id, score, max_score, percentage, status, total_questions, raw_feedback) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING id",
    )
    .bind(submission.question_set_id)
    .bind(result.score as i32)
    .bind(result.max_score as i32)
    .bind(result.percentage)
    .bind(result.status.as_str())
    .bind(submission.questions.len() as i32)
    .bind(&result.raw_feedback)
    .fetch_one(&state.db)
    .await?;

    Ok(id)
}
