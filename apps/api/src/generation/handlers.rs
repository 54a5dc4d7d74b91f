//! Axum route handlers for the HR-facing test authoring API.

use axum::{extract::State, Json};
use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::generator::generate_questions;
use crate::models::test::{Question, TestFinalizeRequest, TestRequest};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GenerateTestResponse {
    pub questions: Vec<Question>,
}

#[derive(Debug, Serialize)]
pub struct FinalizeTestResponse {
    pub test_link: String,
}

/// POST /api/hr/generate-test
///
/// Generates a draft question set for HR review. Nothing is persisted until
/// the set is finalized.
pub async fn handle_generate_test(
    State(state): State<AppState>,
    Json(request): Json<TestRequest>,
) -> Result<Json<GenerateTestResponse>, AppError> {
    if request.topic.trim().is_empty() {
        return Err(AppError::Validation("topic cannot be empty".to_string()));
    }
    if request.num_questions == 0 {
        return Err(AppError::Validation(
            "num_questions must be at least 1".to_string(),
        ));
    }

    let questions = generate_questions(&state.llm, &request).await;

    Ok(Json(GenerateTestResponse { questions }))
}

/// POST /api/hr/finalize-test
///
/// Persists the reviewed question set behind a fresh UUID with a time-limited
/// expiry and returns the shareable candidate link.
pub async fn handle_finalize_test(
    State(state): State<AppState>,
    Json(request): Json<TestFinalizeRequest>,
) -> Result<Json<FinalizeTestResponse>, AppError> {
    if request.questions.is_empty() {
        return Err(AppError::Validation(
            "questions cannot be empty".to_string(),
        ));
    }

    let question_set_id = Uuid::new_v4();
    let created_at = Utc::now();
    let expires_at = created_at + Duration::hours(state.config.test_expiry_hours);

    sqlx::query("INSERT INTO question_sets (id, created_at, expires_at) VALUES ($1, $2, $3)")
        .bind(question_set_id)
        .bind(created_at)
        .bind(expires_at)
        .execute(&state.db)
        .await?;

    // Every row in the set shares one created_at; `position` preserves the
    // order HR finalized the questions in.
    for (position, question) in request.questions.iter().enumerate() {
        sqlx::query(
            "INSERT INTO questions \
                (question_set_id, position, question, options, answer, created_at, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(question_set_id)
        .bind(position as i32)
        .bind(&question.question)
        .bind(question.options.as_deref())
        .bind(question.answer.as_deref())
        .bind(created_at)
        .bind(expires_at)
        .execute(&state.db)
        .await?;
    }

    info!(
        "Finalized question set {question_set_id} with {} questions, expires {expires_at}",
        request.questions.len()
    );

    let test_link = format!("{}/test/{question_set_id}", state.config.test_link_base_url);
    Ok(Json(FinalizeTestResponse { test_link }))
}
