//! One end-to-end grading attempt.
//!
//! `evaluate_submission` never errors outward: every failure mode of the
//! model call is normalized into a well-formed [`EvaluationResult`] so
//! persistence and the response path always receive the same shape.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::evaluation::prompts::build_grading_prompt;
use crate::evaluation::score::extract_score;
use crate::llm_client::{CallOptions, LlmClient, LlmError, GRADING_MODEL};
use crate::models::test::TestSubmission;

/// A low temperature keeps scoring consistent between runs.
const GRADING_TEMPERATURE: f32 = 0.1;
const GRADING_MAX_TOKENS: u32 = 2000;

/// Terminal status of one evaluation. Serialized with the wire strings the
/// `test_results.status` column stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvaluationStatus {
    Pass,
    Fail,
    #[serde(rename = "Evaluation failed")]
    EvaluationFailed,
    #[serde(rename = "Network error")]
    NetworkError,
    #[serde(rename = "Internal error")]
    InternalError,
}

impl EvaluationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationStatus::Pass => "Pass",
            EvaluationStatus::Fail => "Fail",
            EvaluationStatus::EvaluationFailed => "Evaluation failed",
            EvaluationStatus::NetworkError => "Network error",
            EvaluationStatus::InternalError => "Internal error",
        }
    }
}

/// Outcome of one grading attempt. Produced once per submission, then stored
/// as a historical record; never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationResult {
    pub score: u32,
    pub max_score: u32,
    pub percentage: f64,
    pub status: EvaluationStatus,
    pub raw_feedback: String,
}

/// Builds the grading prompt, makes a single model call (no retry, no
/// fallback model), and converts whatever comes back into a result.
pub async fn evaluate_submission(llm: &LlmClient, submission: &TestSubmission) -> EvaluationResult {
    let num_questions = submission.questions.len();
    let prompt = build_grading_prompt(submission);

    let outcome = llm
        .complete(
            GRADING_MODEL,
            None,
            &prompt,
            CallOptions {
                temperature: Some(GRADING_TEMPERATURE),
                max_tokens: Some(GRADING_MAX_TOKENS),
            },
        )
        .await;

    let result = resolve_outcome(outcome, num_questions);
    info!(
        "Evaluation finished: {}/{} ({:.1}%) - {}",
        result.score,
        result.max_score,
        result.percentage,
        result.status.as_str()
    );
    result
}

/// Maps a model-call outcome onto a result. Split from the async path so the
/// failure taxonomy is testable without a live socket.
fn resolve_outcome(outcome: Result<String, LlmError>, num_questions: usize) -> EvaluationResult {
    let expected_max = num_questions as u32 * 10;

    match outcome {
        Ok(content) => {
            let (score, max_score) = extract_score(&content, num_questions);
            let percentage = percentage(score, max_score);
            let status = if percentage >= 50.0 {
                EvaluationStatus::Pass
            } else {
                EvaluationStatus::Fail
            };
            EvaluationResult {
                score,
                max_score,
                percentage,
                status,
                raw_feedback: content,
            }
        }
        Err(e) => {
            // `Api` and `Transport` already render as "API Error: ..." and
            // "HTTP Error: ..."; everything else gets the internal prefix.
            let (status, raw_feedback) = match &e {
                LlmError::Api { .. } => (EvaluationStatus::EvaluationFailed, e.to_string()),
                LlmError::Transport(_) => (EvaluationStatus::NetworkError, e.to_string()),
                LlmError::Parse(_) | LlmError::EmptyContent => {
                    (EvaluationStatus::InternalError, format!("Internal Error: {e}"))
                }
            };
            EvaluationResult {
                score: 0,
                max_score: expected_max,
                percentage: 0.0,
                status,
                raw_feedback,
            }
        }
    }
}

fn percentage(score: u32, max_score: u32) -> f64 {
    if max_score == 0 {
        return 0.0;
    }
    f64::from(score) / f64::from(max_score) * 100.0
}
