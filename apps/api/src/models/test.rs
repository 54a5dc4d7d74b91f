//! Request bodies and database rows for the screening test lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A single generated question. MCQ when `options` is present and non-empty,
/// a coding question otherwise. Immutable once generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub answer: Option<String>,
}

impl Question {
    pub fn is_mcq(&self) -> bool {
        self.options.as_ref().is_some_and(|o| !o.is_empty())
    }
}

fn default_question_type() -> String {
    "mcq".to_string()
}

/// HR's generation request.
#[derive(Debug, Clone, Deserialize)]
pub struct TestRequest {
    pub topic: String,
    pub difficulty: String,
    pub num_questions: u32,
    /// "mcq" (default), "coding", or "mixed".
    #[serde(default = "default_question_type")]
    pub question_type: String,
}

/// HR's finalize request: the (possibly hand-edited) question list to persist.
#[derive(Debug, Clone, Deserialize)]
pub struct TestFinalizeRequest {
    pub questions: Vec<Question>,
}

/// A candidate's completed test. `answers` pairs with `questions` by
/// position; the evaluator tolerates unequal lengths by pairing up to the
/// shorter sequence.
#[derive(Debug, Clone, Deserialize)]
pub struct TestSubmission {
    pub question_set_id: Uuid,
    pub questions: Vec<Question>,
    pub answers: Vec<String>,
    /// Languages the candidate chose for coding answers. Accepted and stored
    /// with the submission context but not fed into the grading prompt.
    #[serde(default)]
    pub languages: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuestionSetRow {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// What the candidate is allowed to see: never the stored answer.
/// Questions and results are otherwise written column-by-column and never
/// read back by this service, so they get no row structs.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PublicQuestion {
    pub question: String,
    pub options: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_with_options_is_mcq() {
        let q = Question {
            question: "Pick one".to_string(),
            options: Some(vec!["a".to_string(), "b".to_string()]),
            answer: Some("a".to_string()),
        };
        assert!(q.is_mcq());
    }

    #[test]
    fn test_question_with_empty_options_is_coding() {
        let q = Question {
            question: "Write a function".to_string(),
            options: Some(vec![]),
            answer: None,
        };
        assert!(!q.is_mcq());
    }

    #[test]
    fn test_question_without_options_is_coding() {
        let q = Question {
            question: "Write a function".to_string(),
            options: None,
            answer: None,
        };
        assert!(!q.is_mcq());
    }

    #[test]
    fn test_request_defaults_to_mcq() {
        let json = r#"{"topic": "Rust", "difficulty": "easy", "num_questions": 3}"#;
        let req: TestRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.question_type, "mcq");
    }

    #[test]
    fn test_submission_without_languages_deserializes() {
        let json = r#"{
            "question_set_id": "7b2e77a0-08e8-4c3f-9a30-8a2c3f1f2e11",
            "questions": [{"question": "Q"}],
            "answers": ["A"]
        }"#;
        let sub: TestSubmission = serde_json::from_str(json).unwrap();
        assert!(sub.languages.is_none());
        assert_eq!(sub.questions.len(), 1);
        assert_eq!(sub.answers.len(), 1);
    }
}
