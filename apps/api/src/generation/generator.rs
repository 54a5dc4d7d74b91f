//! LLM-backed question generation with a secondary-model fallback.

use tracing::warn;

use crate::generation::prompts::{generation_prompt, GENERATION_SYSTEM};
use crate::llm_client::{
    CallOptions, LlmClient, GENERATION_FALLBACK_MODEL, GENERATION_MODEL,
};
use crate::models::test::{Question, TestRequest};

/// Generates a question set for the request.
///
/// Tries the primary model, then the fallback model. Generation is allowed a
/// fallback (unlike grading) because HR can review and regenerate — a wrong
/// question is recoverable, a wrong grade is not. If both models fail, a
/// single mock MCQ is returned so the HR flow never dead-ends on provider
/// trouble.
pub async fn generate_questions(llm: &LlmClient, request: &TestRequest) -> Vec<Question> {
    let prompt = generation_prompt(request);

    for model in [GENERATION_MODEL, GENERATION_FALLBACK_MODEL] {
        match llm
            .complete_json::<Vec<Question>>(
                model,
                Some(GENERATION_SYSTEM),
                &prompt,
                CallOptions::default(),
            )
            .await
        {
            Ok(questions) if !questions.is_empty() => return questions,
            Ok(_) => warn!("{model} returned an empty question list"),
            Err(e) => warn!("{model} failed: {e}"),
        }
    }

    warn!("All generation models failed, returning mock question set");
    mock_question_set()
}

/// Last-resort question set, used only when every model call failed.
fn mock_question_set() -> Vec<Question> {
    vec![Question {
        question: "Mock Question: What is Python?".to_string(),
        options: Some(vec![
            "A programming language".to_string(),
            "A snake".to_string(),
            "A car".to_string(),
            "A song".to_string(),
        ]),
        answer: Some("A programming language".to_string()),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_set_is_a_valid_mcq() {
        let questions = mock_question_set();
        assert_eq!(questions.len(), 1);
        let q = &questions[0];
        assert!(q.is_mcq());
        let answer = q.answer.as_deref().unwrap();
        assert!(q.options.as_ref().unwrap().iter().any(|o| o == answer));
    }
}
