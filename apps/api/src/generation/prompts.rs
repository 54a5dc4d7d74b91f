//! Prompt construction for question generation.

use crate::models::test::TestRequest;

/// System prompt for generation — the models used here follow instructions
/// best with a minimal JSON-only framing.
pub const GENERATION_SYSTEM: &str = "You are a JSON-generating assistant.";

/// Builds the generation prompt for a request. The shape depends on
/// `question_type`; anything other than "coding" or "mixed" gets the MCQ
/// prompt.
pub fn generation_prompt(request: &TestRequest) -> String {
    match request.question_type.as_str() {
        "coding" => format!(
            "Generate {} {} level coding questions on the topic '{}'. \
             Respond only as a JSON array of objects. \
             Each object should have: `question` (coding problem statement), `answer` (expected code/logic). \
             Do NOT include explanations. Keep questions practical and relevant.",
            request.num_questions, request.difficulty, request.topic
        ),
        "mixed" => format!(
            "Generate a mixed set of {} {} level questions on the topic '{}'. \
             Include both MCQs and coding problems. \
             Each object should have: `question`, `options` (optional for MCQ), and `answer`. \
             Return only a valid JSON array of such objects.",
            request.num_questions, request.difficulty, request.topic
        ),
        _ => format!(
            "Generate {} {} level multiple choice questions on the topic '{}'. \
             Respond only as a valid JSON array of objects. Each object should have the keys: \
             `question`, `options` (a list of 4 options), and `answer` (exact match with one of the options).",
            request.num_questions, request.difficulty, request.topic
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(question_type: &str) -> TestRequest {
        TestRequest {
            topic: "Rust ownership".to_string(),
            difficulty: "medium".to_string(),
            num_questions: 5,
            question_type: question_type.to_string(),
        }
    }

    #[test]
    fn test_mcq_prompt_asks_for_options() {
        let prompt = generation_prompt(&request("mcq"));
        assert!(prompt.contains("5 medium level multiple choice questions"));
        assert!(prompt.contains("Rust ownership"));
        assert!(prompt.contains("`options`"));
    }

    #[test]
    fn test_coding_prompt_has_no_options() {
        let prompt = generation_prompt(&request("coding"));
        assert!(prompt.contains("coding questions"));
        assert!(!prompt.contains("`options`"));
    }

    #[test]
    fn test_mixed_prompt_mentions_both_kinds() {
        let prompt = generation_prompt(&request("mixed"));
        assert!(prompt.contains("mixed set"));
        assert!(prompt.contains("MCQs and coding problems"));
    }

    #[test]
    fn test_unknown_type_falls_back_to_mcq() {
        let prompt = generation_prompt(&request("essay"));
        assert!(prompt.contains("multiple choice questions"));
    }
}
