//! Grading prompt construction.
//!
//! The prompt is the first half of the score-extraction contract: it pins the
//! model to an exact output grammar (`Q<i> - Type: ... - Score: n/10`, then
//! `TOTAL SCORE: X/Y`, then `STATUS:`) so the cascade in `score` has
//! something structured to find in the reply.

use crate::models::test::TestSubmission;

/// Fixed instruction header. `{n}` and `{max}` are substituted per submission.
const GRADING_HEADER: &str = "You are an expert HR evaluator.\n\n\
You will be given a list of questions and answers submitted by a candidate.\n\
Some questions are Multiple Choice Questions (MCQs) with options, others are coding problems.\n\n\
EVALUATION RULES:\n\
1. For MCQ questions: If the candidate's answer matches any correct option exactly, give 10/10. Otherwise 0/10.\n\
2. For Coding questions: Score out of 10 based on correctness, logic, efficiency, and code quality.\n\n\
IMPORTANT: You MUST provide scores in this EXACT format:\n\
Q1 - Type: MCQ - Score: 10/10\n\
Q2 - Type: Coding - Score: 8/10\n\
Q3 - Type: MCQ - Score: 0/10\n\
...\n\n\
At the end, provide:\n\
TOTAL SCORE: X/Y\n\
STATUS: Pass (if >= 50%) or Fail\n\n\
Number of Questions: {n}\n\
Maximum Possible Score: {max}\n\n\
Questions and Answers:\n";

/// Renders a submission into the grading prompt. Pure function of its input:
/// same submission, same prompt.
///
/// Questions and answers are paired by position; pairing stops at the shorter
/// sequence, so a submission with a missing trailing answer simply grades the
/// questions that were answered. Answer text is passed through verbatim — the
/// model consumes raw text.
pub fn build_grading_prompt(submission: &TestSubmission) -> String {
    let n = submission.questions.len();
    let mut prompt = GRADING_HEADER
        .replace("{n}", &n.to_string())
        .replace("{max}", &(n * 10).to_string());

    for (i, (question, answer)) in submission
        .questions
        .iter()
        .zip(submission.answers.iter())
        .enumerate()
    {
        prompt.push_str(&format!("\nQ{}: {}\n", i + 1, question.question));
        if question.is_mcq() {
            let options = question.options.as_deref().unwrap_or_default();
            prompt.push_str(&format!("Options: {}\n", options.join(", ")));
            prompt.push_str("Type: MCQ\n");
        } else {
            prompt.push_str("Type: Coding\n");
        }
        prompt.push_str(&format!("Candidate's Answer: {answer}\n"));
        prompt.push_str("---\n");
    }

    prompt
}
