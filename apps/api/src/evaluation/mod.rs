//! Submission grading: prompt construction, score extraction from free-text
//! model output, and orchestration of one end-to-end evaluation.

pub mod evaluator;
pub mod handlers;
pub mod prompts;
pub mod score;
