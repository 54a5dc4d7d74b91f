//! Question-set generation: LLM-backed question authoring for HR, plus the
//! finalize step that persists a set behind a time-limited link.

pub mod generator;
pub mod handlers;
pub mod prompts;
