pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::evaluation::handlers as test_handlers;
use crate::generation::handlers as hr_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // HR API: author and publish question sets
        .route("/api/hr/generate-test", post(hr_handlers::handle_generate_test))
        .route("/api/hr/finalize-test", post(hr_handlers::handle_finalize_test))
        // Candidate API: take a test and submit answers
        .route("/api/test/submit", post(test_handlers::handle_submit_test))
        .route(
            "/api/test/:question_set_id",
            get(test_handlers::handle_fetch_test),
        )
        .with_state(state)
}
