use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Required variables fail startup with a descriptive error; the OpenRouter
/// key is passed into the LLM client explicitly rather than read from the
/// environment at call time.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub openrouter_api_key: String,
    /// Base URL the candidate-facing frontend is served from; finalize-test
    /// links are built against it.
    pub test_link_base_url: String,
    /// How long a finalized question set stays live.
    pub test_expiry_hours: i64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            openrouter_api_key: require_env("OPENROUTER_API_KEY")?,
            test_link_base_url: std::env::var("TEST_LINK_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            test_expiry_hours: std::env::var("TEST_EXPIRY_HOURS")
                .unwrap_or_else(|_| "2".to_string())
                .parse::<i64>()
                .context("TEST_EXPIRY_HOURS must be a whole number of hours")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
