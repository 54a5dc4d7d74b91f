use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Opens the connection pool backing the screening store (question sets,
/// questions, recorded results).
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Opening Postgres pool for the screening store...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("Screening store pool ready");
    Ok(pool)
}
