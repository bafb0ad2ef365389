//! # Database Persistence Layer
//!
//! PostgreSQL persistence via SQLx. The database is **optional**: without a
//! connection URL the repository runs in in-memory-only mode, which is what
//! tests and local development use.
//!
//! Query functions take any [`sqlx::postgres::PgExecutor`] so the
//! repository can run them either directly on the pool or inside a
//! transaction when two tables must change together.

pub mod campgrounds;
pub mod reviews;

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::error::StoreError;

/// Connect to PostgreSQL and apply the embedded migrations.
pub async fn init_pool(url: &str) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(5))
        .connect(url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}
