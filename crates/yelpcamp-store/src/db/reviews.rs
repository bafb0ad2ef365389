//! Review persistence operations on the `reviews` table.

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgExecutor, PgPool};
use uuid::Uuid;
use yelpcamp_core::review::MIN_RATING;
use yelpcamp_core::{Review, ReviewId};

/// Insert a new review row.
pub async fn insert<'e>(executor: impl PgExecutor<'e>, record: &Review) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO reviews (id, rating, body, created_at) VALUES ($1, $2, $3, $4)")
        .bind(record.id.as_uuid())
        .bind(i16::from(record.rating))
        .bind(&record.body)
        .bind(record.created_at)
        .execute(executor)
        .await?;

    Ok(())
}

/// Delete a review row. Returns `false` if no row matched.
pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: ReviewId) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
        .bind(id.as_uuid())
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a set of review rows. Returns how many rows were removed.
pub async fn delete_many<'e>(
    executor: impl PgExecutor<'e>,
    ids: &[ReviewId],
) -> Result<u64, sqlx::Error> {
    let ids: Vec<Uuid> = ids.iter().map(|r| *r.as_uuid()).collect();
    let result = sqlx::query("DELETE FROM reviews WHERE id = ANY($1)")
        .bind(&ids)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

/// Load all reviews into memory on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<Review>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ReviewRow>(
        "SELECT id, rating, body, created_at FROM reviews ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(ReviewRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: Uuid,
    rating: i16,
    body: String,
    created_at: DateTime<Utc>,
}

impl ReviewRow {
    fn into_record(self) -> Review {
        // The table carries a CHECK constraint; an out-of-range value here
        // means the row was written around it.
        let rating = u8::try_from(self.rating).unwrap_or_else(|e| {
            tracing::error!(
                id = %self.id,
                rating = self.rating,
                error = %e,
                "review rating out of range in database, defaulting to minimum"
            );
            MIN_RATING
        });

        Review {
            id: ReviewId::from_uuid(self.id),
            rating,
            body: self.body,
            created_at: self.created_at,
        }
    }
}
