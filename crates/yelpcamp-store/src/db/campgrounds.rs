//! Campground persistence operations on the `campgrounds` table.
//!
//! Review references live in the ordered `review_ids` array column and are
//! changed with `array_append` / `array_remove`, never by rewriting the
//! whole row, so a field update cannot clobber a concurrent review attach.

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgExecutor, PgPool};
use uuid::Uuid;
use yelpcamp_core::{Campground, CampgroundId, ReviewId};

/// Insert a new campground row.
pub async fn insert<'e>(executor: impl PgExecutor<'e>, record: &Campground) -> Result<(), sqlx::Error> {
    let review_ids: Vec<Uuid> = record.reviews.iter().map(|r| *r.as_uuid()).collect();

    sqlx::query(
        "INSERT INTO campgrounds (id, title, price, description, location, image, review_ids, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(record.id.as_uuid())
    .bind(&record.title)
    .bind(record.price)
    .bind(&record.description)
    .bind(&record.location)
    .bind(&record.image)
    .bind(&review_ids)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(executor)
    .await?;

    Ok(())
}

/// Write the scalar fields of a campground. Returns `false` if no row matched.
pub async fn update_fields<'e>(
    executor: impl PgExecutor<'e>,
    record: &Campground,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE campgrounds
         SET title = $1, price = $2, description = $3, location = $4, image = $5, updated_at = $6
         WHERE id = $7",
    )
    .bind(&record.title)
    .bind(record.price)
    .bind(&record.description)
    .bind(&record.location)
    .bind(&record.image)
    .bind(record.updated_at)
    .bind(record.id.as_uuid())
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Append a review reference. Returns `false` if the campground does not exist.
pub async fn append_review<'e>(
    executor: impl PgExecutor<'e>,
    id: CampgroundId,
    review: ReviewId,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE campgrounds SET review_ids = array_append(review_ids, $1), updated_at = $2 WHERE id = $3",
    )
    .bind(review.as_uuid())
    .bind(Utc::now())
    .bind(id.as_uuid())
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Pull every occurrence of a review reference. Returns `false` if the
/// campground does not exist.
pub async fn pull_review<'e>(
    executor: impl PgExecutor<'e>,
    id: CampgroundId,
    review: ReviewId,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE campgrounds SET review_ids = array_remove(review_ids, $1), updated_at = $2 WHERE id = $3",
    )
    .bind(review.as_uuid())
    .bind(Utc::now())
    .bind(id.as_uuid())
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a campground row. Returns `false` if no row matched.
pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: CampgroundId) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM campgrounds WHERE id = $1")
        .bind(id.as_uuid())
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Load all campgrounds into memory on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<Campground>, sqlx::Error> {
    let rows = sqlx::query_as::<_, CampgroundRow>(
        "SELECT id, title, price, description, location, image, review_ids, created_at, updated_at
         FROM campgrounds ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(CampgroundRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct CampgroundRow {
    id: Uuid,
    title: String,
    price: f64,
    description: Option<String>,
    location: Option<String>,
    image: Option<String>,
    review_ids: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CampgroundRow {
    fn into_record(self) -> Campground {
        Campground {
            id: CampgroundId::from_uuid(self.id),
            title: self.title,
            price: self.price,
            description: self.description,
            location: self.location,
            image: self.image,
            reviews: self.review_ids.into_iter().map(ReviewId::from_uuid).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
