//! # Store Errors

use thiserror::Error;
use yelpcamp_core::{CampgroundId, ReviewId};

/// Failure of a resource store operation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No campground with this id.
    #[error("campground {0} not found")]
    CampgroundNotFound(CampgroundId),

    /// The campground does not reference this review.
    #[error("review {review} not found on campground {campground}")]
    ReviewNotFound {
        /// The campground that was searched.
        campground: CampgroundId,
        /// The review that was looked for.
        review: ReviewId,
    },

    /// The database rejected or failed a query.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Embedded migrations could not be applied.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    /// Whether this error means the addressed entity does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::CampgroundNotFound(_) | Self::ReviewNotFound { .. }
        )
    }
}
