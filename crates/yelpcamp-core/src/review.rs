//! # Review
//!
//! A user-submitted evaluation. Reviews are stored independently of any
//! campground; the owning campground holds the reference.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::ReviewId;

/// Lowest accepted rating.
pub const MIN_RATING: u8 = 1;
/// Highest accepted rating.
pub const MAX_RATING: u8 = 5;

/// A persisted review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Server-generated identifier.
    pub id: ReviewId,
    /// Rating between [`MIN_RATING`] and [`MAX_RATING`].
    pub rating: u8,
    /// Review text. Never blank.
    pub body: String,
    /// When the review was written.
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Create a new review from validated fields, assigning a fresh id.
    pub fn new(fields: ReviewFields) -> Self {
        Self {
            id: ReviewId::new(),
            rating: fields.rating,
            body: fields.body,
            created_at: Utc::now(),
        }
    }
}

/// Validated field set for creating a review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewFields {
    pub(crate) rating: u8,
    pub(crate) body: String,
}

impl ReviewFields {
    /// The validated rating.
    pub fn rating(&self) -> u8 {
        self.rating
    }

    /// The validated body.
    pub fn body(&self) -> &str {
        &self.body
    }
}
