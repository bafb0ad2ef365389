//! # Campground
//!
//! The primary listing entity. A campground owns an ordered list of review
//! references; the referenced [`Review`](crate::Review) records live in
//! their own collection and are resolved at display time.
//!
//! [`CampgroundFields`] and [`CampgroundPatch`] can only be obtained from
//! the validator (see [`crate::validation`]), so every write path starts
//! from a payload that already passed its shape check.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::{CampgroundId, ReviewId};

/// A persisted campground listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campground {
    /// Server-generated identifier.
    pub id: CampgroundId,
    /// Display title. Never blank.
    pub title: String,
    /// Nightly price. Finite and non-negative.
    pub price: f64,
    /// Free-form description.
    pub description: Option<String>,
    /// Where the campground is.
    pub location: Option<String>,
    /// Image reference (usually a URL).
    pub image: Option<String>,
    /// Review references, oldest first.
    pub reviews: Vec<ReviewId>,
    /// When the campground was created.
    pub created_at: DateTime<Utc>,
    /// When the campground was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Campground {
    /// Create a new campground from validated fields, assigning a fresh id.
    pub fn new(fields: CampgroundFields) -> Self {
        let now = Utc::now();
        Self {
            id: CampgroundId::new(),
            title: fields.title,
            price: fields.price,
            description: fields.description,
            location: fields.location,
            image: fields.image,
            reviews: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the fields listed in `patch`, leaving the others untouched.
    pub fn apply(&mut self, patch: &CampgroundPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(location) = &patch.location {
            self.location = Some(location.clone());
        }
        if let Some(image) = &patch.image {
            self.image = Some(image.clone());
        }
        self.updated_at = Utc::now();
    }

    /// Append a review reference.
    pub fn attach_review(&mut self, review: ReviewId) {
        self.reviews.push(review);
        self.updated_at = Utc::now();
    }

    /// Pull every occurrence of a review reference. Returns whether any was removed.
    pub fn detach_review(&mut self, review: &ReviewId) -> bool {
        let before = self.reviews.len();
        self.reviews.retain(|r| r != review);
        let removed = self.reviews.len() != before;
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }

    /// Whether this campground references the given review.
    pub fn references(&self, review: &ReviewId) -> bool {
        self.reviews.contains(review)
    }
}

/// Validated field set for creating a campground.
#[derive(Debug, Clone, PartialEq)]
pub struct CampgroundFields {
    pub(crate) title: String,
    pub(crate) price: f64,
    pub(crate) description: Option<String>,
    pub(crate) location: Option<String>,
    pub(crate) image: Option<String>,
}

impl CampgroundFields {
    /// The validated title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The validated price.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// The description, if one was supplied.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The location, if one was supplied.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// The image reference, if one was supplied.
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

/// Validated partial update. `None` means "leave as is".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampgroundPatch {
    pub(crate) title: Option<String>,
    pub(crate) price: Option<f64>,
    pub(crate) description: Option<String>,
    pub(crate) location: Option<String>,
    pub(crate) image: Option<String>,
}

impl CampgroundPatch {
    /// Whether the patch lists no field at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.image.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> CampgroundFields {
        CampgroundFields {
            title: "Hilltop".into(),
            price: 20.0,
            description: Some("Nice view".into()),
            location: None,
            image: None,
        }
    }

    #[test]
    fn new_campground_has_no_reviews() {
        let camp = Campground::new(fields());
        assert_eq!(camp.title, "Hilltop");
        assert_eq!(camp.price, 20.0);
        assert_eq!(camp.description.as_deref(), Some("Nice view"));
        assert!(camp.reviews.is_empty());
        assert_eq!(camp.created_at, camp.updated_at);
    }

    #[test]
    fn apply_replaces_only_listed_fields() {
        let mut camp = Campground::new(fields());
        let patch = CampgroundPatch {
            price: Some(35.5),
            location: Some("Ridge Road".into()),
            ..CampgroundPatch::default()
        };
        camp.apply(&patch);
        assert_eq!(camp.title, "Hilltop");
        assert_eq!(camp.price, 35.5);
        assert_eq!(camp.description.as_deref(), Some("Nice view"));
        assert_eq!(camp.location.as_deref(), Some("Ridge Road"));
    }

    #[test]
    fn attach_and_detach_review() {
        let mut camp = Campground::new(fields());
        let r1 = ReviewId::new();
        let r2 = ReviewId::new();
        camp.attach_review(r1);
        camp.attach_review(r2);
        assert_eq!(camp.reviews, vec![r1, r2]);
        assert!(camp.references(&r1));

        assert!(camp.detach_review(&r1));
        assert_eq!(camp.reviews, vec![r2]);
        assert!(!camp.detach_review(&r1));
    }

    #[test]
    fn empty_patch() {
        assert!(CampgroundPatch::default().is_empty());
        let patch = CampgroundPatch {
            title: Some("x".into()),
            ..CampgroundPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
