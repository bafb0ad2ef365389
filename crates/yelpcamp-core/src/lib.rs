#![deny(missing_docs)]

//! # yelpcamp-core: Foundational Types for YelpCamp
//!
//! Entities, identifiers and payload validation shared by the store and the
//! web layer. No I/O happens here; only `serde`, `serde_json`, `thiserror`,
//! `chrono` and `uuid` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype identifiers.** A [`ReviewId`] cannot be passed where a
//!    [`CampgroundId`] is expected.
//!
//! 2. **Validated inputs are types.** Store writes take [`CampgroundFields`],
//!    [`CampgroundPatch`] or [`ReviewFields`], which only the validator can
//!    build. An unvalidated payload cannot reach persistence.
//!
//! 3. **All violations at once.** [`ValidationError`] carries every field
//!    violation found, joined into one message for display.

pub mod campground;
pub mod error;
pub mod identity;
pub mod review;
pub mod validation;

// Re-export primary types at crate root for ergonomic imports.
pub use campground::{Campground, CampgroundFields, CampgroundPatch};
pub use error::{FieldViolation, ValidationError};
pub use identity::{CampgroundId, ReviewId};
pub use review::{Review, ReviewFields};
pub use validation::{validate, Shape, ValidationResult};
