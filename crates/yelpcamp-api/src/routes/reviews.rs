//! # Review Actions
//!
//! Reviews have no pages of their own; both actions redirect back to the
//! owning campground.

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::routing::{delete, post};
use axum::Router;
use yelpcamp_core::{ReviewFields, ReviewId};

use super::campgrounds::campground_id;
use super::redirect;
use crate::error::AppError;
use crate::extractors::{extract_path, parse_id, Payload};
use crate::state::AppState;

/// Build the reviews router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/campgrounds/{id}/reviews", post(create))
        .route("/campgrounds/{id}/reviews/{review_id}", delete(destroy))
}

/// POST /campgrounds/{id}/reviews
pub async fn create(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    Payload(payload): Payload,
) -> Result<Response, AppError> {
    let campground = campground_id(path)?;
    let fields = ReviewFields::from_payload(&payload)?;
    state.repository.add_review(campground, fields).await?;
    Ok(redirect(&format!("/campgrounds/{campground}")))
}

/// DELETE /campgrounds/{id}/reviews/{review_id}
pub async fn destroy(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Response, AppError> {
    let (raw_campground, raw_review) = extract_path(path)?;
    let campground = parse_id(&raw_campground)?;
    let review: ReviewId = parse_id(&raw_review)?;
    state.repository.delete_review(campground, review).await?;
    Ok(redirect(&format!("/campgrounds/{campground}")))
}
