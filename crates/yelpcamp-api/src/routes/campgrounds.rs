//! # Campground Pages
//!
//! Listing, detail, the two forms, and the create/update/delete actions.

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use yelpcamp_core::{CampgroundFields, CampgroundId, CampgroundPatch};

use super::redirect;
use crate::error::AppError;
use crate::extractors::{extract_path, parse_id, Payload};
use crate::state::AppState;
use crate::views::{self, Page};

/// Build the campgrounds router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/campgrounds", get(index).post(create))
        .route("/campgrounds/new", get(new_form))
        .route(
            "/campgrounds/{id}",
            get(show).put(update).patch(update).delete(destroy),
        )
        .route("/campgrounds/{id}/edit", get(edit_form))
}

/// Resolve the `{id}` segment. Undecodable or malformed ids are a 404.
pub(crate) fn campground_id(
    path: Result<Path<String>, PathRejection>,
) -> Result<CampgroundId, AppError> {
    parse_id(&extract_path(path)?)
}

/// GET /campgrounds
pub async fn index(State(state): State<AppState>) -> Page {
    views::campgrounds::index(&state.repository.list_campgrounds())
}

/// GET /campgrounds/new
pub async fn new_form() -> Page {
    views::campgrounds::new()
}

/// POST /campgrounds: validate, create, redirect to the new campground.
pub async fn create(
    State(state): State<AppState>,
    Payload(payload): Payload,
) -> Result<Response, AppError> {
    let fields = CampgroundFields::from_payload(&payload)?;
    let campground = state.repository.create_campground(fields).await?;
    Ok(redirect(&format!("/campgrounds/{}", campground.id)))
}

/// GET /campgrounds/{id}: detail page with resolved reviews.
pub async fn show(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Page, AppError> {
    let id = campground_id(path)?;
    let detail = state.repository.campground_with_reviews(id)?;
    Ok(views::campgrounds::show(&detail))
}

/// GET /campgrounds/{id}/edit
pub async fn edit_form(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Page, AppError> {
    let id = campground_id(path)?;
    let campground = state.repository.campground(id)?;
    Ok(views::campgrounds::edit(&campground))
}

/// PUT /campgrounds/{id}: replace the submitted fields.
///
/// The payload is validated before the id is looked up, so an invalid
/// update never reaches the store.
pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    Payload(payload): Payload,
) -> Result<Response, AppError> {
    let id = campground_id(path)?;
    let patch = CampgroundPatch::from_payload(&payload)?;
    let campground = state.repository.update_campground(id, &patch).await?;
    Ok(redirect(&format!("/campgrounds/{}", campground.id)))
}

/// DELETE /campgrounds/{id}
pub async fn destroy(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, AppError> {
    let id = campground_id(path)?;
    state.repository.delete_campground(id).await?;
    Ok(redirect("/campgrounds"))
}
