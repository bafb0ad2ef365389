//! # Route Handlers
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | `/` | [`home`] |
//! | GET, POST | `/campgrounds` | [`campgrounds::index`], [`campgrounds::create`] |
//! | GET | `/campgrounds/new` | [`campgrounds::new_form`] |
//! | GET, PUT, PATCH, DELETE | `/campgrounds/{id}` | [`campgrounds::show`], [`campgrounds::update`], [`campgrounds::destroy`] |
//! | GET | `/campgrounds/{id}/edit` | [`campgrounds::edit_form`] |
//! | POST | `/campgrounds/{id}/reviews` | [`reviews::create`] |
//! | DELETE | `/campgrounds/{id}/reviews/{review_id}` | [`reviews::destroy`] |
//!
//! Handlers validate before touching the store and answer with either a
//! rendered page or a `302 Found` redirect.

pub mod campgrounds;
pub mod reviews;

use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use crate::error::AppError;
use crate::state::AppState;
use crate::views::{self, Page};

/// Build the page router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .merge(campgrounds::router())
        .merge(reviews::router())
}

/// GET /: landing page.
pub async fn home() -> Page {
    views::home::home()
}

/// Fallback for unmatched paths and unsupported methods.
pub async fn not_found() -> AppError {
    AppError::page_not_found()
}

/// `302 Found` to `location`.
pub fn redirect(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}
