//! # Application Error
//!
//! The single terminal point for failures. Handlers return
//! `Result<_, AppError>`; every error, including extractor rejections,
//! unmatched routes and caught panics, is converted into an
//! [`OperationError`] and rendered through the failure view.
//!
//! Internal error details are logged, never rendered.

use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use yelpcamp_core::ValidationError;
use yelpcamp_store::StoreError;

use crate::views;

/// Message shown for any failure without a more specific one.
pub const GENERIC_MESSAGE: &str = "Oh No, Something Went Wrong!!!";

/// Message shown when no route matches.
pub const PAGE_NOT_FOUND: &str = "Page Not Found";

/// What the failure view displays: a status and a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationError {
    /// HTTP status of the failure response.
    pub status_code: StatusCode,
    /// Text shown on the failure page.
    pub message: String,
}

impl OperationError {
    /// Build an error with an explicit status and message.
    pub fn new(status_code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
        }
    }
}

impl Default for OperationError {
    fn default() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_MESSAGE)
    }
}

impl IntoResponse for OperationError {
    fn into_response(self) -> Response {
        views::error::error(&self).into_response()
    }
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Payload failed validation (400). Displays the joined field messages.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Request body could not be read or has an unsupported format (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// No route, entity or review matches (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other failure (500). The message is logged but not rendered.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// The 404 used for unmatched routes and methods.
    pub fn page_not_found() -> Self {
        Self::NotFound(PAGE_NOT_FOUND.to_string())
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert into what the failure view displays.
    pub fn to_operation_error(&self) -> OperationError {
        let status = self.status();
        match self {
            Self::Validation(err) => OperationError::new(status, err.to_string()),
            Self::BadRequest(msg) | Self::NotFound(msg) => OperationError::new(status, msg.clone()),
            Self::Internal(_) => OperationError::default(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::Validation(_) | Self::BadRequest(_) => {
                tracing::debug!(error = %self, "rejected request")
            }
            Self::NotFound(_) => tracing::debug!(error = %self, "not found"),
        }
        self.to_operation_error().into_response()
    }
}

/// Map store errors: missing entities become 404, the rest are internal.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match &err {
            StoreError::CampgroundNotFound(_) => Self::NotFound("Campground Not Found".to_string()),
            StoreError::ReviewNotFound { .. } => Self::NotFound("Review Not Found".to_string()),
            StoreError::Database(_) | StoreError::Migration(_) => Self::Internal(err.to_string()),
        }
    }
}

/// Failure page for a handler that panicked.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!(panic = detail, "handler panicked");
    OperationError::default().into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use yelpcamp_core::{CampgroundId, ReviewId};

    /// Helper to extract status and body from a Response.
    async fn response_parts(response: Response) -> (StatusCode, String) {
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn default_operation_error() {
        let err = OperationError::default();
        assert_eq!(err.status_code, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Oh No, Something Went Wrong!!!");
    }

    #[test]
    fn operation_error_new_keeps_status_and_message() {
        let err = OperationError::new(StatusCode::NOT_FOUND, "Campground Not Found");
        assert_eq!(err.status_code, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Campground Not Found");
    }

    #[test]
    fn status_codes() {
        let validation = AppError::from(ValidationError::single("campground", "is required"));
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::page_not_found().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_message_is_joined_field_messages() {
        let err = AppError::from(ValidationError::new(vec![
            yelpcamp_core::FieldViolation::new("campground.title", "is required"),
            yelpcamp_core::FieldViolation::new("campground.price", "must be a number"),
        ]));
        assert_eq!(
            err.to_operation_error().message,
            "\"campground.title\" is required,\"campground.price\" must be a number"
        );
    }

    #[test]
    fn store_not_found_maps_to_404() {
        let err = AppError::from(StoreError::CampgroundNotFound(CampgroundId::new()));
        assert!(matches!(err, AppError::NotFound(_)));
        let err = AppError::from(StoreError::ReviewNotFound {
            campground: CampgroundId::new(),
            review: ReviewId::new(),
        });
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn store_database_error_maps_to_internal() {
        let err = AppError::from(StoreError::Database(sqlx::Error::PoolClosed));
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn into_response_not_found_renders_failure_page() {
        let (status, body) = response_parts(AppError::page_not_found().into_response()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Page Not Found"));
    }

    #[tokio::test]
    async fn into_response_validation() {
        let err = AppError::from(ValidationError::single("campground.price", "must be a number"));
        let (status, body) = response_parts(err.into_response()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("&quot;campground.price&quot; must be a number"));
    }

    #[tokio::test]
    async fn into_response_internal_hides_details() {
        let err = AppError::Internal("db connection failed".into());
        let (status, body) = response_parts(err.into_response()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains("db connection"), "leaked: {body}");
        assert!(body.contains(GENERIC_MESSAGE));
    }

    #[tokio::test]
    async fn panic_renders_generic_page() {
        let (status, body) = response_parts(panic_response(Box::new("boom"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains(GENERIC_MESSAGE));
        assert!(!body.contains("boom"));
    }
}
