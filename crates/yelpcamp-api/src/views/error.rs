//! Failure page.

use maud::html;

use super::{layout, Page};
use crate::error::OperationError;

/// Render an [`OperationError`] with its status code.
pub fn error(err: &OperationError) -> Page {
    Page::with_status(
        err.status_code,
        layout(
            "Error",
            html! {
                div class="alert alert-danger" role="alert" {
                    h1 { (err.message) }
                    p { "Status " (err.status_code.as_u16()) }
                    a href="/campgrounds" { "Back to Campgrounds" }
                }
            },
        ),
    )
}
