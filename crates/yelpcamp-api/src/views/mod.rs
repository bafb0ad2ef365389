//! # Views
//!
//! Server-rendered HTML built with `maud`. Every view returns a [`Page`],
//! which carries its status code and turns into an HTML response.

pub mod campgrounds;
pub mod error;
pub mod home;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use maud::{html, Markup, DOCTYPE};

/// A rendered HTML page and the status to send it with.
#[derive(Debug)]
pub struct Page {
    status: StatusCode,
    markup: Markup,
}

impl Page {
    /// A page sent with `200 OK`.
    pub fn ok(markup: Markup) -> Self {
        Self::with_status(StatusCode::OK, markup)
    }

    /// A page sent with an explicit status.
    pub fn with_status(status: StatusCode, markup: Markup) -> Self {
        Self { status, markup }
    }

    /// The status this page is sent with.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The rendered document.
    pub fn into_string(self) -> String {
        self.markup.into_string()
    }
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        (self.status, Html(self.markup.into_string())).into_response()
    }
}

/// Wrap page content in the shared document shell.
pub(crate) fn layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " | YelpCamp" }
            }
            body {
                nav {
                    a href="/" { "YelpCamp" }
                    " "
                    a href="/campgrounds" { "Campgrounds" }
                    " "
                    a href="/campgrounds/new" { "New Campground" }
                }
                main { (content) }
                footer { p { "© YelpCamp" } }
            }
        }
    }
}

/// Format a nightly price: whole amounts without decimals, others with two.
pub(crate) fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{price:.0}")
    } else {
        format!("{price:.2}")
    }
}
