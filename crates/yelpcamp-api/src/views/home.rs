//! Landing page.

use maud::html;

use super::{layout, Page};

/// GET / page.
pub fn home() -> Page {
    Page::ok(layout(
        "Home",
        html! {
            h1 { "YelpCamp" }
            p { "Jump right in and explore campgrounds from all around the world." }
            a href="/campgrounds" { "View Campgrounds" }
        },
    ))
}
