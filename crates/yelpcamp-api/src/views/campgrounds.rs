//! # Campground Views
//!
//! Listing, detail and the two campground forms. Forms post with
//! `campground[field]` / `review[field]` names and express PUT and DELETE
//! through the `_method` query parameter.

use maud::{html, Markup};
use yelpcamp_core::review::{MAX_RATING, MIN_RATING};
use yelpcamp_core::{Campground, Review};
use yelpcamp_store::CampgroundDetail;

use super::{format_price, layout, Page};

/// All campgrounds.
pub fn index(campgrounds: &[Campground]) -> Page {
    Page::ok(layout(
        "All Campgrounds",
        html! {
            h1 { "All Campgrounds" }
            a href="/campgrounds/new" { "Add Campground" }
            @if campgrounds.is_empty() {
                p { "No campgrounds yet." }
            } @else {
                ul class="campgrounds" {
                    @for campground in campgrounds {
                        li {
                            (summary(campground))
                        }
                    }
                }
            }
        },
    ))
}

fn summary(campground: &Campground) -> Markup {
    html! {
        @if let Some(image) = &campground.image {
            img src=(image) alt=(campground.title);
        }
        h2 { (campground.title) }
        @if let Some(location) = &campground.location {
            small { (location) }
        }
        @if let Some(description) = &campground.description {
            p { (description) }
        }
        a href=(format!("/campgrounds/{}", campground.id)) { "View " (campground.title) }
    }
}

/// Creation form.
pub fn new() -> Page {
    Page::ok(layout(
        "New Campground",
        html! {
            h1 { "New Campground" }
            form action="/campgrounds" method="post" {
                (campground_inputs(None))
                button type="submit" { "Add Campground" }
            }
            a href="/campgrounds" { "All Campgrounds" }
        },
    ))
}

/// Edit form, prefilled with the stored values.
pub fn edit(campground: &Campground) -> Page {
    Page::ok(layout(
        &format!("Edit {}", campground.title),
        html! {
            h1 { "Edit Campground" }
            form action=(format!("/campgrounds/{}?_method=PUT", campground.id)) method="post" {
                (campground_inputs(Some(campground)))
                button type="submit" { "Update Campground" }
            }
            a href=(format!("/campgrounds/{}", campground.id)) { "Back To Campground" }
        },
    ))
}

fn campground_inputs(current: Option<&Campground>) -> Markup {
    // Unrounded, so resubmitting the form keeps the stored price.
    let price = current.map(|c| c.price.to_string());
    html! {
        label for="title" { "Title" }
        input type="text" id="title" name="campground[title]" required
            value=[current.map(|c| c.title.as_str())];
        label for="location" { "Location" }
        input type="text" id="location" name="campground[location]"
            value=[current.and_then(|c| c.location.as_deref())];
        label for="image" { "Image URL" }
        input type="text" id="image" name="campground[image]"
            value=[current.and_then(|c| c.image.as_deref())];
        label for="price" { "Campground Price" }
        input type="number" id="price" name="campground[price]" min="0" step="any" required
            value=[price.as_deref()];
        label for="description" { "Description" }
        textarea id="description" name="campground[description]" {
            (current.and_then(|c| c.description.as_deref()).unwrap_or_default())
        }
    }
}

/// Detail page with resolved reviews and the review form.
pub fn show(detail: &CampgroundDetail) -> Page {
    let campground = &detail.campground;
    let base = format!("/campgrounds/{}", campground.id);

    Page::ok(layout(
        &campground.title,
        html! {
            article class="campground" {
                @if let Some(image) = &campground.image {
                    img src=(image) alt=(campground.title);
                }
                h1 { (campground.title) }
                @if let Some(description) = &campground.description {
                    p { (description) }
                }
                @if let Some(location) = &campground.location {
                    p class="location" { (location) }
                }
                p class="price" { "$" (format_price(campground.price)) "/night" }
                a href=(format!("{base}/edit")) { "Edit" }
                form action=(format!("{base}?_method=DELETE")) method="post" {
                    button type="submit" { "Delete" }
                }
            }
            section class="reviews" {
                h2 { "Leave a Review" }
                form action=(format!("{base}/reviews")) method="post" {
                    label for="rating" { "Rating" }
                    input type="range" id="rating" name="review[rating]"
                        min=(MIN_RATING) max=(MAX_RATING) value=(MIN_RATING);
                    label for="body" { "Review" }
                    textarea id="body" name="review[body]" required {}
                    button type="submit" { "Submit" }
                }
                @if detail.reviews.is_empty() {
                    p class="no-reviews" { "No reviews yet." }
                } @else {
                    @for review in &detail.reviews {
                        (review_card(&base, review))
                    }
                }
            }
            a href="/campgrounds" { "All Campgrounds" }
        },
    ))
}

fn review_card(base: &str, review: &Review) -> Markup {
    html! {
        div class="review" {
            h3 { "Rating: " (review.rating) }
            p { (review.body) }
            small { (review.created_at.format("%Y-%m-%d").to_string()) }
            form action=(format!("{base}/reviews/{}?_method=DELETE", review.id)) method="post" {
                button type="submit" { "Delete" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use yelpcamp_core::{CampgroundFields, ReviewFields};

    fn hilltop() -> Campground {
        Campground::new(
            CampgroundFields::from_payload(&json!({
                "campground": {"title": "Hilltop", "description": "Nice view", "price": 20}
            }))
            .unwrap(),
        )
    }

    #[test]
    fn index_links_each_campground() {
        let camp = hilltop();
        let html = index(std::slice::from_ref(&camp)).into_string();
        assert!(html.contains("Hilltop"));
        assert!(html.contains(&format!("href=\"/campgrounds/{}\"", camp.id)));
    }

    #[test]
    fn index_empty() {
        let html = index(&[]).into_string();
        assert!(html.contains("No campgrounds yet."));
    }

    #[test]
    fn new_form_uses_bracketed_names() {
        let html = new().into_string();
        assert!(html.contains("name=\"campground[title]\""));
        assert!(html.contains("name=\"campground[price]\""));
        assert!(html.contains("action=\"/campgrounds\""));
    }

    #[test]
    fn edit_form_overrides_to_put_and_prefills() {
        let camp = hilltop();
        let html = edit(&camp).into_string();
        assert!(html.contains(&format!("/campgrounds/{}?_method=PUT", camp.id)));
        assert!(html.contains("value=\"Hilltop\""));
        assert!(html.contains("value=\"20\""));
        assert!(html.contains("Nice view"));
    }

    #[test]
    fn edit_form_keeps_full_price_precision() {
        let mut camp = hilltop();
        camp.price = 12.345;
        let html = edit(&camp).into_string();
        assert!(html.contains("value=\"12.345\""), "{html}");
        assert!(html.contains("step=\"any\""));
    }

    #[test]
    fn show_without_reviews() {
        let detail = CampgroundDetail {
            campground: hilltop(),
            reviews: Vec::new(),
        };
        let html = show(&detail).into_string();
        assert!(html.contains("<h1>Hilltop</h1>"));
        assert!(html.contains("$20/night"));
        assert!(html.contains("No reviews yet."));
        assert!(html.contains("name=\"review[rating]\""));
    }

    #[test]
    fn show_lists_reviews_with_delete_forms() {
        let mut camp = hilltop();
        let review = Review::new(
            ReviewFields::from_payload(&json!({"review": {"rating": 4, "body": "Great <b>stars</b>"}}))
                .unwrap(),
        );
        camp.attach_review(review.id);
        let detail = CampgroundDetail {
            campground: camp.clone(),
            reviews: vec![review.clone()],
        };
        let html = show(&detail).into_string();
        assert!(html.contains("Rating: 4"));
        assert!(html.contains("Great &lt;b&gt;stars&lt;/b&gt;"));
        assert!(html.contains(&format!(
            "/campgrounds/{}/reviews/{}?_method=DELETE",
            camp.id, review.id
        )));
        assert!(!html.contains("No reviews yet."));
    }
}
