//! # yelpcamp-api: Axum Web Service
//!
//! Server-rendered campground and review pages on Axum/Tower/Tokio.
//!
//! ## Request Pipeline
//!
//! ```text
//! method override → TraceLayer → CatchPanicLayer → body limit → Router → handler
//! ```
//!
//! - Method override rewrites `POST ?_method=PUT|PATCH|DELETE` before
//!   routing; see [`middleware::method_override`].
//! - Every failure, including unmatched routes and methods, ends in
//!   [`AppError`]'s failure page.
//! - `/health/*` probes sit beside the page routes.

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod views;

use axum::extract::{DefaultBodyLimit, Request, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tower::util::MapRequest;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::{AppConfig, AppState};

/// Largest accepted request body.
pub const BODY_LIMIT_BYTES: usize = 2 * 1024 * 1024;

/// The assembled service: the router behind the method-override rewrite.
pub type App = MapRequest<Router, fn(Request) -> Request>;

/// Assemble the full application with all routes and middleware.
pub fn app(state: AppState) -> App {
    let routes = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .merge(routes::router());
    assemble(routes, state)
}

/// Wrap `routes` in the request pipeline: 404 fallbacks, body limit, panic
/// recovery, tracing, then the method-override rewrite.
pub fn assemble(routes: Router<AppState>, state: AppState) -> App {
    let router = routes
        .fallback(routes::not_found)
        .method_not_allowed_fallback(routes::not_found)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let rewrite: fn(Request) -> Request = middleware::method_override::override_method;
    router.map_request(rewrite)
}

/// Liveness probe: always 200 while the process runs.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 "ready", or 503 when the configured database does
/// not answer.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    if let Err(e) = state.repository.ping().await {
        tracing::warn!("Database health check failed: {e}");
        return (StatusCode::SERVICE_UNAVAILABLE, "database unreachable").into_response();
    }
    (StatusCode::OK, "ready").into_response()
}
