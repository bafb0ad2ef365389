//! # Method Override
//!
//! HTML forms can only submit GET and POST. A POST carrying
//! `?_method=PUT`, `?_method=PATCH` or `?_method=DELETE` (any case) is
//! re-dispatched with that method.
//!
//! Routing happens inside the `Router`, so this runs as a request map
//! wrapped around the whole router rather than as a route layer.

use std::collections::HashMap;

use axum::extract::{Query, Request};
use axum::http::Method;

/// Query parameter naming the intended method.
pub const METHOD_PARAM: &str = "_method";

/// Rewrite the method of an overridden POST. Other requests pass through
/// untouched.
pub fn override_method(mut request: Request) -> Request {
    if request.method() != Method::POST {
        return request;
    }
    if let Some(method) = requested_method(&request) {
        tracing::debug!(
            path = %request.uri().path(),
            method = %method,
            "method override"
        );
        *request.method_mut() = method;
    }
    request
}

fn requested_method(request: &Request) -> Option<Method> {
    let Query(params) = Query::<HashMap<String, String>>::try_from_uri(request.uri()).ok()?;
    let value = params.get(METHOD_PARAM)?;
    match value.trim().to_ascii_uppercase().as_str() {
        "PUT" => Some(Method::PUT),
        "PATCH" => Some(Method::PATCH),
        "DELETE" => Some(Method::DELETE),
        _ => None,
    }
}
