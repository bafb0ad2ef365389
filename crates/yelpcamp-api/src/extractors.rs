//! # Custom Extractors
//!
//! [`Payload`] reads a request body into the untyped structure the
//! validators take, and [`extract_path`] / [`parse_id`] turn path
//! parameters into typed ids. Every rejection becomes an [`AppError`] so it
//! reaches the failure page.
//!
//! ## Body formats
//!
//! - `application/x-www-form-urlencoded`: bracketed keys are folded into
//!   nested objects, so `campground[title]=Hilltop` becomes
//!   `{"campground": {"title": "Hilltop"}}`. Every leaf is a string.
//!   Nesting stops at [`MAX_FORM_DEPTH`].
//! - `application/json`: taken as-is.
//!
//! Anything else is a 400.

use std::str::FromStr;

use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequest, Path, Request};
use axum::http::header::CONTENT_TYPE;
use axum::{Form, Json};
use serde_json::{Map, Value};

use crate::error::AppError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Deepest bracket nesting folded out of a form key. Brackets past this
/// depth stay together as one literal key.
pub const MAX_FORM_DEPTH: usize = 5;

/// An untyped request body, ready for validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload(pub Value);

impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match mime.as_str() {
            FORM_CONTENT_TYPE => {
                let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                    .await
                    .map_err(|err| AppError::BadRequest(err.body_text()))?;
                Ok(Self(fold_form_pairs(pairs)))
            }
            JSON_CONTENT_TYPE => {
                let Json(value) = Json::<Value>::from_request(req, state)
                    .await
                    .map_err(|err| AppError::BadRequest(err.body_text()))?;
                Ok(Self(value))
            }
            "" => Err(AppError::BadRequest("missing request body content type".to_string())),
            _ => Err(AppError::BadRequest(format!(
                "unsupported content type: {content_type}"
            ))),
        }
    }
}

/// Fold `key[sub][leaf]=value` pairs into nested objects. Later values win.
pub fn fold_form_pairs(pairs: Vec<(String, String)>) -> Value {
    let mut root = Map::new();
    for (key, value) in pairs {
        let segments = key_segments(&key);
        insert_nested(&mut root, &segments, value);
    }
    Value::Object(root)
}

/// Split `a[b][c]` into `["a", "b", "c"]`. Keys that are not well formed
/// are kept whole. At most [`MAX_FORM_DEPTH`] brackets are split off; the
/// rest of the key becomes the last segment as written.
fn key_segments(key: &str) -> Vec<&str> {
    let Some(open) = key.find('[') else {
        return vec![key];
    };
    if open == 0 {
        return vec![key];
    }

    let mut segments = vec![&key[..open]];
    let mut rest = &key[open..];
    while let Some(inner) = rest.strip_prefix('[') {
        if segments.len() > MAX_FORM_DEPTH {
            segments.push(rest);
            return segments;
        }
        let Some(close) = inner.find(']') else {
            return vec![key];
        };
        segments.push(&inner[..close]);
        rest = &inner[close + 1..];
    }
    if !rest.is_empty() {
        return vec![key];
    }
    segments
}

fn insert_nested(root: &mut Map<String, Value>, segments: &[&str], value: String) {
    let Some((leaf, parents)) = segments.split_last() else {
        return;
    };

    let mut current = root;
    for segment in parents {
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = match entry {
            Value::Object(map) => map,
            _ => return,
        };
    }
    current.insert(leaf.to_string(), Value::String(value));
}

/// Unwrap a path extraction. A path that cannot be decoded addresses
/// nothing, so the rejection is a 404.
pub fn extract_path<T>(result: Result<Path<T>, PathRejection>) -> Result<T, AppError> {
    result
        .map(|Path(v)| v)
        .map_err(|err| AppError::NotFound(err.body_text()))
}

/// Parse a raw path segment into a typed id. Malformed ids are a 404.
pub fn parse_id<T>(raw: &str) -> Result<T, AppError>
where
    T: FromStr,
{
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("no resource with id {raw:?}")))
}
