//! # Payload Validation
//!
//! Explicit shape checks for the untyped request payloads accepted by the
//! web layer. A payload is a nested JSON-like mapping; the entity fields sit
//! under an envelope key (`campground` or `review`), matching the field
//! names used by the HTML forms (`campground[title]`, `review[rating]`, ...).
//!
//! Two entry points exist for every [`Shape`]:
//!
//! - [`validate`] is the pure yes/no check returning a [`ValidationResult`].
//! - The typed parsers ([`CampgroundFields::from_payload`],
//!   [`CampgroundPatch::from_payload`], [`ReviewFields::from_payload`])
//!   return the validated field set, which is the only way to obtain one.
//!
//! Every field is checked before the payload is rejected, and messages read
//! `"<path>" <reason>`.

use serde_json::{Map, Value};

use crate::campground::{CampgroundFields, CampgroundPatch};
use crate::error::{FieldViolation, ValidationError};
use crate::review::{ReviewFields, MAX_RATING, MIN_RATING};

/// Envelope key of campground payloads.
pub const CAMPGROUND_KEY: &str = "campground";
/// Envelope key of review payloads.
pub const REVIEW_KEY: &str = "review";

const CAMPGROUND_FIELDS: &[&str] = &["title", "price", "description", "location", "image"];
const REVIEW_FIELDS: &[&str] = &["rating", "body"];

/// A named payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Full campground, as submitted by the creation form.
    Campground,
    /// Partial campground, as submitted by the edit form.
    CampgroundUpdate,
    /// Review, as submitted from the campground detail page.
    Review,
}

impl Shape {
    /// Stable name of the shape.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Campground => "campground",
            Self::CampgroundUpdate => "campground-update",
            Self::Review => "review",
        }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a pure shape check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// The payload matches the shape.
    Ok,
    /// The payload breaks the shape; one message per violation.
    Invalid(Vec<String>),
}

impl ValidationResult {
    /// Whether the payload matched.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl From<Result<(), ValidationError>> for ValidationResult {
    fn from(result: Result<(), ValidationError>) -> Self {
        match result {
            Ok(()) => Self::Ok,
            Err(err) => Self::Invalid(err.messages()),
        }
    }
}

/// Check `payload` against `shape` without producing a typed value.
pub fn validate(payload: &Value, shape: Shape) -> ValidationResult {
    let result = match shape {
        Shape::Campground => CampgroundFields::from_payload(payload).map(drop),
        Shape::CampgroundUpdate => CampgroundPatch::from_payload(payload).map(drop),
        Shape::Review => ReviewFields::from_payload(payload).map(drop),
    };
    result.into()
}

impl CampgroundFields {
    /// Validate a creation payload and return its typed field set.
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationError> {
        let mut reader = FieldReader::open(payload, CAMPGROUND_KEY)?;
        reader.reject_unknown(CAMPGROUND_FIELDS);
        let title = reader.required_text("title");
        let price = reader.required_number("price", 0.0);
        let description = reader.optional_text("description");
        let location = reader.optional_text("location");
        let image = reader.optional_text("image");
        reader.finish()?;

        match (title, price) {
            (Some(title), Some(price)) => Ok(Self {
                title,
                price,
                description,
                location,
                image,
            }),
            // finish() has already reported the missing field.
            _ => Err(ValidationError::single(CAMPGROUND_KEY, "is invalid")),
        }
    }
}

impl CampgroundPatch {
    /// Validate an update payload and return the listed fields.
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationError> {
        let mut reader = FieldReader::open(payload, CAMPGROUND_KEY)?;
        reader.reject_unknown(CAMPGROUND_FIELDS);
        let title = reader
            .contains("title")
            .then(|| reader.required_text("title"))
            .flatten();
        let price = reader
            .contains("price")
            .then(|| reader.required_number("price", 0.0))
            .flatten();
        let description = reader.optional_text("description");
        let location = reader.optional_text("location");
        let image = reader.optional_text("image");
        reader.finish()?;

        Ok(Self {
            title,
            price,
            description,
            location,
            image,
        })
    }
}

impl ReviewFields {
    /// Validate a review payload and return its typed field set.
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationError> {
        let mut reader = FieldReader::open(payload, REVIEW_KEY)?;
        reader.reject_unknown(REVIEW_FIELDS);
        let rating = reader.required_integer("rating", i64::from(MIN_RATING), i64::from(MAX_RATING));
        let body = reader.required_text("body");
        reader.finish()?;

        match (rating, body) {
            (Some(rating), Some(body)) => {
                let rating = u8::try_from(rating)
                    .map_err(|_| ValidationError::single("review.rating", "is out of range"))?;
                Ok(Self { rating, body })
            }
            _ => Err(ValidationError::single(REVIEW_KEY, "is invalid")),
        }
    }
}

/// Walks the fields of one envelope object, collecting violations.
struct FieldReader<'a> {
    envelope: &'static str,
    object: &'a Map<String, Value>,
    violations: Vec<FieldViolation>,
}

impl<'a> FieldReader<'a> {
    /// Locate the envelope object inside the payload.
    fn open(payload: &'a Value, envelope: &'static str) -> Result<Self, ValidationError> {
        let root = payload
            .as_object()
            .ok_or_else(|| ValidationError::single("value", "must be of type object"))?;
        let object = match root.get(envelope) {
            None | Some(Value::Null) => {
                return Err(ValidationError::single(envelope, "is required"));
            }
            Some(Value::Object(object)) => object,
            Some(_) => {
                return Err(ValidationError::single(envelope, "must be of type object"));
            }
        };
        Ok(Self {
            envelope,
            object,
            violations: Vec::new(),
        })
    }

    fn path(&self, field: &str) -> String {
        format!("{}.{}", self.envelope, field)
    }

    fn violation(&mut self, field: &str, reason: impl Into<String>) {
        let path = self.path(field);
        self.violations.push(FieldViolation::new(path, reason));
    }

    fn contains(&self, field: &str) -> bool {
        self.object.contains_key(field)
    }

    fn reject_unknown(&mut self, allowed: &[&str]) {
        let unknown: Vec<String> = self
            .object
            .keys()
            .filter(|k| !allowed.contains(&k.as_str()))
            .cloned()
            .collect();
        for key in unknown {
            self.violation(&key, "is not allowed");
        }
    }

    fn required_text(&mut self, field: &str) -> Option<String> {
        match self.object.get(field) {
            None => {
                self.violation(field, "is required");
                None
            }
            Some(Value::String(s)) if s.trim().is_empty() => {
                self.violation(field, "is not allowed to be empty");
                None
            }
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                self.violation(field, "must be a string");
                None
            }
        }
    }

    /// Blank strings count as absent: an untouched form input submits "".
    fn optional_text(&mut self, field: &str) -> Option<String> {
        match self.object.get(field) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                self.violation(field, "must be a string");
                None
            }
        }
    }

    fn number(&mut self, field: &str) -> Option<f64> {
        let value = match self.object.get(field) {
            None => {
                self.violation(field, "is required");
                return None;
            }
            Some(Value::Number(n)) => n.as_f64(),
            // Form bodies carry every value as text.
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            Some(_) => None,
        };
        match value {
            Some(v) if v.is_finite() => Some(v),
            _ => {
                self.violation(field, "must be a number");
                None
            }
        }
    }

    fn required_number(&mut self, field: &str, min: f64) -> Option<f64> {
        let value = self.number(field)?;
        if value < min {
            self.violation(field, format!("must be greater than or equal to {min}"));
            return None;
        }
        Some(value)
    }

    fn required_integer(&mut self, field: &str, min: i64, max: i64) -> Option<i64> {
        let value = self.number(field)?;
        if value.fract() != 0.0 {
            self.violation(field, "must be an integer");
            return None;
        }
        if value < min as f64 {
            self.violation(field, format!("must be greater than or equal to {min}"));
            return None;
        }
        if value > max as f64 {
            self.violation(field, format!("must be less than or equal to {max}"));
            return None;
        }
        Some(value as i64)
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.violations))
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Generated creation payload parts: title, price, price sent as form
    /// text, then the three optional fields.
    type CampgroundParts = (String, f64, bool, Option<String>, Option<String>, Option<String>);

    fn campground_parts() -> impl Strategy<Value = CampgroundParts> {
        let text = "[A-Za-z][A-Za-z0-9 ,.]{0,40}";
        (
            "[A-Za-z][A-Za-z0-9 ]{0,30}",
            0.0f64..10_000.0,
            any::<bool>(),
            prop::option::of(text),
            prop::option::of(text),
            prop::option::of("https://[a-z]{1,12}\\.example/[a-z0-9]{1,16}\\.jpg"),
        )
    }

    fn payload_of(parts: &CampgroundParts) -> Map<String, Value> {
        let (title, price, price_as_text, description, location, image) = parts;
        let mut fields = Map::new();
        fields.insert("title".into(), Value::String(title.clone()));
        let price = if *price_as_text {
            Value::String(price.to_string())
        } else {
            serde_json::json!(price)
        };
        fields.insert("price".into(), price);
        for (key, value) in [("description", description), ("location", location), ("image", image)] {
            if let Some(value) = value {
                fields.insert(key.into(), Value::String(value.clone()));
            }
        }
        fields
    }

    fn wrap(fields: Map<String, Value>) -> Value {
        serde_json::json!({ "campground": Value::Object(fields) })
    }

    proptest! {
        /// Every well-formed creation payload parses to exactly the submitted fields.
        #[test]
        fn valid_campground_payload_parses_to_its_fields(parts in campground_parts()) {
            let fields = CampgroundFields::from_payload(&wrap(payload_of(&parts))).unwrap();
            let (title, price, _, description, location, image) = &parts;
            prop_assert_eq!(fields.title(), title.as_str());
            prop_assert_eq!(fields.price(), *price);
            prop_assert_eq!(fields.description(), description.as_deref());
            prop_assert_eq!(fields.location(), location.as_deref());
            prop_assert_eq!(fields.image(), image.as_deref());
        }

        /// Dropping a required key always fails and names that key.
        #[test]
        fn missing_required_campground_field_is_rejected(
            parts in campground_parts(),
            dropped in prop_oneof![Just("title"), Just("price")],
        ) {
            let mut fields = payload_of(&parts);
            fields.remove(dropped);
            let payload = wrap(fields);

            let err = CampgroundFields::from_payload(&payload).unwrap_err();
            let expected = format!("\"campground.{dropped}\" is required");
            prop_assert!(err.to_string().contains(&expected), "{}", err);
            prop_assert!(!validate(&payload, Shape::Campground).is_ok());
        }

        /// Patches accept any subset of valid fields.
        #[test]
        fn any_subset_is_a_valid_patch(
            parts in campground_parts(),
            dropped in prop::sample::subsequence(vec!["title", "price", "description"], 0..=3),
        ) {
            let mut fields = payload_of(&parts);
            for key in &dropped {
                fields.remove(*key);
            }
            let patch = CampgroundPatch::from_payload(&wrap(fields)).unwrap();
            prop_assert_eq!(patch.title.is_none(), dropped.contains(&"title"));
            prop_assert_eq!(patch.price.is_none(), dropped.contains(&"price"));
        }
    }
}
