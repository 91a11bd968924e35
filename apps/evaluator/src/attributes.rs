//! Attribute normalizer: turns the model's raw reply into the canonical
//! comparison string `Email: … | Phone: … | Move date: …`.
//!
//! Phone and move date are list-aware:
//! - phone: a single value or a list, joined with ", "
//! - move date: exactly one distinct value, otherwise N/A

use std::fmt;

use serde_json::{Map, Value};
use tracing::warn;

/// Sentinel for a field the model did not supply (or supplied ambiguously).
pub const NOT_AVAILABLE: &str = "N/A";
/// Marker emitted in place of the attribute string when the reply is not a JSON object.
pub const INVALID_FORMAT: &str = "Invalid format";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAttributes {
    pub email: String,
    pub phone: String,
    pub move_date: String,
}

impl fmt::Display for NormalizedAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Email: {} | Phone: {} | Move date: {}",
            self.email, self.phone, self.move_date
        )
    }
}

/// Parses the reply as a JSON object and normalizes its three fields.
pub fn parse_attributes(raw: &str) -> Result<NormalizedAttributes, serde_json::Error> {
    let object: Map<String, Value> = serde_json::from_str(raw)?;

    Ok(NormalizedAttributes {
        email: normalize_email(object.get("email")),
        phone: normalize_phone(object.get("phone")),
        move_date: normalize_move_date(object.get("move_date")),
    })
}

/// Renders the reply as the canonical attribute string, or `INVALID_FORMAT`.
pub fn normalize_response(raw: &str) -> String {
    match parse_attributes(raw) {
        Ok(attributes) => attributes.to_string(),
        Err(e) => {
            warn!("Model response is not a JSON object ({e}): {raw:?}");
            INVALID_FORMAT.to_string()
        }
    }
}

fn normalize_email(value: Option<&Value>) -> String {
    value
        .and_then(scalar_text)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn normalize_phone(value: Option<&Value>) -> String {
    let numbers: Vec<String> = match value {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
        Some(other) => scalar_text(other).into_iter().collect(),
        None => Vec::new(),
    };

    if numbers.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        numbers.join(", ")
    }
}

fn normalize_move_date(value: Option<&Value>) -> String {
    match value {
        Some(Value::Array(items)) => {
            single_distinct(items.iter().filter_map(scalar_text))
        }
        Some(Value::String(text)) if text.contains(',') => {
            single_distinct(text.split(',').map(|part| part.trim().to_string()))
        }
        Some(other) => scalar_text(other).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// The sole distinct value, or N/A when there are none or several.
fn single_distinct(values: impl Iterator<Item = String>) -> String {
    let mut distinct: Vec<String> = Vec::new();
    for value in values {
        if !distinct.contains(&value) {
            distinct.push(value);
        }
    }

    match distinct.len() {
        1 => distinct.remove(0),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Text form of a JSON value; `null` counts as absent.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
