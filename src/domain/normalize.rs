//! Payload normalization.
//!
//! Form-encoded and JSON submissions arrive as a flat map of values where
//! numbers and booleans may be strings. `PropertyDraft::from_fields` turns
//! either shape into one typed draft, collecting every unparsable field.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use super::property::{Amenity, PropertyDraft};
use crate::errors::{AppError, AppResult, FieldError};

/// `true` or `"true"`; everything else is false.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s == "true",
        _ => false,
    }
}

/// A list of strings given as an array, a JSON-encoded array, or
/// comma-separated text. Entries are trimmed and blanks dropped.
pub fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(decoded @ Value::Array(_)) => string_list(&decoded),
            _ => text
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        },
        Value::Null => Vec::new(),
        other => vec![other.to_string()],
    }
}

/// Parse state for one payload; accumulates field errors.
struct FieldReader<'a> {
    fields: &'a Map<String, Value>,
    errors: Vec<FieldError>,
}

impl<'a> FieldReader<'a> {
    fn new(fields: &'a Map<String, Value>) -> Self {
        Self {
            fields,
            errors: Vec::new(),
        }
    }

    /// The raw value, with null and blank strings treated as absent.
    fn raw(&self, key: &str) -> Option<&'a Value> {
        match self.fields.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(v) => Some(v),
        }
    }

    fn text(&self, key: &str) -> Option<String> {
        self.raw(key).map(|v| match v {
            Value::String(s) => s.trim().to_string(),
            other => other.to_string(),
        })
    }

    fn int(&mut self, key: &str) -> Option<i32> {
        let value = self.raw(key)?;
        let parsed = match value {
            Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
            Value::String(s) => s.trim().parse::<i32>().ok(),
            _ => None,
        };
        if parsed.is_none() {
            self.errors
                .push(FieldError::new(key, format!("{} must be a whole number", key)));
        }
        parsed
    }

    fn decimal(&mut self, key: &str) -> Option<Decimal> {
        let value = self.raw(key)?;
        let parsed = match value {
            Value::Number(n) => Decimal::from_str(&n.to_string())
                .or_else(|_| Decimal::from_scientific(&n.to_string()))
                .ok(),
            Value::String(s) => Decimal::from_str(s.trim()).ok(),
            _ => None,
        };
        if parsed.is_none() {
            self.errors
                .push(FieldError::new(key, format!("{} must be a number", key)));
        }
        parsed
    }

    fn flag(&self, key: &str) -> Option<bool> {
        self.fields.get(key).filter(|v| !v.is_null()).map(truthy)
    }

    fn list(&self, key: &str) -> Option<Vec<String>> {
        self.fields.get(key).filter(|v| !v.is_null()).map(string_list)
    }

    fn choice<T: FromStr + std::fmt::Display>(&mut self, key: &str, all: &[T]) -> Option<T> {
        let text = self.text(key)?;
        match text.parse::<T>() {
            Ok(v) => Some(v),
            Err(_) => {
                let allowed: Vec<String> = all.iter().map(|v| v.to_string()).collect();
                self.errors.push(FieldError::new(
                    key,
                    format!("{} must be one of: {}", key, allowed.join(", ")),
                ));
                None
            }
        }
    }
}

impl PropertyDraft {
    /// Build a draft from a flat field map. Unknown keys are ignored, so
    /// ownership and counters cannot be set from a payload.
    pub fn from_fields(fields: &Map<String, Value>) -> AppResult<Self> {
        use super::property::{Facing, Furnishing, ListingStatus, ListingType, PropertyCategory};

        let mut r = FieldReader::new(fields);
        let draft = PropertyDraft {
            title: r.text("title"),
            description: r.text("description"),
            kind: r.choice("type", ListingType::ALL),
            property_type: r.choice("propertyType", PropertyCategory::ALL),
            price: r.decimal("price"),
            location: r.text("location"),
            address: r.text("address"),
            city: r.text("city"),
            state: r.text("state"),
            zip_code: r.text("zipCode"),
            bedrooms: r.int("bedrooms"),
            bathrooms: r.int("bathrooms"),
            kitchens: r.int("kitchens"),
            area: r.decimal("area"),
            built_year: r.int("builtYear"),
            floor: r.int("floor"),
            total_floors: r.int("totalFloors"),
            facing: r.choice("facing", Facing::ALL),
            parking: r.int("parking"),
            balcony: r.int("balcony"),
            amenities: Amenity::ALL
                .iter()
                .filter_map(|a| r.flag(a.as_str()).map(|v| (*a, v)))
                .collect(),
            furnished: r.choice("furnished", Furnishing::ALL),
            features: r.list("features"),
            images: r.list("images"),
            contact: r.text("contact"),
            owner: r.text("owner"),
            status: r.choice("status", ListingStatus::ALL),
            is_approved: r.flag("isApproved"),
            is_featured: r.flag("isFeatured"),
            latitude: r.decimal("latitude"),
            longitude: r.decimal("longitude"),
        };

        if r.errors.is_empty() {
            Ok(draft)
        } else {
            let mut errors = r.errors;
            errors.sort_by(|a, b| a.field.cmp(&b.field));
            Err(AppError::InvalidFields(errors))
        }
    }
}
