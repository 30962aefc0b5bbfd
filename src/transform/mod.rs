//! Mapping between store records (snake_case JSON rows) and the in-memory
//! entities. Reading never fails: missing or oddly typed fields fall back to
//! empty strings or documented defaults.

pub mod candidate;
pub mod placement;
pub mod settings;
pub mod vacancy;

use rust_decimal::Decimal;
use serde_json::{Map, Value as JsonValue};
use std::str::FromStr;

/// First non-empty string among `keys`; numbers are rendered as text.
pub(crate) fn text(record: &JsonValue, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|k| record.get(*k))
        .find_map(|v| match v {
            JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
            JsonValue::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_default()
}

/// Text columns that may hold a list or object in older rows are serialized
/// to JSON text; strings pass through untouched.
pub(crate) fn coerce_text(value: Option<&JsonValue>) -> String {
    match value {
        None | Some(JsonValue::Null) => String::new(),
        Some(JsonValue::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

pub(crate) fn decimal(value: Option<&JsonValue>) -> Option<Decimal> {
    match value? {
        JsonValue::Number(n) => {
            let repr = n.to_string();
            Decimal::from_str(&repr)
                .or_else(|_| Decimal::from_scientific(&repr))
                .ok()
        }
        JsonValue::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

/// Money and percentages are written as decimal text so no digit goes through `f64`.
pub(crate) fn decimal_to_json(value: Decimal) -> JsonValue {
    JsonValue::String(value.normalize().to_string())
}

/// Builds a record from optional columns, leaving out the ones not set.
#[derive(Default)]
pub(crate) struct RecordBuilder {
    fields: Map<String, JsonValue>,
}

impl RecordBuilder {
    pub(crate) fn set(mut self, column: &str, value: impl Into<JsonValue>) -> Self {
        self.fields.insert(column.to_string(), value.into());
        self
    }

    pub(crate) fn maybe<T: Into<JsonValue>>(self, column: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    pub(crate) fn build(self) -> JsonValue {
        JsonValue::Object(self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_uses_first_non_empty_alias() {
        let record = json!({"phone_number": "", "phone": "061-123"});
        assert_eq!(text(&record, &["phone_number", "phone"]), "061-123");
        assert_eq!(text(&json!({}), &["phone_number", "phone"]), "");
    }

    #[test]
    fn coerce_text_serializes_lists() {
        assert_eq!(coerce_text(Some(&json!("Go, Rust"))), "Go, Rust");
        assert_eq!(coerce_text(Some(&json!(["Go", "Rust"]))), r#"["Go","Rust"]"#);
        assert_eq!(coerce_text(None), "");
        assert_eq!(coerce_text(Some(&JsonValue::Null)), "");
    }

    #[test]
    fn decimals_accept_numbers_and_strings() {
        assert_eq!(decimal(Some(&json!(25000.5))), Some(Decimal::new(250005, 1)));
        assert_eq!(decimal(Some(&json!("1200"))), Some(Decimal::new(1200, 0)));
        assert_eq!(decimal(Some(&json!(true))), None);
        assert_eq!(decimal_to_json(Decimal::new(250000, 2)), json!("2500"));
    }

    #[test]
    fn large_amounts_keep_every_digit() {
        let amount = Decimal::from_str("123456789012345678.9125").unwrap();
        let stored = decimal_to_json(amount);
        assert_eq!(stored, json!("123456789012345678.9125"));
        assert_eq!(decimal(Some(&stored)), Some(amount));
    }
}
