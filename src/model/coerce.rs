//! Field-level coercion from raw JSON values.
//!
//! Sources return heterogeneous value types for the same logical field
//! (numbers as strings, lists as scalars, dates in two formats). These
//! helpers normalize them; anything unparsable becomes absent rather than
//! an error, so one malformed provider value never sinks a record.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

pub(crate) fn optional_i64(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// Convert to float; NaN and infinities are rejected as absent data.
pub(crate) fn optional_f64(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

pub(crate) fn optional_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Coerce to string; null becomes empty for required fields.
pub(crate) fn required_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

pub(crate) fn optional_bool(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Bool(b) => Some(*b),
        _ => None,
    }
}

/// Always a list: null/missing -> empty, scalar -> single element.
pub(crate) fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| optional_string(Some(item)))
            .collect(),
        Some(scalar) => optional_string(Some(scalar)).into_iter().collect(),
    }
}

/// Always a list of raw values: null/missing -> empty, scalar -> wrapped.
pub(crate) fn value_list(value: Option<&Value>) -> Vec<Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(scalar) => vec![scalar.clone()],
    }
}

/// Parse dates in ISO 8601 (`2023-06-15`), Steam (`Jun 15, 2023`), or unix
/// timestamp form. Unparsable input is absent, never an error.
pub(crate) fn release_date(value: Option<&Value>) -> Option<NaiveDateTime> {
    match value? {
        Value::String(s) => {
            let s = s.trim();
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .or_else(|_| NaiveDate::parse_from_str(s, "%b %d, %Y"))
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        }
        Value::Number(n) => {
            let secs = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integers_coerce_from_numbers_strings_and_bools() {
        assert_eq!(optional_i64(Some(&json!(42))), Some(42));
        assert_eq!(optional_i64(Some(&json!(12.9))), Some(12));
        assert_eq!(optional_i64(Some(&json!("1234"))), Some(1234));
        assert_eq!(optional_i64(Some(&json!("12.5"))), None);
        assert_eq!(optional_i64(Some(&json!(true))), Some(1));
        assert_eq!(optional_i64(Some(&json!(null))), None);
        assert_eq!(optional_i64(Some(&json!([1]))), None);
        assert_eq!(optional_i64(None), None);
    }

    #[test]
    fn floats_reject_non_finite() {
        assert_eq!(optional_f64(Some(&json!(12.34))), Some(12.34));
        assert_eq!(optional_f64(Some(&json!("12.34"))), Some(12.34));
        assert_eq!(optional_f64(Some(&json!("inf"))), None);
        assert_eq!(optional_f64(Some(&json!("NaN"))), None);
        assert_eq!(optional_f64(Some(&json!("not a number"))), None);
    }

    #[test]
    fn lists_default_and_wrap() {
        assert_eq!(string_list(None), Vec::<String>::new());
        assert_eq!(string_list(Some(&json!(null))), Vec::<String>::new());
        assert_eq!(string_list(Some(&json!("Action"))), vec!["Action"]);
        assert_eq!(
            string_list(Some(&json!(["Action", "Indie"]))),
            vec!["Action", "Indie"]
        );
        assert_eq!(value_list(Some(&json!({"a": 1}))), vec![json!({"a": 1})]);
    }

    #[test]
    fn release_date_accepts_both_formats_and_timestamps() {
        let iso = release_date(Some(&json!("2023-06-15"))).unwrap();
        assert_eq!(iso.format("%Y-%m-%d").to_string(), "2023-06-15");

        let steam = release_date(Some(&json!("Jun 15, 2023"))).unwrap();
        assert_eq!(steam, iso);

        let stamped = release_date(Some(&json!(0))).unwrap();
        assert_eq!(stamped.format("%Y-%m-%d").to_string(), "1970-01-01");

        assert_eq!(release_date(Some(&json!("next year"))), None);
        assert_eq!(release_date(Some(&json!(null))), None);
    }

    #[test]
    fn required_string_folds_null_to_empty() {
        assert_eq!(required_string(&json!(null)), "");
        assert_eq!(required_string(&json!(12345)), "12345");
        assert_eq!(required_string(&json!("12345")), "12345");
    }

    #[test]
    fn bools_only_from_bools() {
        assert_eq!(optional_bool(Some(&json!(true))), Some(true));
        assert_eq!(optional_bool(Some(&json!("true"))), None);
        assert_eq!(optional_bool(Some(&json!(1))), None);
    }
}
