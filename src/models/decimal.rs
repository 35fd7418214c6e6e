//! Lenient decoding for decimal fields.
//!
//! The backend sends every money or percentage value as a decimal string
//! (`"1234.56"`) and uses `null` for values that are not computed yet. A
//! malformed value must never fail the whole payload, so anything that does
//! not parse collapses to `None`.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// Parse a decimal string, returning `None` for empty or malformed input.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Sum that yields `None` instead of panicking on overflow.
pub fn checked_sum<I>(values: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
}

/// Serde adapter for `Option<Decimal>` fields.
///
/// Use together with `#[serde(default)]` so a missing field is also `None`.
pub fn lenient<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;

    let parsed = match raw {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => {
            let value = parse_decimal(&s);
            if value.is_none() && !s.trim().is_empty() {
                warn!(raw = %s, "Unparsable decimal field, treating as null");
            }
            value
        }
        Some(Value::Number(n)) => parse_decimal(&n.to_string()),
        Some(other) => {
            warn!(raw = %other, "Unexpected decimal field type, treating as null");
            None
        }
    };

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "lenient")]
        value: Option<Decimal>,
    }

    fn probe(json: &str) -> Option<Decimal> {
        serde_json::from_str::<Probe>(json).unwrap().value
    }

    #[test]
    fn test_parses_strings_and_numbers() {
        assert_eq!(probe(r#"{"value": "12.50"}"#), Some(dec!(12.50)));
        assert_eq!(probe(r#"{"value": -3.25}"#), Some(dec!(-3.25)));
        assert_eq!(probe(r#"{"value": "1e3"}"#), Some(dec!(1000)));
    }

    #[test]
    fn test_checked_sum_overflow() {
        assert_eq!(checked_sum([dec!(1.5), dec!(2)]), Some(dec!(3.5)));
        assert_eq!(checked_sum(Vec::new()), Some(Decimal::ZERO));
        assert_eq!(checked_sum([Decimal::MAX, Decimal::ONE]), None);
    }

    #[test]
    fn test_null_missing_and_garbage_become_none() {
        assert_eq!(probe(r#"{"value": null}"#), None);
        assert_eq!(probe(r#"{}"#), None);
        assert_eq!(probe(r#"{"value": "N/A"}"#), None);
        assert_eq!(probe(r#"{"value": ""}"#), None);
        assert_eq!(probe(r#"{"value": true}"#), None);
    }
}
