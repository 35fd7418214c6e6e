//! Market data series: price candles, indicator rows and benchmark returns.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::decimal::{lenient, parse_decimal};

/// Daily OHLCV bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub date: NaiveDate,

    #[serde(default, deserialize_with = "lenient")]
    pub open: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient")]
    pub high: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient")]
    pub low: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient")]
    pub close: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient")]
    pub volume: Option<Decimal>,
}

impl Candle {
    /// Close-over-open change in percent.
    pub fn change_pct(&self) -> Option<Decimal> {
        let open = self.open?;
        if open.is_zero() {
            return None;
        }
        self.close?
            .checked_sub(open)?
            .checked_div(open)?
            .checked_mul(Decimal::ONE_HUNDRED)
    }
}

/// One row of indicator values keyed by indicator name (e.g. "ma_20").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorPoint {
    pub date: NaiveDate,

    #[serde(flatten)]
    pub values: BTreeMap<String, Value>,
}

impl IndicatorPoint {
    /// Numeric value of an indicator, if present and parsable.
    pub fn value(&self, name: &str) -> Option<Decimal> {
        match self.values.get(name)? {
            Value::String(s) => parse_decimal(s),
            Value::Number(n) => parse_decimal(&n.to_string()),
            _ => None,
        }
    }
}

/// Benchmark index close and cumulative return since the simulation start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkPoint {
    pub date: NaiveDate,

    #[serde(default, deserialize_with = "lenient")]
    pub close: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient")]
    pub cumulative_return_pct: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_candle_change_pct() {
        let candle: Candle = serde_json::from_str(
            r#"{"date": "2024-05-01", "open": "100", "high": "105", "low": "99", "close": "102.5", "volume": "1200000"}"#,
        )
        .unwrap();

        assert_eq!(candle.change_pct(), Some(dec!(2.5)));
    }

    #[test]
    fn test_indicator_lookup() {
        let point: IndicatorPoint = serde_json::from_str(
            r#"{"date": "2024-05-01", "ma_20": "101.25", "rsi_14": 61.5, "signal": "up"}"#,
        )
        .unwrap();

        assert_eq!(point.value("ma_20"), Some(dec!(101.25)));
        assert_eq!(point.value("rsi_14"), Some(dec!(61.5)));
        assert_eq!(point.value("signal"), None);
        assert_eq!(point.value("missing"), None);
    }
}
