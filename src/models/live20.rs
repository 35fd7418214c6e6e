//! Live20 rule-based signal analysis runs and their per-symbol results.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::decimal::lenient;
use super::JobStatus;

/// Setup direction detected for a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Long,
    Short,
    NoSetup,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "LONG",
            Direction::Short => "SHORT",
            Direction::NoSetup => "NO_SETUP",
        }
    }
}

/// One Live20 analysis run over a list of symbols.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Live20Run {
    pub id: i64,

    pub status: JobStatus,

    #[serde(default)]
    pub symbol_count: u32,

    #[serde(default)]
    pub processed_count: u32,

    #[serde(default)]
    pub long_count: u32,

    #[serde(default)]
    pub short_count: u32,

    #[serde(default)]
    pub no_setup_count: u32,

    #[serde(default)]
    pub error_message: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Live20Run {
    pub fn progress_pct(&self) -> Option<f64> {
        if self.symbol_count == 0 {
            return None;
        }
        Some((self.processed_count as f64 / self.symbol_count as f64 * 100.0).min(100.0))
    }
}

/// Signal analysis for one symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Live20Result {
    pub symbol: String,

    pub direction: Direction,

    /// Confidence score (0-100)
    #[serde(default, deserialize_with = "lenient")]
    pub confidence_score: Option<Decimal>,

    #[serde(default)]
    pub trend: Option<String>,

    #[serde(default)]
    pub ma20_distance_pct: Option<String>,

    #[serde(default)]
    pub volume_signal: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decode_result_directions() {
        let json = r#"[
            {"symbol": "AAPL", "direction": "LONG", "confidence_score": "78"},
            {"symbol": "XOM", "direction": "NO_SETUP"}
        ]"#;

        let results: Vec<Live20Result> = serde_json::from_str(json).unwrap();
        assert_eq!(results[0].direction, Direction::Long);
        assert_eq!(results[0].confidence_score, Some(dec!(78)));
        assert_eq!(results[1].direction, Direction::NoSetup);
        assert_eq!(results[1].confidence_score, None);
    }
}
