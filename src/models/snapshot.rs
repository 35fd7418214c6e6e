//! End-of-day portfolio snapshot for one simulated trading day.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::decimal::lenient;

/// Per-symbol decision the strategy made on a given day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Decision {
    pub action: String,

    #[serde(default, deserialize_with = "lenient")]
    pub score: Option<Decimal>,

    #[serde(default)]
    pub reasoning: Option<String>,
}

/// Portfolio state at the close of one simulated day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub snapshot_date: NaiveDate,

    #[serde(default)]
    pub day_number: u32,

    #[serde(default, deserialize_with = "lenient")]
    pub cash: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient")]
    pub positions_value: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient")]
    pub total_equity: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient")]
    pub daily_pnl: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient")]
    pub daily_return_pct: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient")]
    pub cumulative_return_pct: Option<Decimal>,

    #[serde(default)]
    pub decisions: HashMap<String, Decision>,
}

impl Snapshot {
    /// Number of symbols per action, e.g. `{"BUY": 2, "HOLD": 5}`.
    pub fn action_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for decision in self.decisions.values() {
            *counts.entry(decision.action.to_uppercase()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decode_snapshot_with_decisions() {
        let json = r#"{
            "snapshot_date": "2024-02-15",
            "day_number": 31,
            "cash": "4200.00",
            "positions_value": "6100.50",
            "total_equity": "10300.50",
            "daily_pnl": "-12.25",
            "decisions": {
                "AAPL": {"action": "buy", "score": 82, "reasoning": "trend up"},
                "MSFT": {"action": "hold", "score": "55"},
                "TSLA": {"action": "BUY", "score": null}
            }
        }"#;

        let snap: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.total_equity, Some(dec!(10300.50)));
        assert_eq!(snap.daily_pnl, Some(dec!(-12.25)));
        assert_eq!(snap.cumulative_return_pct, None);
        assert_eq!(snap.decisions["MSFT"].score, Some(dec!(55)));

        let counts = snap.action_counts();
        assert_eq!(counts.get("BUY"), Some(&2));
        assert_eq!(counts.get("HOLD"), Some(&1));
    }
}
