//! Live20 run summaries.

use std::cmp::Ordering;

use crate::models::{Direction, Live20Result};

/// Direction counts and actionable setups of one run.
#[derive(Debug, Clone)]
pub struct Live20Summary<'a> {
    pub long: usize,
    pub short: usize,
    pub no_setup: usize,
    /// LONG and SHORT results, most confident first
    pub setups: Vec<&'a Live20Result>,
}

pub fn summarize_live20(results: &[Live20Result]) -> Live20Summary<'_> {
    let count = |d: Direction| results.iter().filter(|r| r.direction == d).count();

    let mut setups: Vec<&Live20Result> = results
        .iter()
        .filter(|r| r.direction != Direction::NoSetup)
        .collect();

    setups.sort_by(|a, b| match (a.confidence_score, b.confidence_score) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    Live20Summary {
        long: count(Direction::Long),
        short: count(Direction::Short),
        no_setup: count(Direction::NoSetup),
        setups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn result(symbol: &str, direction: Direction, score: Option<Decimal>) -> Live20Result {
        Live20Result {
            symbol: symbol.to_string(),
            direction,
            confidence_score: score,
            trend: None,
            ma20_distance_pct: None,
            volume_signal: None,
        }
    }

    #[test]
    fn test_summary_counts_and_order() {
        let results = vec![
            result("AAPL", Direction::Long, Some(dec!(60))),
            result("XOM", Direction::NoSetup, Some(dec!(99))),
            result("TSLA", Direction::Short, Some(dec!(85))),
            result("AMD", Direction::Long, None),
            result("NVDA", Direction::Long, Some(dec!(72))),
        ];

        let summary = summarize_live20(&results);
        assert_eq!(summary.long, 3);
        assert_eq!(summary.short, 1);
        assert_eq!(summary.no_setup, 1);

        let order: Vec<&str> = summary.setups.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(order, vec!["TSLA", "NVDA", "AAPL", "AMD"]);
    }
}
