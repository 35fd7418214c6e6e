//! Request and response shapes of the analytics backend.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Live20Result, Live20Run, Position, Simulation, Snapshot};

/// One page of a paginated list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub has_more: bool,
}

/// Response of `GET /simulations/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationDetail {
    pub simulation: Simulation,
    #[serde(default)]
    pub positions: Vec<Position>,
    /// Ordered by day, one per simulated trading day
    #[serde(default)]
    pub snapshots: Vec<Snapshot>,
}

impl SimulationDetail {
    pub fn latest_snapshot(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }
}

/// Response of `GET /live-20/runs/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Live20RunDetail {
    pub run: Live20Run,
    #[serde(default)]
    pub results: Vec<Live20Result>,
}

/// Body of `POST /simulations`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateSimulationRequest {
    pub symbols: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_capital: Decimal,
    pub position_size: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailing_stop_pct: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_buy_score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

impl CreateSimulationRequest {
    /// Reject requests the backend would refuse anyway.
    pub fn validate(&self) -> Result<(), String> {
        if self.symbols.is_empty() {
            return Err("at least one symbol is required".to_string());
        }
        if self.start_date >= self.end_date {
            return Err("start date must be before end date".to_string());
        }
        if self.initial_capital <= Decimal::ZERO {
            return Err("initial capital must be positive".to_string());
        }
        if self.position_size <= Decimal::ZERO || self.position_size > self.initial_capital {
            return Err("position size must be positive and within initial capital".to_string());
        }
        if let Some(stop) = self.trailing_stop_pct {
            if stop <= Decimal::ZERO || stop >= Decimal::ONE_HUNDRED {
                return Err("trailing stop must be between 0 and 100 percent".to_string());
            }
        }
        if let Some(score) = self.min_buy_score {
            if score > 100 {
                return Err("minimum buy score must be 0-100".to_string());
            }
        }
        Ok(())
    }
}

/// Benchmark index a simulation can be compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchmarkSymbol {
    Spy,
    Qqq,
}

impl BenchmarkSymbol {
    pub fn as_str(&self) -> &'static str {
        match self {
            BenchmarkSymbol::Spy => "SPY",
            BenchmarkSymbol::Qqq => "QQQ",
        }
    }
}

impl fmt::Display for BenchmarkSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BenchmarkSymbol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SPY" => Ok(BenchmarkSymbol::Spy),
            "QQQ" => Ok(BenchmarkSymbol::Qqq),
            other => Err(format!("unsupported benchmark '{}' (expected SPY or QQQ)", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request() -> CreateSimulationRequest {
        CreateSimulationRequest {
            symbols: vec!["AAPL".to_string(), "MSFT".to_string()],
            start_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
            initial_capital: dec!(10000),
            position_size: dec!(1000),
            trailing_stop_pct: Some(dec!(5)),
            min_buy_score: Some(60),
            name: None,
            group_id: None,
        }
    }

    #[test]
    fn test_create_request_serializes_decimals_as_strings() {
        let json = serde_json::to_value(request()).unwrap();

        assert_eq!(json["initial_capital"], "10000");
        assert_eq!(json["trailing_stop_pct"], "5");
        assert_eq!(json["start_date"], "2024-01-02");
        assert!(json.get("name").is_none());
    }

    #[test]
    fn test_create_request_validation() {
        assert!(request().validate().is_ok());

        let mut bad = request();
        bad.symbols.clear();
        assert!(bad.validate().is_err());

        let mut bad = request();
        bad.end_date = bad.start_date;
        assert!(bad.validate().is_err());

        let mut bad = request();
        bad.position_size = dec!(20000);
        assert!(bad.validate().is_err());

        let mut bad = request();
        bad.min_buy_score = Some(150);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_decode_detail_and_page() {
        let json = r#"{
            "simulation": {"id": 3, "status": "completed", "start_date": "2024-01-02", "end_date": "2024-02-01",
                           "total_return_pct": "4.20", "total_trades": 2, "winning_trades": 1},
            "positions": [{"symbol": "AAPL", "sector": "Technology", "entry_date": "2024-01-03",
                           "entry_price": "185.20", "shares": "5", "realized_pnl": "12.5"}],
            "snapshots": [{"snapshot_date": "2024-01-02", "total_equity": "10000"},
                          {"snapshot_date": "2024-01-03", "total_equity": "10012.5"}]
        }"#;

        let detail: SimulationDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.simulation.total_return_pct, Some(dec!(4.20)));
        assert_eq!(detail.positions[0].realized_pnl, Some(dec!(12.5)));
        assert_eq!(detail.latest_snapshot().unwrap().total_equity, Some(dec!(10012.5)));

        let page: Page<Simulation> =
            serde_json::from_str(r#"{"items": [], "total": 0, "has_more": false}"#).unwrap();
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_parse_benchmark_symbol() {
        assert_eq!("spy".parse::<BenchmarkSymbol>(), Ok(BenchmarkSymbol::Spy));
        assert_eq!("QQQ".parse::<BenchmarkSymbol>(), Ok(BenchmarkSymbol::Qqq));
        assert!("DIA".parse::<BenchmarkSymbol>().is_err());
    }
}
