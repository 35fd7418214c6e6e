//! Simulation model: one Arena backtest run and its summary metrics.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::decimal::lenient;
use super::JobStatus;

/// A trading-strategy backtest run.
///
/// Metric fields stay `None` until the run completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulation {
    pub id: i64,

    #[serde(default)]
    pub name: Option<String>,

    /// Simulations sharing a group id are compared side by side
    #[serde(default)]
    pub group_id: Option<String>,

    pub status: JobStatus,

    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    #[serde(default)]
    pub symbols: Vec<String>,

    // === Capital parameters ===
    #[serde(default, deserialize_with = "lenient")]
    pub initial_capital: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient")]
    pub position_size: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient")]
    pub trailing_stop_pct: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient")]
    pub min_buy_score: Option<Decimal>,

    // === Performance metrics ===
    #[serde(default, deserialize_with = "lenient")]
    pub total_return_pct: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient")]
    pub max_drawdown_pct: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient")]
    pub sharpe_ratio: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient")]
    pub profit_factor: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient")]
    pub avg_hold_days: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient")]
    pub avg_win_pnl: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient")]
    pub avg_loss_pnl: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient")]
    pub total_realized_pnl: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient")]
    pub final_equity: Option<Decimal>,

    // === Counters ===
    #[serde(default)]
    pub total_trades: u32,

    #[serde(default)]
    pub winning_trades: u32,

    #[serde(default)]
    pub current_day: u32,

    #[serde(default)]
    pub total_days: u32,

    #[serde(default)]
    pub error_message: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Simulation {
    /// Win rate in percent, `None` when no trades closed.
    pub fn win_rate(&self) -> Option<Decimal> {
        if self.total_trades == 0 {
            return None;
        }
        Some(Decimal::from(self.winning_trades) / Decimal::from(self.total_trades) * Decimal::ONE_HUNDRED)
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Progress through the simulated date range (0-100).
    pub fn progress_pct(&self) -> Option<f64> {
        if self.total_days == 0 {
            return None;
        }
        Some((self.current_day as f64 / self.total_days as f64 * 100.0).min(100.0))
    }

    /// Name for display, falling back to the id.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("Simulation #{}", self.id),
        }
    }
}
