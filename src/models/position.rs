//! Position model representing one simulated trade.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::decimal::lenient;

/// Sector label used when the backend has no sector for a symbol.
pub const UNKNOWN_SECTOR: &str = "Unknown";

/// One simulated buy-to-sell (or still open) trade.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub id: i64,

    pub symbol: String,

    #[serde(default)]
    pub sector: Option<String>,

    #[serde(default)]
    pub entry_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "lenient")]
    pub entry_price: Option<Decimal>,

    #[serde(default)]
    pub exit_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "lenient")]
    pub exit_price: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient")]
    pub shares: Option<Decimal>,

    /// Why the position was closed (e.g. "trailing_stop", "end_of_simulation")
    #[serde(default)]
    pub exit_reason: Option<String>,

    /// Realized P&L; `None` while the position is open
    #[serde(default, deserialize_with = "lenient")]
    pub realized_pnl: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient")]
    pub return_pct: Option<Decimal>,
}

impl Position {
    /// Open and closed are decided by `realized_pnl` alone.
    pub fn is_open(&self) -> bool {
        self.realized_pnl.is_none()
    }

    pub fn is_closed(&self) -> bool {
        !self.is_open()
    }

    /// Capital committed: entry price times shares.
    pub fn cost_basis(&self) -> Option<Decimal> {
        self.entry_price?.checked_mul(self.shares?)
    }

    /// Sector name, or [`UNKNOWN_SECTOR`].
    pub fn sector_label(&self) -> &str {
        self.sector.as_deref().unwrap_or(UNKNOWN_SECTOR)
    }

    pub fn is_winner(&self) -> bool {
        self.realized_pnl.is_some_and(|pnl| pnl > Decimal::ZERO)
    }

    /// Whether the position was held at the end of `date`.
    ///
    /// A position exited on `date` is not held: snapshots capture
    /// post-settlement state.
    pub fn held_on(&self, date: NaiveDate) -> bool {
        let Some(entry) = self.entry_date else {
            return false;
        };
        entry <= date && self.exit_date.map_or(true, |exit| exit > date)
    }
}
