//! Calendar-month buckets for daily P&L and trade entries.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{Position, Snapshot};

/// Realized and unrealized P&L summed over one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyPnl {
    /// `YYYY-MM`
    pub month: String,
    pub pnl: Decimal,
    pub trading_days: usize,
}

/// Number of trades entered in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyTradeCount {
    /// `YYYY-MM`
    pub month: String,
    pub trades: usize,
}

/// Zero-padded `YYYY-MM` key; sorts chronologically as a string.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Sum of `daily_pnl` per month in chronological order.
///
/// Returns `None` with fewer than `min_snapshots` snapshots, which stands in
/// for "not a full trading month yet".
pub fn monthly_pnl(snapshots: &[Snapshot], min_snapshots: usize) -> Option<Vec<MonthlyPnl>> {
    if snapshots.len() < min_snapshots {
        return None;
    }

    let mut buckets: BTreeMap<String, (Decimal, usize)> = BTreeMap::new();
    for snapshot in snapshots {
        let bucket = buckets
            .entry(month_key(snapshot.snapshot_date))
            .or_insert((Decimal::ZERO, 0));
        let pnl = snapshot.daily_pnl.unwrap_or(Decimal::ZERO);
        bucket.0 = bucket.0.checked_add(pnl).unwrap_or(bucket.0);
        bucket.1 += 1;
    }

    Some(
        buckets
            .into_iter()
            .map(|(month, (pnl, trading_days))| MonthlyPnl {
                month,
                pnl,
                trading_days,
            })
            .collect(),
    )
}

/// Closed trades per entry month in chronological order.
pub fn monthly_trade_frequency(positions: &[Position]) -> Vec<MonthlyTradeCount> {
    let mut buckets: BTreeMap<String, usize> = BTreeMap::new();

    for position in positions.iter().filter(|p| p.is_closed()) {
        let Some(entry) = position.entry_date else {
            continue;
        };
        *buckets.entry(month_key(entry)).or_insert(0) += 1;
    }

    buckets
        .into_iter()
        .map(|(month, trades)| MonthlyTradeCount { month, trades })
        .collect()
}
