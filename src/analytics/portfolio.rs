//! Portfolio composition: best and worst trades, capital concentration and
//! what was held on a given day.

use std::cmp::Ordering;

use rust_decimal::Decimal;

use crate::models::decimal::checked_sum;
use crate::models::{Position, Simulation, Snapshot};

/// Top winning and losing closed trades.
#[derive(Debug, Clone)]
pub struct Composition<'a> {
    pub winners: Vec<&'a Position>,
    /// Only trades with a negative (or unknown) return
    pub losers: Vec<&'a Position>,
}

impl Composition<'_> {
    /// False for an all-profitable portfolio, which shows a "no losing
    /// trades" state instead of an empty table.
    pub fn has_losers(&self) -> bool {
        !self.losers.is_empty()
    }
}

/// One open position's weight in total equity.
#[derive(Debug, Clone, PartialEq)]
pub struct Concentration {
    pub symbol: String,
    pub sector: String,
    pub cost_basis: Decimal,
    /// Cost basis over total equity (0-100)
    pub pct_of_equity: Decimal,
}

/// Compare by `return_pct`; missing returns sort last in either direction.
fn by_return(a: &Position, b: &Position, descending: bool) -> Ordering {
    match (a.return_pct, b.return_pct) {
        (Some(x), Some(y)) if descending => y.cmp(&x),
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Best and worst `preview` closed trades by return.
pub fn portfolio_composition(positions: &[Position], preview: usize) -> Composition<'_> {
    let closed: Vec<&Position> = positions.iter().filter(|p| p.is_closed()).collect();

    let mut winners = closed.clone();
    winners.sort_by(|a, b| by_return(a, b, true));
    winners.truncate(preview);

    let mut losers = closed;
    losers.sort_by(|a, b| by_return(a, b, false));
    losers.truncate(preview);
    losers.retain(|p| p.return_pct.map_or(true, |r| r < Decimal::ZERO));

    Composition { winners, losers }
}

/// Rough unrealized P&L of a running simulation.
///
/// Snapshot position value minus the cost basis of open positions. This is
/// not reconciled against live prices and must be labelled as an estimate.
/// `None` for finished simulations or when no snapshot value is available.
pub fn unrealized_estimate(
    simulation: &Simulation,
    snapshot: Option<&Snapshot>,
    positions: &[Position],
) -> Option<Decimal> {
    if simulation.is_terminal() {
        return None;
    }

    let positions_value = snapshot?.positions_value?;
    let open_cost = checked_sum(
        positions
            .iter()
            .filter(|p| p.is_open())
            .filter_map(Position::cost_basis),
    )?;

    positions_value.checked_sub(open_cost)
}

/// Open positions as a share of total equity, heaviest first.
pub fn position_concentration(
    positions: &[Position],
    snapshot: Option<&Snapshot>,
) -> Vec<Concentration> {
    let Some(equity) = snapshot
        .and_then(|s| s.total_equity)
        .filter(|e| *e > Decimal::ZERO)
    else {
        return Vec::new();
    };

    let mut rows: Vec<Concentration> = positions
        .iter()
        .filter(|p| p.is_open())
        .filter_map(|p| {
            let cost = p.cost_basis()?;
            Some(Concentration {
                symbol: p.symbol.clone(),
                sector: p.sector_label().to_string(),
                cost_basis: cost,
                pct_of_equity: cost.checked_div(equity)?.checked_mul(Decimal::ONE_HUNDRED)?,
            })
        })
        .collect();

    rows.sort_by(|a, b| b.pct_of_equity.cmp(&a.pct_of_equity));
    rows
}

/// Positions held at the close of the snapshot's day.
pub fn positions_for_snapshot<'a>(
    positions: &'a [Position],
    snapshot: Option<&Snapshot>,
) -> Vec<&'a Position> {
    let Some(snapshot) = snapshot else {
        return Vec::new();
    };

    positions
        .iter()
        .filter(|p| p.held_on(snapshot.snapshot_date))
        .collect()
}
