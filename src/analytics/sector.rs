//! Sector breakdowns: capital allocation of open positions and performance
//! of closed ones.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::models::decimal::checked_sum;
use crate::models::{Position, UNKNOWN_SECTOR};

/// Capital committed to one sector by open positions.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorAllocation {
    pub sector: String,
    pub position_count: usize,
    pub cost_basis: Decimal,
    /// Share of total open cost basis (0-100)
    pub percentage: Decimal,
}

/// Closed-trade results for one sector.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorPerformance {
    pub sector: String,
    pub trade_count: usize,
    pub winning_trades: usize,
    /// Win rate (0.0 to 1.0)
    pub win_rate: f64,
    pub total_pnl: Decimal,
}

/// Order by `by_value`, except the unknown sector always goes last.
fn unknown_last(a: &str, b: &str, by_value: Ordering) -> Ordering {
    match (a == UNKNOWN_SECTOR, b == UNKNOWN_SECTOR) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => by_value,
    }
}

/// Allocation of open positions by sector, largest first.
pub fn sector_allocation(positions: &[Position]) -> Vec<SectorAllocation> {
    let mut groups: BTreeMap<&str, (usize, Decimal)> = BTreeMap::new();

    for position in positions.iter().filter(|p| p.is_open()) {
        let entry = groups
            .entry(position.sector_label())
            .or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        if let Some(cost) = position.cost_basis() {
            entry.1 = entry.1.checked_add(cost).unwrap_or(entry.1);
        }
    }

    let total = checked_sum(groups.values().map(|(_, cost)| *cost)).unwrap_or(Decimal::ZERO);

    let mut rows: Vec<SectorAllocation> = groups
        .into_iter()
        .map(|(sector, (count, cost))| SectorAllocation {
            sector: sector.to_string(),
            position_count: count,
            cost_basis: cost,
            percentage: cost
                .checked_div(total)
                .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
                .unwrap_or(Decimal::ZERO),
        })
        .collect();

    rows.sort_by(|a, b| unknown_last(&a.sector, &b.sector, b.cost_basis.cmp(&a.cost_basis)));
    rows
}

/// Performance of closed positions by sector, most profitable first.
pub fn sector_performance(positions: &[Position]) -> Vec<SectorPerformance> {
    let mut groups: BTreeMap<&str, Vec<&Position>> = BTreeMap::new();

    for position in positions.iter().filter(|p| p.is_closed()) {
        groups.entry(position.sector_label()).or_default().push(position);
    }

    let mut rows: Vec<SectorPerformance> = groups
        .into_iter()
        .map(|(sector, trades)| {
            let winning = trades.iter().filter(|p| p.is_winner()).count();
            let total_pnl = trades
                .iter()
                .filter_map(|p| p.realized_pnl)
                .fold(Decimal::ZERO, |acc, pnl| acc.checked_add(pnl).unwrap_or(acc));

            SectorPerformance {
                sector: sector.to_string(),
                trade_count: trades.len(),
                winning_trades: winning,
                win_rate: if trades.is_empty() {
                    0.0
                } else {
                    winning as f64 / trades.len() as f64
                },
                total_pnl,
            }
        })
        .collect();

    rows.sort_by(|a, b| unknown_last(&a.sector, &b.sector, b.total_pnl.cmp(&a.total_pnl)));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn open(symbol: &str, sector: Option<&str>, price: Decimal, shares: Decimal) -> Position {
        Position {
            symbol: symbol.to_string(),
            sector: sector.map(str::to_string),
            entry_price: Some(price),
            shares: Some(shares),
            ..Default::default()
        }
    }

    fn closed(symbol: &str, sector: Option<&str>, pnl: Decimal) -> Position {
        Position {
            symbol: symbol.to_string(),
            sector: sector.map(str::to_string),
            realized_pnl: Some(pnl),
            ..Default::default()
        }
    }

    #[test]
    fn test_allocation_and_performance_order_differ() {
        let positions = vec![
            open("AAPL", Some("Technology"), dec!(190), dec!(10)),
            open("JPM", Some("Financials"), dec!(200), dec!(3)),
            closed("MSFT", Some("Technology"), dec!(100)),
            closed("NVDA", Some("Technology"), dec!(-30)),
            closed("GS", Some("Financials"), dec!(200)),
        ];

        let allocation = sector_allocation(&positions);
        assert_eq!(allocation[0].sector, "Technology");
        assert_eq!(allocation[0].cost_basis, dec!(1900));
        assert_eq!(allocation[0].percentage, dec!(76));
        assert_eq!(allocation[1].sector, "Financials");
        assert_eq!(allocation[1].percentage, dec!(24));

        let performance = sector_performance(&positions);
        assert_eq!(performance[0].sector, "Financials");
        assert_eq!(performance[0].total_pnl, dec!(200));
        assert_eq!(performance[1].sector, "Technology");
        assert_eq!(performance[1].trade_count, 2);
        assert_eq!(performance[1].total_pnl, dec!(70));
        assert!((performance[1].win_rate - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_oversized_values_do_not_panic() {
        let positions = vec![
            open("HUGE", Some("Technology"), Decimal::MAX, dec!(2)),
            open("AAPL", Some("Technology"), dec!(100), dec!(1)),
            open("BIG", Some("Energy"), Decimal::MAX, dec!(1)),
            closed("X", Some("Energy"), Decimal::MAX),
            closed("Y", Some("Energy"), Decimal::MAX),
        ];

        let allocation = sector_allocation(&positions);
        let tech = allocation.iter().find(|r| r.sector == "Technology").unwrap();
        assert_eq!(tech.position_count, 2);
        assert_eq!(tech.cost_basis, dec!(100));

        let performance = sector_performance(&positions);
        assert_eq!(performance[0].trade_count, 2);
        assert_eq!(performance[0].total_pnl, Decimal::MAX);
    }

    #[test]
    fn test_unknown_sector_sorts_last() {
        let positions = vec![
            open("XYZ", None, dec!(1000), dec!(100)),
            open("AAPL", Some("Technology"), dec!(10), dec!(1)),
            open("XOM", Some("Energy"), dec!(20), dec!(1)),
            closed("ABC", None, dec!(5000)),
            closed("CVX", Some("Energy"), dec!(-10)),
        ];

        let allocation = sector_allocation(&positions);
        assert_eq!(allocation.last().unwrap().sector, UNKNOWN_SECTOR);
        assert_eq!(allocation[0].sector, "Energy");

        let performance = sector_performance(&positions);
        assert_eq!(performance.last().unwrap().sector, UNKNOWN_SECTOR);
        assert_eq!(performance[0].sector, "Energy");
    }

    #[test]
    fn test_allocation_percentages_sum_to_100() {
        let positions = vec![
            open("A", Some("Technology"), dec!(50), dec!(8)),
            open("B", Some("Energy"), dec!(25), dec!(10)),
            open("C", Some("Health Care"), dec!(125), dec!(2)),
            open("D", None, dec!(100), dec!(1)),
        ];

        let total: Decimal = sector_allocation(&positions)
            .iter()
            .map(|row| row.percentage)
            .sum();
        assert_eq!(total, dec!(100));
    }

    #[test]
    fn test_missing_cost_fields_count_but_add_no_capital() {
        let mut no_price = open("B", Some("Energy"), dec!(0), dec!(10));
        no_price.entry_price = None;
        let positions = vec![open("A", Some("Energy"), dec!(10), dec!(10)), no_price];

        let allocation = sector_allocation(&positions);
        assert_eq!(allocation.len(), 1);
        assert_eq!(allocation[0].position_count, 2);
        assert_eq!(allocation[0].cost_basis, dec!(100));
    }

    #[test]
    fn test_zero_total_gives_zero_percent() {
        let mut pos = open("A", Some("Energy"), dec!(0), dec!(0));
        pos.shares = None;

        let allocation = sector_allocation(&[pos]);
        assert_eq!(allocation[0].percentage, Decimal::ZERO);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(sector_allocation(&[]).is_empty());
        assert!(sector_performance(&[]).is_empty());
    }
}
