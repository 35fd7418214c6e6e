//! Sort and best/worst highlighting for the simulation comparison table.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::models::{JobStatus, Simulation};

/// Metric columns the comparison table can sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    TotalReturnPct,
    MaxDrawdownPct,
    SharpeRatio,
    ProfitFactor,
    WinRate,
    TotalTrades,
    AvgHoldDays,
    AvgWinPnl,
    AvgLossPnl,
}

impl SortField {
    pub const ALL: [SortField; 9] = [
        SortField::TotalReturnPct,
        SortField::MaxDrawdownPct,
        SortField::SharpeRatio,
        SortField::ProfitFactor,
        SortField::WinRate,
        SortField::TotalTrades,
        SortField::AvgHoldDays,
        SortField::AvgWinPnl,
        SortField::AvgLossPnl,
    ];

    /// Whether a larger value ranks as better.
    ///
    /// Average loss is negative, so "less negative" is the larger value.
    pub fn higher_is_better(&self) -> bool {
        !matches!(self, SortField::MaxDrawdownPct | SortField::AvgHoldDays)
    }

    /// API field name.
    pub fn key(&self) -> &'static str {
        match self {
            SortField::TotalReturnPct => "total_return_pct",
            SortField::MaxDrawdownPct => "max_drawdown_pct",
            SortField::SharpeRatio => "sharpe_ratio",
            SortField::ProfitFactor => "profit_factor",
            SortField::WinRate => "win_rate",
            SortField::TotalTrades => "total_trades",
            SortField::AvgHoldDays => "avg_hold_days",
            SortField::AvgWinPnl => "avg_win_pnl",
            SortField::AvgLossPnl => "avg_loss_pnl",
        }
    }

    /// Column header.
    pub fn label(&self) -> &'static str {
        match self {
            SortField::TotalReturnPct => "RETURN",
            SortField::MaxDrawdownPct => "MAX DD",
            SortField::SharpeRatio => "SHARPE",
            SortField::ProfitFactor => "PF",
            SortField::WinRate => "WIN%",
            SortField::TotalTrades => "TRADES",
            SortField::AvgHoldDays => "HOLD",
            SortField::AvgWinPnl => "AVG WIN",
            SortField::AvgLossPnl => "AVG LOSS",
        }
    }

    /// Metric value used for ranking.
    ///
    /// Only completed simulations have one; drawdown is ranked by magnitude.
    pub fn value(&self, sim: &Simulation) -> Option<Decimal> {
        if sim.status != JobStatus::Completed {
            return None;
        }

        match self {
            SortField::TotalReturnPct => sim.total_return_pct,
            SortField::MaxDrawdownPct => sim.max_drawdown_pct.map(|d| d.abs()),
            SortField::SharpeRatio => sim.sharpe_ratio,
            SortField::ProfitFactor => sim.profit_factor,
            SortField::WinRate => sim.win_rate(),
            SortField::TotalTrades => Some(Decimal::from(sim.total_trades)),
            SortField::AvgHoldDays => sim.avg_hold_days,
            SortField::AvgWinPnl => sim.avg_win_pnl,
            SortField::AvgLossPnl => sim.avg_loss_pnl,
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        SortField::ALL
            .into_iter()
            .find(|field| field.key() == normalized)
            .ok_or_else(|| {
                let keys: Vec<&str> = SortField::ALL.iter().map(|f| f.key()).collect();
                format!("unknown sort field '{}' (expected one of: {})", s, keys.join(", "))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Active sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            field: SortField::TotalReturnPct,
            direction: SortDirection::Descending,
        }
    }
}

impl SortState {
    /// Header click: the active column flips, another column takes over
    /// sorted descending.
    pub fn click(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field;
            self.direction = SortDirection::Descending;
        }
    }

    /// Total order for table rows.
    ///
    /// Unfinished simulations go after finished ones whatever the direction,
    /// then missing values go last, then values compare numerically.
    pub fn compare(&self, a: &Simulation, b: &Simulation) -> Ordering {
        match (a.is_terminal(), b.is_terminal()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }

        match (self.field.value(a), self.field.value(b)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => match self.direction {
                SortDirection::Ascending => x.cmp(&y),
                SortDirection::Descending => y.cmp(&x),
            },
        }
    }

    /// Rows in display order; ties keep their input order.
    pub fn sort<'a>(&self, simulations: &'a [Simulation]) -> Vec<&'a Simulation> {
        let mut rows: Vec<&Simulation> = simulations.iter().collect();
        rows.sort_by(|a, b| self.compare(a, b));
        rows
    }
}

/// Cell highlight class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Best,
    Worst,
}

/// Best and worst values of one column over completed simulations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnExtremes {
    pub best: Decimal,
    pub worst: Decimal,
}

impl ColumnExtremes {
    /// `None` when fewer than two distinct values exist, so a column where
    /// every row ties (including a single row) is never highlighted.
    pub fn compute(simulations: &[Simulation], field: SortField) -> Option<Self> {
        let values: Vec<Decimal> = simulations
            .iter()
            .filter_map(|sim| field.value(sim))
            .collect();

        let min = values.iter().min().copied()?;
        let max = values.iter().max().copied()?;
        if min == max {
            return None;
        }

        Some(if field.higher_is_better() {
            Self { best: max, worst: min }
        } else {
            Self { best: min, worst: max }
        })
    }

    pub fn classify(&self, value: Option<Decimal>) -> Option<Highlight> {
        match value? {
            v if v == self.best => Some(Highlight::Best),
            v if v == self.worst => Some(Highlight::Worst),
            _ => None,
        }
    }
}

/// Sorted comparison table with per-column extremes.
#[derive(Debug, Clone)]
pub struct ComparisonTable<'a> {
    pub state: SortState,
    pub rows: Vec<&'a Simulation>,
    extremes: Vec<(SortField, Option<ColumnExtremes>)>,
}

impl<'a> ComparisonTable<'a> {
    pub fn build(simulations: &'a [Simulation], state: SortState) -> Self {
        let extremes = SortField::ALL
            .into_iter()
            .map(|field| (field, ColumnExtremes::compute(simulations, field)))
            .collect();

        Self {
            state,
            rows: state.sort(simulations),
            extremes,
        }
    }

    /// Highlight for one cell.
    pub fn highlight(&self, sim: &Simulation, field: SortField) -> Option<Highlight> {
        let (_, extremes) = self.extremes.iter().find(|(f, _)| *f == field)?;
        extremes.as_ref()?.classify(field.value(sim))
    }
}
