//! Display formatting for money, percentages and large numbers.
//!
//! Every formatter accepts anything that can be turned into a decimal
//! (`Decimal`, `f64`, decimal strings, `Option`s of those) and degrades to
//! [`PLACEHOLDER`] when the value is missing or unparsable.

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

use crate::models::decimal::parse_decimal;

/// Shown in place of a missing or malformed value.
pub const PLACEHOLDER: &str = "—";

/// Values that may be rendered as a number.
pub trait Numeric {
    fn to_decimal(&self) -> Option<Decimal>;
}

impl Numeric for Decimal {
    fn to_decimal(&self) -> Option<Decimal> {
        Some(*self)
    }
}

impl Numeric for f64 {
    fn to_decimal(&self) -> Option<Decimal> {
        Decimal::try_from(*self).ok()
    }
}

impl Numeric for i64 {
    fn to_decimal(&self) -> Option<Decimal> {
        Some(Decimal::from(*self))
    }
}

impl Numeric for u32 {
    fn to_decimal(&self) -> Option<Decimal> {
        Some(Decimal::from(*self))
    }
}

impl Numeric for str {
    fn to_decimal(&self) -> Option<Decimal> {
        parse_decimal(self)
    }
}

impl Numeric for String {
    fn to_decimal(&self) -> Option<Decimal> {
        parse_decimal(self)
    }
}

impl<T: Numeric> Numeric for Option<T> {
    fn to_decimal(&self) -> Option<Decimal> {
        self.as_ref().and_then(Numeric::to_decimal)
    }
}

impl<T: Numeric + ?Sized> Numeric for &T {
    fn to_decimal(&self) -> Option<Decimal> {
        (**self).to_decimal()
    }
}

fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Insert thousands separators into a non-negative decimal with `dp` places.
fn group_thousands(value: Decimal, dp: usize) -> String {
    let raw = format!("{:.*}", dp, value);
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (raw, None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    match frac_part {
        Some(f) => format!("{}.{}", grouped, f),
        None => grouped,
    }
}

/// `$1,234.56`, `-$1,234.56`, `$0.00`.
pub fn format_currency(value: impl Numeric) -> String {
    let Some(v) = value.to_decimal() else {
        return PLACEHOLDER.to_string();
    };

    let rounded = round_half_up(v, 2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    format!("{}${}", sign, group_thousands(rounded.abs(), 2))
}

/// `+5.2%`, `-3.1%`; exactly zero (after rounding) carries no sign.
pub fn format_percent(value: impl Numeric) -> String {
    let Some(v) = value.to_decimal() else {
        return PLACEHOLDER.to_string();
    };

    let rounded = round_half_up(v, 1);
    if rounded.is_zero() {
        "0.0%".to_string()
    } else if rounded > Decimal::ZERO {
        format!("+{:.1}%", rounded)
    } else {
        format!("{:.1}%", rounded)
    }
}

/// Abbreviate with K/M/B suffixes and one decimal: `1.5K`, `2.3M`, `1.0B`.
pub fn format_large_number(value: impl Numeric) -> String {
    let Some(v) = value.to_decimal() else {
        return PLACEHOLDER.to_string();
    };

    let magnitude = v.abs();
    let (scaled, suffix) = if magnitude >= dec!(1000000000) {
        (v / dec!(1000000000), "B")
    } else if magnitude >= dec!(1000000) {
        (v / dec!(1000000), "M")
    } else if magnitude >= dec!(1000) {
        (v / dec!(1000), "K")
    } else {
        return format!("{:.0}", round_half_up(v, 0));
    };

    format!("{:.1}{}", round_half_up(scaled, 1), suffix)
}

/// Two-decimal ratio such as a Sharpe ratio or profit factor.
pub fn format_ratio(value: impl Numeric) -> String {
    match value.to_decimal() {
        Some(v) => format!("{:.2}", round_half_up(v, 2)),
        None => PLACEHOLDER.to_string(),
    }
}

/// Holding period in days with one decimal: `4.5d`.
pub fn format_days(value: impl Numeric) -> String {
    match value.to_decimal() {
        Some(v) => format!("{:.1}d", round_half_up(v, 1)),
        None => PLACEHOLDER.to_string(),
    }
}

/// Whole-number score such as a buy threshold or confidence: `60`.
pub fn format_score(value: impl Numeric) -> String {
    match value.to_decimal() {
        Some(v) => format!("{:.0}", round_half_up(v, 0)),
        None => PLACEHOLDER.to_string(),
    }
}

/// Direction of a P&L value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Bullish,
    Bearish,
    Neutral,
}

/// Colour-coded P&L ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PnlDisplay {
    pub text: String,
    /// Empty when the value is missing
    pub color_class: &'static str,
    pub direction_symbol: &'static str,
    pub tone: Option<Tone>,
}

/// Signed currency with bullish/bearish/neutral classification.
pub fn format_pnl(value: impl Numeric) -> PnlDisplay {
    let Some(v) = value.to_decimal() else {
        return PnlDisplay {
            text: PLACEHOLDER.to_string(),
            color_class: "",
            direction_symbol: "",
            tone: None,
        };
    };

    let rounded = round_half_up(v, 2);
    let tone = if rounded > Decimal::ZERO {
        Tone::Bullish
    } else if rounded < Decimal::ZERO {
        Tone::Bearish
    } else {
        Tone::Neutral
    };

    let (text, color_class, direction_symbol) = match tone {
        Tone::Bullish => (format!("+{}", format_currency(rounded)), "text-bullish", "▲"),
        Tone::Bearish => (format_currency(rounded), "text-bearish", "▼"),
        Tone::Neutral => (format_currency(Decimal::ZERO), "text-neutral", ""),
    };

    PnlDisplay {
        text,
        color_class,
        direction_symbol,
        tone: Some(tone),
    }
}

impl PnlDisplay {
    /// Text prefixed with the direction arrow, for terminal output.
    pub fn labeled(&self) -> String {
        if self.direction_symbol.is_empty() {
            self.text.clone()
        } else {
            format!("{} {}", self.direction_symbol, self.text)
        }
    }
}

/// First `limit` symbols, then a `+N more` suffix for the rest.
pub fn symbol_preview(symbols: &[String], limit: usize) -> String {
    if symbols.len() <= limit {
        return symbols.join(", ");
    }

    format!(
        "{} +{} more",
        symbols[..limit].join(", "),
        symbols.len() - limit
    )
}

/// Truncate a string with ellipsis if too long.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(dec!(0)), "$0.00");
        assert_eq!(format_currency(dec!(-50.75)), "-$50.75");
        assert_eq!(format_currency(dec!(1234.56)), "$1,234.56");
        assert_eq!(format_currency(dec!(-1234567.891)), "-$1,234,567.89");
        assert_eq!(format_currency("999.995"), "$1,000.00");
        assert_eq!(format_currency(dec!(-0.001)), "$0.00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(5.2), "+5.2%");
        assert_eq!(format_percent(0.0), "0.0%");
        assert_eq!(format_percent(dec!(-3.1)), "-3.1%");
        assert_eq!(format_percent("12.345"), "+12.3%");
        assert_eq!(format_percent(dec!(-0.04)), "0.0%");
    }

    #[test]
    fn test_format_large_number() {
        assert_eq!(format_large_number(dec!(950)), "950");
        assert_eq!(format_large_number(dec!(1000)), "1.0K");
        assert_eq!(format_large_number(dec!(1500)), "1.5K");
        assert_eq!(format_large_number(dec!(2340000)), "2.3M");
        assert_eq!(format_large_number(dec!(1000000000)), "1.0B");
        assert_eq!(format_large_number(dec!(-45600)), "-45.6K");
    }

    #[test]
    fn test_missing_and_malformed_values() {
        let missing: Option<Decimal> = None;
        assert_eq!(format_currency(missing), PLACEHOLDER);
        assert_eq!(format_percent("abc"), PLACEHOLDER);
        assert_eq!(format_large_number(""), PLACEHOLDER);
        assert_eq!(format_ratio(f64::NAN), PLACEHOLDER);
        assert_eq!(format_days(None::<String>), PLACEHOLDER);
    }

    #[test]
    fn test_format_pnl() {
        let up = format_pnl(dec!(125.5));
        assert_eq!(up.text, "+$125.50");
        assert_eq!(up.color_class, "text-bullish");
        assert_eq!(up.direction_symbol, "▲");
        assert_eq!(up.labeled(), "▲ +$125.50");

        let down = format_pnl("-80");
        assert_eq!(down.text, "-$80.00");
        assert_eq!(down.tone, Some(Tone::Bearish));

        let flat = format_pnl(dec!(0));
        assert_eq!(flat.text, "$0.00");
        assert_eq!(flat.tone, Some(Tone::Neutral));

        let none = format_pnl(None::<Decimal>);
        assert_eq!(none.text, PLACEHOLDER);
        assert_eq!(none.color_class, "");
        assert_eq!(none.tone, None);
    }

    #[test]
    fn test_symbol_preview() {
        let symbols: Vec<String> = ["AAPL", "MSFT", "NVDA"].iter().map(|s| s.to_string()).collect();
        assert_eq!(symbol_preview(&symbols, 8), "AAPL, MSFT, NVDA");
        assert_eq!(symbol_preview(&symbols, 2), "AAPL, MSFT +1 more");
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(dec!(60)), "60");
        assert_eq!(format_score("72.5"), "73");
        assert_eq!(format_score(None::<Decimal>), PLACEHOLDER);
    }

    #[test]
    fn test_ratio_and_days() {
        assert_eq!(format_ratio(dec!(1.456)), "1.46");
        assert_eq!(format_days("4.25"), "4.3d");
    }
}
