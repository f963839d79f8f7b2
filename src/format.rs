//! Formatting of money and dates for display.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};
use time::{Date, PrimitiveDateTime, macros::format_description};

/// The currency label used when none is configured.
pub const DEFAULT_CURRENCY: &str = "DT";

/// Whole amounts from this size up are grouped by [group_thousands], numfmt
/// switches to scientific notation for very large numbers.
const NUMFMT_LIMIT: f64 = 1e12;

/// Format a non-negative amount with thousands separators and two decimals,
/// e.g. `1,234.50`.
///
/// The amount is rounded to the nearest cent, so anything below half a cent
/// is `0.00`. The sign of `amount` is ignored, callers decide how to present
/// it.
pub fn format_magnitude(amount: f64) -> String {
    let cents = round_to_cents(amount);
    let whole = (cents / 100.0).trunc();
    let fraction = (cents - whole * 100.0).clamp(0.0, 99.0) as u8;

    format!("{}.{fraction:02}", format_whole(whole))
}

/// The absolute value of `amount` in whole cents. Non-finite amounts are zero.
fn round_to_cents(amount: f64) -> f64 {
    let cents = (amount.abs() * 100.0).round();

    if cents.is_finite() { cents } else { 0.0 }
}

fn format_whole(whole: f64) -> String {
    static FMT: OnceLock<Formatter> = OnceLock::new();

    let fmt = FMT.get_or_init(|| {
        Formatter::currency("")
            .unwrap()
            .precision(Precision::Decimals(0))
    });

    if whole == 0.0 {
        // Zero is hardcoded as "0" by numfmt
        "0".to_owned()
    } else if whole < NUMFMT_LIMIT {
        fmt.fmt_string(whole)
    } else {
        group_thousands(&format!("{whole:.0}"))
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    grouped
}

/// Format `amount` followed by the currency label, e.g. `-1,234.50 DT`.
///
/// Negative amounts that round to zero are shown without a sign.
pub fn format_money(amount: f64, currency: &str) -> String {
    let sign = if amount < 0.0 && round_to_cents(amount) > 0.0 {
        "-"
    } else {
        ""
    };

    with_currency(&format!("{sign}{}", format_magnitude(amount)), currency)
}

pub(crate) fn with_currency(amount: &str, currency: &str) -> String {
    let currency = currency.trim();

    if currency.is_empty() {
        amount.to_owned()
    } else {
        format!("{amount} {currency}")
    }
}

/// Format a timestamp as `YYYY/MM/DD HH:MM`.
pub fn format_timestamp(timestamp: PrimitiveDateTime) -> String {
    timestamp
        .format(format_description!(
            "[year]/[month]/[day] [hour]:[minute]"
        ))
        .unwrap_or_default()
}

/// Format a date as `YYYY/MM/DD`.
pub fn format_date(date: Date) -> String {
    date.format(format_description!("[year]/[month]/[day]"))
        .unwrap_or_default()
}
