use serde::Deserialize;

use super::numeric::{numeric, parse_leading_number};

/// How negative amounts are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativeStyle {
    /// `-$12.00`
    #[default]
    Minus,
    /// `($12.00)`
    Brackets,
    /// Negative amounts are shown as zero.
    Zero,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MoneyFormat {
    pub prefix: String,
    pub negative: NegativeStyle,
    pub thousands_separator: String,
}

impl Default for MoneyFormat {
    fn default() -> Self {
        Self {
            prefix: "$".to_string(),
            negative: NegativeStyle::Minus,
            thousands_separator: ",".to_string(),
        }
    }
}

/// Formats a money value with two decimals.
///
/// Unlike a plain number format, the currency prefix sits to the right of the
/// minus sign. Anything that is not a number is ignored; no number at all
/// yields zero.
///
/// # Examples
///
/// ```
/// use textfmt::format::{money, MoneyFormat, NegativeStyle};
///
/// let format = MoneyFormat::default();
/// assert_eq!(money("1234.5", &format), "$1,234.50");
/// assert_eq!(money("-33", &format), "-$33.00");
///
/// let format = MoneyFormat { negative: NegativeStyle::Brackets, ..MoneyFormat::default() };
/// assert_eq!(money("-33", &format), "($33.00)");
/// ```
pub fn money(value: &str, format: &MoneyFormat) -> String {
    let zero = format!("{}0.00", format.prefix);
    let Some(amount) = parse_leading_number(&numeric(value, true, true)) else {
        return zero;
    };

    let formatted = group_thousands(amount.abs(), &format.thousands_separator);
    if amount < 0.0 && formatted != "0.00" {
        match format.negative {
            NegativeStyle::Minus => format!("-{}{}", format.prefix, formatted),
            NegativeStyle::Brackets => format!("({}{})", format.prefix, formatted),
            NegativeStyle::Zero => zero,
        }
    } else {
        format!("{}{}", format.prefix, formatted)
    }
}

/// Percentage of `value` in `total`, rounded to `decimals` places.
///
/// A zero or negative total yields 0 instead of dividing by zero.
///
/// ```
/// use textfmt::format::percent;
///
/// assert_eq!(percent(1.0, 3.0, 1), 33.3);
/// assert_eq!(percent(5.0, 0.0, 1), 0.0);
/// ```
pub fn percent(value: f64, total: f64, decimals: u32) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    let factor = 10f64.powi(decimals as i32);
    (value / total * 100.0 * factor).round() / factor
}

/// [`percent`] followed by a `%` sign: `"33.3%"`, `"50%"`.
pub fn format_percent(value: f64, total: f64, decimals: u32) -> String {
    format!("{}%", percent(value, total, decimals))
}

/// Two-decimal rendering of a non-negative amount with grouped thousands.
fn group_thousands(amount: f64, separator: &str) -> String {
    let fixed = format!("{:.2}", amount);
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let digits = whole.len();
    let mut grouped = String::with_capacity(digits + digits / 3 * separator.len() + 3);
    for (idx, c) in whole.chars().enumerate() {
        if idx > 0 && (digits - idx) % 3 == 0 {
            grouped.push_str(separator);
        }
        grouped.push(c);
    }
    grouped.push('.');
    grouped.push_str(fraction);
    grouped
}
