/// Removes every character that is not part of a number.
///
/// Keeps ASCII digits, `.` when `allow_decimal` is set, and a `-` in first
/// position when `allow_negative` is set.
///
/// # Examples
///
/// ```
/// use textfmt::format::numeric;
///
/// assert_eq!(numeric("$1,234.50", true, false), "1234.50");
/// assert_eq!(numeric("-42 apples", false, true), "-42");
/// assert_eq!(numeric("(555) 123-4567", false, false), "5551234567");
/// ```
pub fn numeric(value: &str, allow_decimal: bool, allow_negative: bool) -> String {
    value
        .char_indices()
        .filter(|&(idx, c)| {
            c.is_ascii_digit() || (allow_decimal && c == '.') || (allow_negative && idx == 0 && c == '-')
        })
        .map(|(_, c)| c)
        .collect()
}

/// Parses the leading number of an already-cleaned string.
///
/// Extra decimal points after the first end the number (`"1.2.3"` is 1.2).
/// Returns `None` when no digits are present.
pub(crate) fn parse_leading_number(cleaned: &str) -> Option<f64> {
    let mut end = 0;
    let mut seen_dot = false;
    let mut seen_digit = false;
    for (idx, c) in cleaned.char_indices() {
        match c {
            '-' if idx == 0 => {}
            '.' if !seen_dot => seen_dot = true,
            d if d.is_ascii_digit() => seen_digit = true,
            _ => break,
        }
        end = idx + c.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    cleaned[..end].trim_end_matches('.').parse().ok()
}
