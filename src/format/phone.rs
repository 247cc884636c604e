use serde::Deserialize;

use super::numeric::numeric;

/// North-American phone number layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PhoneFormat {
    /// 10 (`(555) 123-4567`) or 11 (`1 (555) 123-4567`).
    pub digits: u8,
    pub separator: String,
    pub area_code_brackets: bool,
    pub extension_separator: String,
    pub strip_extension: bool,
}

impl Default for PhoneFormat {
    fn default() -> Self {
        Self {
            digits: 10,
            separator: "-".to_string(),
            area_code_brackets: true,
            extension_separator: " x ".to_string(),
            strip_extension: false,
        }
    }
}

/// Formats a Canadian/American phone number.
///
/// Digits are pulled out of whatever punctuation the input uses; the last ten
/// form the number (a leading country code is dropped, then re-added in
/// 11-digit style). Anything after the first letter (`x`, `ext`) is treated
/// as an extension.
///
/// Returns `None` for empty input or fewer than 7 digits. Exactly 7 digits are
/// formatted as a local number without area code.
///
/// # Examples
///
/// ```
/// use textfmt::format::{phone, PhoneFormat};
///
/// let format = PhoneFormat::default();
/// assert_eq!(phone("555.123.4567", &format).as_deref(), Some("(555) 123-4567"));
/// assert_eq!(phone("+1 555 123 4567 ext 89", &format).as_deref(), Some("(555) 123-4567 x 89"));
/// assert_eq!(phone("12345", &format), None);
/// ```
pub fn phone(input: &str, format: &PhoneFormat) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let (number_part, extension_part) = match input.find(|c: char| c.is_ascii_alphabetic()) {
        Some(idx) => (&input[..idx], &input[idx..]),
        None => (input, ""),
    };

    let digits = numeric(number_part, false, false);
    if digits.len() < 7 {
        return None;
    }

    let mut formatted = if digits.len() == 7 {
        format!("{}{}{}", &digits[..3], format.separator, &digits[3..])
    } else {
        let national = &digits[digits.len().saturating_sub(10)..];
        let (area, rest) = national.split_at(3);
        let (exchange, line) = rest.split_at(3);

        let (open, close) = if format.area_code_brackets {
            ("(", ") ".to_string())
        } else {
            ("", format.separator.clone())
        };
        let country = match (format.digits, format.area_code_brackets) {
            (11, true) => "1 ".to_string(),
            (11, false) => format!("1{}", format.separator),
            _ => String::new(),
        };

        format!(
            "{}{}{}{}{}{}{}",
            country, open, area, close, exchange, format.separator, line
        )
    };

    let extension = numeric(extension_part, false, false);
    if !extension.is_empty() && !format.strip_extension {
        formatted.push_str(&format.extension_separator);
        formatted.push_str(&extension);
    }

    Some(formatted)
}

/// Formats a Canadian postal code as `A1A 1A1` (or `A1A1A1`).
///
/// Returns `None` when the input does not hold six characters.
///
/// ```
/// use textfmt::format::postal_code;
///
/// assert_eq!(postal_code("t2p1j9", true).as_deref(), Some("T2P 1J9"));
/// assert_eq!(postal_code("T2P 1J9", false).as_deref(), Some("T2P1J9"));
/// assert_eq!(postal_code("T2P", true), None);
/// ```
pub fn postal_code(input: &str, separate_with_space: bool) -> Option<String> {
    let compact: Vec<char> = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect();
    if compact.len() < 6 {
        return None;
    }

    let first: String = compact[..3].iter().collect();
    let second: String = compact[3..6].iter().collect();
    let separator = if separate_with_space { " " } else { "" };
    Some(format!("{}{}{}", first, separator, second))
}
