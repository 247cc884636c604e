use std::borrow::Cow;

/// Counts Unicode scalar values in a string.
///
/// All budgets in this crate (character limits, suffix reservations) are
/// expressed in characters, never bytes, so that multi-byte text is charged
/// the same as ASCII.
///
/// # Examples
///
/// ```
/// use textfmt::util::char_count;
///
/// assert_eq!(char_count("hello"), 5);
/// assert_eq!(char_count("héllo"), 5);
/// ```
pub fn char_count(s: &str) -> usize {
    s.chars().count()
}

/// Returns the longest prefix of `s` containing at most `max_chars` characters.
///
/// Always cuts on a UTF-8 boundary and never allocates.
///
/// # Examples
///
/// ```
/// use textfmt::util::take_chars;
///
/// assert_eq!(take_chars("abcdefgh", 6), "abcdef");
/// assert_eq!(take_chars("日本語", 2), "日本");
/// assert_eq!(take_chars("abc", 10), "abc");
/// ```
pub fn take_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((byte_end, _)) => &s[..byte_end],
        None => s,
    }
}

/// Trims trailing whitespace, borrowing when nothing needs to go.
pub fn trim_end_cow(s: Cow<'_, str>) -> Cow<'_, str> {
    match s {
        Cow::Borrowed(b) => Cow::Borrowed(b.trim_end()),
        Cow::Owned(mut o) => {
            let len = o.trim_end().len();
            o.truncate(len);
            Cow::Owned(o)
        }
    }
}
