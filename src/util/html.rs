use std::borrow::Cow;

/// Encodes HTML special characters as entities.
///
/// Encodes `&`, `<`, `>`, `"` and `'`. Existing entities (`&amp;`, `&#39;`,
/// `&#x27;`) are left alone, so encoding already-encoded text is a no-op.
///
/// Returns `Cow::Borrowed` when nothing needs encoding.
///
/// # Examples
///
/// ```
/// use textfmt::util::entities;
///
/// assert_eq!(entities("Tom & Jerry"), "Tom &amp; Jerry");
/// assert_eq!(entities("Tom &amp; Jerry"), "Tom &amp; Jerry");
/// assert_eq!(entities("<b>\"hi\"</b>"), "&lt;b&gt;&quot;hi&quot;&lt;/b&gt;");
/// ```
pub fn entities(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 16);
    for (idx, c) in s.char_indices() {
        match c {
            '&' if is_entity_at(&s[idx..]) => out.push('&'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Checks whether `s` (starting at an `&`) begins with a complete entity.
fn is_entity_at(s: &str) -> bool {
    let Some(end) = s[1..].find(';') else {
        return false;
    };
    let body = &s[1..=end];
    if body.is_empty() || body.len() > 32 {
        return false;
    }

    if let Some(num) = body.strip_prefix('#') {
        if let Some(hex) = num.strip_prefix(['x', 'X']) {
            return !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit());
        }
        return !num.is_empty() && num.chars().all(|c| c.is_ascii_digit());
    }

    body.chars().all(|c| c.is_ascii_alphanumeric())
        && body.starts_with(|c: char| c.is_ascii_alphabetic())
}

/// Splits text on line breaks into paragraph boundaries.
///
/// The result is meant to be wrapped in an outer `<p>...</p>`; blank
/// paragraphs produced by consecutive breaks are dropped.
///
/// ```
/// use textfmt::util::nl2p;
///
/// assert_eq!(nl2p("one\r\ntwo"), "one</p><p>two");
/// assert_eq!(nl2p("one\n\ntwo\n"), "one</p><p>two");
/// ```
pub fn nl2p(s: &str) -> String {
    let normalized = s.trim().replace("\r\n", "\n");
    normalized
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("</p><p>")
}

/// Formats an email address as a `mailto:` link.
///
/// Returns `None` for values that do not look like an address (no `@`, or no
/// `.`, or either at position 0).
pub fn email_link(email: &str, subject: Option<&str>) -> Option<String> {
    let email = email.trim();
    let at = email.find('@')?;
    let dot = email.find('.')?;
    if at == 0 || dot == 0 {
        return None;
    }

    let mut href = format!("mailto:{}", email);
    if let Some(subject) = subject.map(str::trim).filter(|s| !s.is_empty()) {
        href.push_str("?subject=");
        href.push_str(&subject.replace(' ', "%20"));
    }

    Some(format!(
        "<a href=\"{}\" class=\"email\">{}</a>",
        entities(&href),
        entities(email)
    ))
}
