//! Tag scanner for HTML-aware truncation.
//!
//! Splits markup into an ordered list of [`Segment`]s: runs of plain text and
//! whole tag spans. A tag span is either a balanced `<name ...>...</name>` pair
//! (same-name nesting is tracked), a self-closing `<name .../>`, or a void
//! element such as `<br>`. Anything else that starts with `<` stays text.
//!
//! The scanner never fails: unmatched or malformed markup degrades to text.

use std::borrow::Cow;
use std::collections::HashMap;

use crate::util::char_count;

/// Elements that never take a closing tag.
const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// A whole tag span found in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagToken<'a> {
    /// The span exactly as it appears in the input, markup included.
    pub raw: &'a str,
    /// Visible characters inside the span (markup stripped).
    pub inner_text_len: usize,
    /// Position of this span among all spans of the input.
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Tag(TagToken<'a>),
}

/// Scans `input` into text and tag segments.
///
/// Concatenating the `raw`/text of every segment reproduces `input` exactly.
/// Runs in linear time: tag heads are found in one pass and paired with
/// their closers through a per-name stack.
pub fn scan(input: &str) -> Vec<Segment<'_>> {
    let heads = tag_heads(input);
    let closers = pair_closers(&heads);

    let mut segments = Vec::new();
    let mut text_start = 0;
    let mut tag_index = 0;

    for (i, head) in heads.iter().enumerate() {
        if head.start < text_start {
            continue;
        }
        let end = match head.kind {
            HeadKind::Open { self_closing, .. } if self_closing || is_void(head.name) => head.end,
            HeadKind::Open { .. } => match closers[i] {
                Some(closer) => heads[closer].end,
                None => continue,
            },
            HeadKind::Close => continue,
        };

        if text_start < head.start {
            segments.push(Segment::Text(&input[text_start..head.start]));
        }
        let raw = &input[head.start..end];
        segments.push(Segment::Tag(TagToken {
            raw,
            inner_text_len: char_count(&strip_tags(raw)),
            index: tag_index,
        }));
        tag_index += 1;
        text_start = end;
    }

    if text_start < input.len() {
        segments.push(Segment::Text(&input[text_start..]));
    }
    segments
}

/// Removes all markup from `input`, keeping the visible text.
///
/// A `<` only opens markup when followed by a letter, `/` or `!` and closed by
/// a later `>`; otherwise it is kept as text (`"a < b"` survives unchanged).
///
/// Returns `Cow::Borrowed` when the input contains no markup.
///
/// ```
/// use textfmt::limit::strip_tags;
///
/// assert_eq!(strip_tags("<p>Hello <b>world</b></p>"), "Hello world");
/// assert_eq!(strip_tags("1 < 2"), "1 < 2");
/// ```
pub fn strip_tags(input: &str) -> Cow<'_, str> {
    if !input.contains('<') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut pos = 0;
    let mut stripped_any = false;

    while let Some(offset) = input[pos..].find('<') {
        let start = pos + offset;
        out.push_str(&input[pos..start]);

        let opens_markup = input[start + 1..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '/' || c == '!');

        match opens_markup.then(|| markup_close(input, start + 1)).flatten() {
            Some(end) => {
                stripped_any = true;
                pos = end;
            }
            None => {
                out.push('<');
                pos = start + 1;
            }
        }
    }
    out.push_str(&input[pos..]);

    if stripped_any {
        Cow::Owned(out)
    } else {
        Cow::Borrowed(input)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeadKind {
    Open { self_closing: bool },
    Close,
}

/// An opening `<name ...>` or closing `</name>` tag head.
#[derive(Debug)]
struct TagHead<'a> {
    name: &'a str,
    start: usize,
    end: usize,
    kind: HeadKind,
}

/// Every tag head in `input`, in order. Heads never overlap.
fn tag_heads(input: &str) -> Vec<TagHead<'_>> {
    let mut heads = Vec::new();
    let mut pos = 0;
    while let Some(offset) = input[pos..].find('<') {
        let start = pos + offset;
        match parse_close_tag(input, start).or_else(|| parse_open_tag(input, start)) {
            Some(head) => {
                pos = head.end;
                heads.push(head);
            }
            None => pos = start + 1,
        }
    }
    heads
}

/// For each open head, the index of the head closing it.
///
/// Only same-name heads affect each other's nesting depth; stray closers are
/// ignored and opens left on the stack stay unmatched.
fn pair_closers(heads: &[TagHead<'_>]) -> Vec<Option<usize>> {
    let mut closers = vec![None; heads.len()];
    let mut open: HashMap<String, Vec<usize>> = HashMap::new();

    for (i, head) in heads.iter().enumerate() {
        match head.kind {
            HeadKind::Open { self_closing } => {
                if !self_closing && !is_void(head.name) {
                    open.entry(head.name.to_ascii_lowercase()).or_default().push(i);
                }
            }
            HeadKind::Close => {
                if let Some(opener) = open
                    .get_mut(&head.name.to_ascii_lowercase())
                    .and_then(|stack| stack.pop())
                {
                    closers[opener] = Some(i);
                }
            }
        }
    }
    closers
}

/// Length of the tag name at the start of `rest`, if it starts with one.
fn tag_name_len(rest: &str) -> Option<usize> {
    if !rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    Some(
        rest.find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
            .unwrap_or(rest.len()),
    )
}

fn parse_open_tag(input: &str, start: usize) -> Option<TagHead<'_>> {
    let rest = &input[start + 1..];
    let name_len = tag_name_len(rest)?;
    let name = &rest[..name_len];

    // The name must be followed by whitespace, `>` or `/`.
    let after_name = start + 1 + name_len;
    match input[after_name..].chars().next() {
        Some(c) if c.is_whitespace() || c == '>' || c == '/' => {}
        _ => return None,
    }

    let end = markup_close(input, after_name)?;
    let self_closing = input[after_name..end - 1].trim_end().ends_with('/');
    Some(TagHead {
        name,
        start,
        end,
        kind: HeadKind::Open { self_closing },
    })
}

/// Matches `</name>` (optional whitespace before `>`).
fn parse_close_tag(input: &str, start: usize) -> Option<TagHead<'_>> {
    let rest = input[start..].strip_prefix("</")?;
    let name_len = tag_name_len(rest)?;
    let trimmed = rest[name_len..].trim_start();
    if !trimmed.starts_with('>') {
        return None;
    }
    Some(TagHead {
        name: &rest[..name_len],
        start,
        end: input.len() - trimmed.len() + 1,
        kind: HeadKind::Close,
    })
}

/// Finds the `>` closing a tag head, honouring quoted attribute values.
///
/// Returns the byte offset just past that `>`.
fn markup_close(input: &str, from: usize) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (idx, c) in input[from..].char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '>') => return Some(from + idx + 1),
            (None, '<') => return None,
            _ => {}
        }
    }
    None
}

fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags<'a>(segments: &[Segment<'a>]) -> Vec<&'a str> {
        segments
            .iter()
            .filter_map(|s| match s {
                Segment::Tag(t) => Some(t.raw),
                Segment::Text(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_scan_balanced_pair() {
        let segments = scan("<b>hello</b> world");
        assert_eq!(
            segments,
            vec![
                Segment::Tag(TagToken {
                    raw: "<b>hello</b>",
                    inner_text_len: 5,
                    index: 0,
                }),
                Segment::Text(" world"),
            ]
        );
    }

    #[test]
    fn test_scan_nested_same_name() {
        let input = "<div>a <div>b</div> c</div>tail";
        let segments = scan(input);
        assert_eq!(tags(&segments), vec!["<div>a <div>b</div> c</div>"]);
        assert_eq!(segments.last(), Some(&Segment::Text("tail")));
    }

    #[test]
    fn test_scan_self_closing_and_void() {
        let segments = scan("a<br>b<img src=\"x.png\"/>c");
        assert_eq!(tags(&segments), vec!["<br>", "<img src=\"x.png\"/>"]);
        match &segments[1] {
            Segment::Tag(t) => assert_eq!(t.inner_text_len, 0),
            Segment::Text(_) => panic!("expected tag"),
        }
    }

    #[test]
    fn test_scan_quoted_gt_in_attribute() {
        let segments = scan("<a title=\"1 > 0\" href=\"/\">link</a>!");
        assert_eq!(tags(&segments), vec!["<a title=\"1 > 0\" href=\"/\">link</a>"]);
    }

    #[test]
    fn test_scan_unmatched_is_text() {
        let input = "x < y and <b>unclosed";
        let segments = scan(input);
        assert_eq!(segments, vec![Segment::Text(input)]);
    }

    #[test]
    fn test_scan_many_unclosed_before_pair() {
        let input = format!("{}<i>x</i>", "<b>".repeat(5_000));
        let segments = scan(&input);
        assert_eq!(tags(&segments), vec!["<i>x</i>"]);
        assert_eq!(segments.len(), 2);
    }

    #[test]
    fn test_scan_pairs_innermost_same_name() {
        let segments = scan("<b>x<b>y</b> z");
        assert_eq!(tags(&segments), vec!["<b>y</b>"]);
    }

    #[test]
    fn test_scan_reassembles_input() {
        let input = "<p>One <em>two</em></p> three <i>four</i> < five";
        let rebuilt: String = scan(input)
            .iter()
            .map(|s| match s {
                Segment::Text(t) => *t,
                Segment::Tag(t) => t.raw,
            })
            .collect();
        assert_eq!(rebuilt, input);
    }

    #[test]
    fn test_scan_indexes_in_order() {
        let segments = scan("<i>a</i> <b>b</b>");
        let indexes: Vec<usize> = segments
            .iter()
            .filter_map(|s| match s {
                Segment::Tag(t) => Some(t.index),
                Segment::Text(_) => None,
            })
            .collect();
        assert_eq!(indexes, vec![0, 1]);
    }

    #[test]
    fn test_strip_tags_keeps_plain_angle_brackets() {
        assert_eq!(strip_tags("a <b>bold</b> > c"), "a bold > c");
        assert!(matches!(strip_tags("no markup"), Cow::Borrowed(_)));
        assert!(matches!(strip_tags("1 < 2"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_tags_comments_and_closers() {
        assert_eq!(strip_tags("<!-- note -->text</p>"), "text");
    }

    #[test]
    fn test_strip_tags_multibyte() {
        assert_eq!(strip_tags("<b>日本</b>語"), "日本語");
    }
}
