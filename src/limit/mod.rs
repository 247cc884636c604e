//! Word and character limiting with optional HTML awareness.
//!
//! [`string_limit`] is the single engine; [`char_limit`] and [`word_limit`]
//! are thin facades that pick the mode. When HTML awareness applies, the input
//! is split into text runs and whole tag spans by [`scan`] so that markup
//! is carried over intact and only visible text is charged against the budget.
//! Otherwise the markup is stripped and the plain text is limited.
//!
//! # Examples
//!
//! ```
//! use textfmt::limit::{string_limit, LimitConfig};
//!
//! let config = LimitConfig::words(3);
//! assert_eq!(string_limit("one two three four five", &config), "one two three...");
//!
//! let config = LimitConfig::chars(5).without_exceeded_text();
//! assert_eq!(string_limit("<b>hello</b> world", &config), "<b>hello</b>");
//! ```

mod tags;

use std::borrow::Cow;

use serde::Deserialize;

use crate::util::{char_count, entities, nl2p, trim_end_cow};

pub use tags::{scan, strip_tags, Segment, TagToken};

/// Which unit the budget is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitMode {
    Words,
    #[default]
    Chars,
}

/// Options for [`string_limit`].
///
/// All fields use `#[serde(default)]` so a `[string_limit]` config table can
/// override any subset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LimitConfig {
    /// Active limiting unit. Only the matching budget below is used.
    pub mode: LimitMode,
    /// Word budget for [`LimitMode::Words`].
    pub words: usize,
    /// Character budget for [`LimitMode::Chars`].
    pub chars: usize,
    /// Strip leading and trailing whitespace first.
    pub trim: bool,
    /// Preserve tag spans instead of stripping them.
    pub html: bool,
    /// Largest input (in words) that is scanned for tags.
    pub max_words_html: usize,
    /// Largest input (in characters) that is scanned for tags.
    pub max_chars_html: usize,
    /// Appended when content was cut. `None` appends nothing.
    pub exceeded_text: Option<String>,
    /// Wraps the exceeded text in a link to this URL.
    pub exceeded_link_url: Option<String>,
    /// Class attribute of the exceeded link.
    pub exceeded_link_class: String,
    /// Wraps a link-less exceeded text in a `<span>` with this class.
    pub exceeded_span_class: Option<String>,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            mode: LimitMode::Chars,
            words: 50,
            chars: 140,
            trim: true,
            html: true,
            max_words_html: 100,
            max_chars_html: 480,
            exceeded_text: Some("...".to_string()),
            exceeded_link_url: None,
            exceeded_link_class: "read-more".to_string(),
            exceeded_span_class: None,
        }
    }
}

impl LimitConfig {
    /// Default options limiting to `chars` characters.
    pub fn chars(chars: usize) -> Self {
        Self::default().with_chars(chars)
    }

    /// Default options limiting to `words` words.
    pub fn words(words: usize) -> Self {
        Self::default().with_words(words)
    }

    pub fn with_chars(mut self, chars: usize) -> Self {
        self.mode = LimitMode::Chars;
        self.chars = chars;
        self
    }

    pub fn with_words(mut self, words: usize) -> Self {
        self.mode = LimitMode::Words;
        self.words = words;
        self
    }

    pub fn with_html(mut self, html: bool) -> Self {
        self.html = html;
        self
    }

    pub fn with_exceeded_text(mut self, text: impl Into<String>) -> Self {
        self.exceeded_text = Some(text.into());
        self
    }

    pub fn without_exceeded_text(mut self) -> Self {
        self.exceeded_text = None;
        self
    }

    pub fn with_exceeded_link(mut self, url: impl Into<String>) -> Self {
        self.exceeded_link_url = Some(url.into());
        self
    }

    fn budget(&self) -> usize {
        match self.mode {
            LimitMode::Words => self.words,
            LimitMode::Chars => self.chars,
        }
    }

    /// Whether `input` is small enough to be scanned for tags.
    fn html_applies(&self, input: &str) -> bool {
        if !self.html {
            return false;
        }
        match self.mode {
            LimitMode::Words => input.split(' ').count() <= self.max_words_html,
            LimitMode::Chars => char_count(input) <= self.max_chars_html,
        }
    }
}

/// Limits `input` to the word or character budget selected by `config.mode`.
///
/// Never fails. Inputs within budget come back unchanged apart from trimming
/// and, on the plain-text path, tag stripping. When content is cut, trailing
/// whitespace of the kept part is dropped and the exceeded marker appended.
/// A tag head left unfinished by the cut (`<p` without its `>`) is dropped too.
///
/// The HTML-aware path is only taken when `config.html` is set and the input
/// is no larger than `max_words_html`/`max_chars_html`; larger inputs fall back
/// to stripped plain text.
pub fn string_limit(input: &str, config: &LimitConfig) -> String {
    let input = if config.trim { input.trim() } else { input };

    let stripped;
    let segments = if config.html_applies(input) {
        tags::scan(input)
    } else {
        if config.html {
            tracing::debug!(
                mode = ?config.mode,
                "Input too large for tag-aware limiting, stripping markup"
            );
        }
        stripped = strip_tags(input);
        if stripped.is_empty() {
            Vec::new()
        } else {
            vec![Segment::Text(&stripped)]
        }
    };

    let budget = config.budget();
    let (kept, exceeded) = match config.mode {
        LimitMode::Words => limit_words(&segments, budget),
        LimitMode::Chars => limit_chars(&segments, budget),
    };

    if !exceeded {
        return kept.into_owned();
    }

    let kept = drop_partial_markup(kept);
    let mut out = trim_end_cow(kept).into_owned();
    out.push_str(&exceeded_marker(config));
    out
}

/// Limits `input` to `chars` visible characters using otherwise default options.
pub fn char_limit(input: &str, chars: usize) -> String {
    string_limit(input, &LimitConfig::chars(chars))
}

/// Limits `input` to `words` words using otherwise default options.
pub fn word_limit(input: &str, words: usize) -> String {
    string_limit(input, &LimitConfig::words(words))
}

/// Wraps text in paragraph tags, splitting on line breaks.
///
/// An optional character limit is applied first.
///
/// ```
/// use textfmt::limit::paragraphs;
///
/// assert_eq!(paragraphs("one\ntwo", None), "<p>one</p><p>two</p>");
/// ```
pub fn paragraphs(input: &str, char_limit: Option<usize>) -> String {
    let limited = match char_limit {
        Some(chars) => Cow::Owned(string_limit(input, &LimitConfig::chars(chars))),
        None => Cow::Borrowed(input),
    };
    format!("<p>{}</p>", nl2p(&limited))
}

/// Accumulates whole words until the budget is reached.
///
/// Words are separated by single spaces; a tag span is glued to whatever word
/// it touches and never splits it.
fn limit_words<'a>(segments: &[Segment<'a>], budget: usize) -> (Cow<'a, str>, bool) {
    if segments.is_empty() {
        return (Cow::Borrowed(""), false);
    }

    let mut words: Vec<String> = vec![String::new()];
    for segment in segments {
        match segment {
            Segment::Text(text) => {
                let mut parts = text.split(' ');
                if let (Some(first), Some(current)) = (parts.next(), words.last_mut()) {
                    current.push_str(first);
                }
                words.extend(parts.map(str::to_string));
            }
            Segment::Tag(tag) => {
                if let Some(current) = words.last_mut() {
                    current.push_str(tag.raw);
                }
            }
        }
    }

    let exceeded = words.len() > budget;
    let kept = words
        .into_iter()
        .take(budget)
        .collect::<Vec<_>>()
        .join(" ");
    (Cow::Owned(kept), exceeded)
}

/// Accumulates characters until the budget is reached.
///
/// A tag span is taken whole when its visible text still fits; its markup is
/// free. Otherwise limiting stops in front of it.
fn limit_chars<'a>(segments: &[Segment<'a>], budget: usize) -> (Cow<'a, str>, bool) {
    let mut out = String::new();
    let mut used = 0usize;

    for segment in segments {
        match segment {
            Segment::Text(text) => {
                for c in text.chars() {
                    if used == budget {
                        return (Cow::Owned(out), true);
                    }
                    out.push(c);
                    used += 1;
                }
            }
            Segment::Tag(tag) => {
                if used + tag.inner_text_len > budget {
                    return (Cow::Owned(out), true);
                }
                out.push_str(tag.raw);
                used += tag.inner_text_len;
            }
        }
    }
    (Cow::Owned(out), false)
}

/// Cuts a tag head left unfinished at the end of truncated text.
///
/// `"<p>Hello"` cut at two characters keeps `"<p"`; that trailing `<` opens
/// markup but has no `>` after it, so everything from it on is dropped.
fn drop_partial_markup(kept: Cow<'_, str>) -> Cow<'_, str> {
    let Some(at) = kept.rfind('<') else {
        return kept;
    };
    let opens_markup = kept[at + 1..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '/' || c == '!');
    if !opens_markup || kept[at..].contains('>') {
        return kept;
    }
    match kept {
        Cow::Borrowed(s) => Cow::Borrowed(&s[..at]),
        Cow::Owned(mut s) => {
            s.truncate(at);
            Cow::Owned(s)
        }
    }
}

/// Renders the marker appended to cut content.
fn exceeded_marker(config: &LimitConfig) -> String {
    let Some(text) = config.exceeded_text.as_deref().filter(|t| !t.is_empty()) else {
        return String::new();
    };

    // Markup in the exceeded text is trusted as-is.
    let text = if strip_tags(text) == text {
        entities(text)
    } else {
        Cow::Borrowed(text)
    };

    match (&config.exceeded_link_url, &config.exceeded_span_class) {
        (Some(url), _) => {
            let class = if config.exceeded_link_class.is_empty() {
                String::new()
            } else {
                format!(" class=\"{}\"", entities(&config.exceeded_link_class))
            };
            format!(" <a href=\"{}\"{}>{}</a>", entities(url), class, text)
        }
        (None, Some(class)) => format!("<span class=\"{}\">{}</span>", entities(class), text),
        (None, None) => text.into_owned(),
    }
}
