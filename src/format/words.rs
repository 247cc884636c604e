use crate::util::take_chars;

/// Words left lowercase in titles unless they open the title or follow a colon.
const TITLE_SMALL_WORDS: [&str; 8] = ["a", "an", "at", "by", "in", "of", "on", "the"];

const UNCOUNTABLE: [&str; 12] = [
    "data",
    "deer",
    "equipment",
    "feedback",
    "fish",
    "information",
    "money",
    "news",
    "rice",
    "series",
    "sheep",
    "species",
];

const IRREGULAR: [(&str, &str); 10] = [
    ("child", "children"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("man", "men"),
    ("mouse", "mice"),
    ("ox", "oxen"),
    ("person", "people"),
    ("quiz", "quizzes"),
    ("tooth", "teeth"),
    ("woman", "women"),
];

/// Normalises a person's name typed in caps lock or without capitals.
///
/// ```
/// use textfmt::format::name;
///
/// assert_eq!(name("  JOHN "), "John");
/// assert_eq!(name("mcDonald"), "McDonald");
/// ```
pub fn name(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed == trimmed.to_uppercase() {
        upper_first(&trimmed.to_lowercase())
    } else {
        upper_first(trimmed)
    }
}

/// Formats a title: every word capitalised except short joining words.
///
/// ```
/// use textfmt::format::title;
///
/// assert_eq!(title("the lord of the rings"), "The Lord of the Rings");
/// assert_eq!(title("war: the return"), "War: The Return");
/// ```
pub fn title(input: &str) -> String {
    let named = name(input);
    let mut previous_ends_clause = true;
    named
        .split(' ')
        .map(|word| {
            let lower = word.to_lowercase();
            let formatted = if !previous_ends_clause && TITLE_SMALL_WORDS.contains(&lower.as_str()) {
                lower
            } else {
                upper_first(word)
            };
            previous_ends_clause = word.ends_with(':');
            formatted
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// English plural of a singular noun, keeping its capitalisation style.
///
/// ```
/// use textfmt::format::plural;
///
/// assert_eq!(plural("result"), "results");
/// assert_eq!(plural("Category"), "Categories");
/// assert_eq!(plural("box"), "boxes");
/// assert_eq!(plural("person"), "people");
/// ```
pub fn plural(singular: &str) -> String {
    if singular.is_empty() {
        return String::new();
    }

    let lower = singular.to_lowercase();
    let plural = if UNCOUNTABLE.contains(&lower.as_str()) {
        lower.clone()
    } else if let Some((_, irregular)) = IRREGULAR.iter().find(|(s, _)| *s == lower) {
        (*irregular).to_string()
    } else if let Some(stem) = lower.strip_suffix("fe") {
        format!("{}ves", stem)
    } else if let Some(stem) = lower.strip_suffix("lf") {
        format!("{}lves", stem)
    } else if ["s", "x", "z", "ch", "sh"].iter().any(|end| lower.ends_with(end)) {
        format!("{}es", lower)
    } else if lower.ends_with('y') && !ends_with_vowel_y(&lower) {
        format!("{}ies", &lower[..lower.len() - 1])
    } else {
        format!("{}s", lower)
    };

    match_case(singular, &plural)
}

/// Picks the singular or plural form for `count`.
///
/// `plural` overrides the generated plural form.
///
/// ```
/// use textfmt::format::pluralize;
///
/// assert_eq!(pluralize("result", 1, None), "result");
/// assert_eq!(pluralize("result", 0, None), "results");
/// assert_eq!(pluralize("octopus", 2, Some("octopi")), "octopi");
/// ```
pub fn pluralize(singular: &str, count: i64, plural_form: Option<&str>) -> String {
    if count == 1 {
        return singular.to_string();
    }
    match plural_form {
        Some(p) => p.to_string(),
        None => plural(singular),
    }
}

/// Replaces `:item` with the pluralized noun and `:number` with `count`.
///
/// ```
/// use textfmt::format::pluralize_message;
///
/// assert_eq!(
///     pluralize_message("Found :number :item.", "result", 3, None),
///     "Found 3 results."
/// );
/// ```
pub fn pluralize_message(message: &str, singular: &str, count: i64, plural_form: Option<&str>) -> String {
    let item = pluralize(singular, count, plural_form);
    message
        .replace(":item", &item)
        .replace(":number", &count.to_string())
}

/// Prefixes `item` with "a" or "an".
///
/// Acronyms go by letter sound ("an FBI agent", "a URL"), everything else by
/// its first letter.
///
/// ```
/// use textfmt::format::with_article;
///
/// assert_eq!(with_article("apple"), "an apple");
/// assert_eq!(with_article("banana"), "a banana");
/// assert_eq!(with_article("FBI agent"), "an FBI agent");
/// assert_eq!(with_article("URL"), "a URL");
/// ```
pub fn with_article(item: &str) -> String {
    let Some(first) = item.chars().next().map(|c| c.to_ascii_lowercase()) else {
        return String::new();
    };

    let an = if looks_like_acronym(item) {
        "aefhilmnorsx".contains(first)
    } else {
        "aeiou".contains(first)
    };

    format!("{} {}", if an { "an" } else { "a" }, item)
}

/// Lowercases text unless it looks like an acronym.
pub fn lower_unless_acronym(text: &str) -> String {
    if looks_like_acronym(text) {
        text.to_string()
    } else {
        text.to_lowercase()
    }
}

/// Adds an ordinal suffix: `1st`, `2nd`, `3rd`, `4th`, `11th`, `21st`.
///
/// ```
/// use textfmt::format::number_suffix;
///
/// assert_eq!(number_suffix(22, false), "22nd");
/// assert_eq!(number_suffix(113, false), "113th");
/// assert_eq!(number_suffix(1, true), "1<sup>st</sup>");
/// ```
pub fn number_suffix(number: u64, superscript: bool) -> String {
    let suffix = match (number % 100, number % 10) {
        (11..=13, _) => "th",
        (_, 1) => "st",
        (_, 2) => "nd",
        (_, 3) => "rd",
        _ => "th",
    };

    if superscript {
        format!("{}<sup>{}</sup>", number, suffix)
    } else {
        format!("{}{}", number, suffix)
    }
}

/// Turns a boolean into one of two labels given as `"Yes/No"`.
///
/// A single label (`"Active"`) yields an empty string for `false`.
///
/// ```
/// use textfmt::format::bool_to_str;
///
/// assert_eq!(bool_to_str(true, "On/Off"), "On");
/// assert_eq!(bool_to_str(false, "On/Off"), "Off");
/// assert_eq!(bool_to_str(false, "Active"), "");
/// ```
pub fn bool_to_str(value: bool, options: &str) -> &str {
    let mut labels = options.splitn(2, '/');
    let yes = labels.next().unwrap_or("");
    let no = labels.next().unwrap_or("");
    if value {
        yes
    } else {
        no
    }
}

/// Keys whose flag is set, in order, without duplicates.
pub fn selected<K, I>(items: I) -> Vec<K>
where
    K: PartialEq,
    I: IntoIterator<Item = (K, bool)>,
{
    let mut out: Vec<K> = Vec::new();
    for (key, flag) in items {
        if flag && !out.contains(&key) {
            out.push(key);
        }
    }
    out
}

/// Joins items with `delimiter`, dropping empty and repeated entries.
pub fn list_to_string<S: AsRef<str>>(items: &[S], delimiter: &str) -> String {
    dedup_non_empty(items).join(delimiter)
}

/// Renders items as an HTML list, dropping empty and repeated entries.
///
/// Returns an empty string when nothing is left.
pub fn list_to_html<S: AsRef<str>>(items: &[S], ordered: bool) -> String {
    let items = dedup_non_empty(items);
    if items.is_empty() {
        return String::new();
    }

    let tag = if ordered { "ol" } else { "ul" };
    let mut html = format!("<{}>\n", tag);
    for item in items {
        html.push_str(&format!("<li>{}</li>\n", item));
    }
    html.push_str(&format!("</{}>\n", tag));
    html
}

/// Builds a URI slug: lowercase ASCII letters and digits joined by `-`.
///
/// Common Latin accents are folded (`é` → `e`), punctuation and whitespace
/// become separators, other characters are dropped. With `char_limit`, the
/// slug is cut and a dangling `-` removed.
///
/// ```
/// use textfmt::format::slug;
///
/// assert_eq!(slug("Hello, World!", None), "hello-world");
/// assert_eq!(slug("Crème brûlée recipes", Some(10)), "creme-brul");
/// assert_eq!(slug("one two three", Some(8)), "one-two");
/// ```
pub fn slug(input: &str, char_limit: Option<usize>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_separator = false;

    for c in input.trim().chars() {
        let folded = if c.is_ascii_alphanumeric() {
            Some(FoldedChar::Ascii(c.to_ascii_lowercase()))
        } else {
            fold_latin(c).map(FoldedChar::Str)
        };

        match folded {
            Some(piece) => {
                if pending_separator && !out.is_empty() {
                    out.push('-');
                }
                pending_separator = false;
                match piece {
                    FoldedChar::Ascii(a) => out.push(a),
                    FoldedChar::Str(s) => out.push_str(s),
                }
            }
            None if c.is_whitespace() || c.is_ascii_punctuation() => pending_separator = true,
            None => {}
        }
    }

    match char_limit {
        Some(limit) => take_chars(&out, limit).trim_end_matches('-').to_string(),
        None => out,
    }
}

enum FoldedChar {
    Ascii(char),
    Str(&'static str),
}

fn fold_latin(c: char) -> Option<&'static str> {
    let lower = c.to_lowercase().next()?;
    let folded = match lower {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'æ' => "ae",
        'ç' => "c",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'œ' => "oe",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        'ß' => "ss",
        _ => return None,
    };
    Some(folded)
}

fn dedup_non_empty<S: AsRef<str>>(items: &[S]) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::new();
    for item in items.iter().map(AsRef::as_ref) {
        if !item.is_empty() && !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

fn looks_like_acronym(text: &str) -> bool {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(a), Some(b)) => a.is_uppercase() && (b.is_uppercase() || b.is_ascii_digit()),
        _ => false,
    }
}

fn ends_with_vowel_y(lower: &str) -> bool {
    let mut rev = lower.chars().rev();
    rev.next();
    rev.next().is_some_and(|c| "aeiou".contains(c))
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Applies the capitalisation style of `model` to `word`.
fn match_case(model: &str, word: &str) -> String {
    if model.chars().count() > 1 && model == model.to_uppercase() {
        word.to_uppercase()
    } else if model.starts_with(char::is_uppercase) {
        upper_first(word)
    } else {
        word.to_string()
    }
}
