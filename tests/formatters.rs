//! Integration tests for the leaf formatters driven by a loaded config.

use pretty_assertions::assert_eq;
use std::path::Path;
use textfmt::config::Config;
use textfmt::format::{
    bool_to_str, format_date, list_to_string, money, number_suffix, parse_date, phone,
    pluralize_message, postal_code, relative_interval_str, slug, title, with_article,
    NegativeStyle,
};
use textfmt::limit::paragraphs;
use textfmt::util::{email_link, entities};

fn load(content: &str, name: &str) -> Config {
    let dir = std::env::temp_dir().join(format!("textfmt_formatters_{}", name));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.toml");
    std::fs::write(&path, content).unwrap();
    let config = Config::load(&path).unwrap();
    std::fs::remove_dir_all(&dir).ok();
    config
}

#[test]
fn test_invoice_line_with_configured_formats() {
    let config = load(
        r#"
date_format = "%d/%m/%Y"
bool_to_str = "Paid/Unpaid"

[money]
prefix = "CA$"
negative = "brackets"
"#,
        "invoice",
    );

    assert_eq!(config.money.negative, NegativeStyle::Brackets);
    let line = format!(
        "{} | {} | {}",
        format_date("2024-07-01 09:15:00", &config.date_format).unwrap(),
        money("-2,500.5", &config.money),
        bool_to_str(false, &config.bool_to_str)
    );
    assert_eq!(line, "01/07/2024 | (CA$2,500.50) | Unpaid");
}

#[test]
fn test_contact_card_with_eleven_digit_phones() {
    let config = load("[phone]\ndigits = 11\narea_code_brackets = false\n", "contact");

    assert_eq!(
        phone("(403) 555-0199 ext. 12", &config.phone).as_deref(),
        Some("1-403-555-0199 x 12")
    );
    assert_eq!(postal_code("t2p1j9", true).as_deref(), Some("T2P 1J9"));
    assert_eq!(
        email_link("info@example.com", None).as_deref(),
        Some("<a href=\"mailto:info@example.com\" class=\"email\">info@example.com</a>")
    );
}

#[test]
fn test_default_datetime_format() {
    let config = Config::load(Path::new("/tmp/textfmt_no_such_config.toml")).unwrap();
    assert_eq!(
        format_date("2024-12-25 18:05:00", &config.datetime_format).as_deref(),
        Some("December 25, 2024 at 6:05pm")
    );
}

#[test]
fn test_activity_feed_wording() {
    let now = parse_date("2024-05-15 12:00:00").unwrap();
    let posted = parse_date("2024-05-13 08:00:00").unwrap();
    let due = parse_date("2024-05-15 17:00:00").unwrap();

    assert_eq!(relative_interval_str(posted, now), "2 days ago");
    assert_eq!(relative_interval_str(due, now), "for 5 more hours");
    assert_eq!(
        pluralize_message("You have :number :item", "new comment", 3, None),
        "You have 3 new comments"
    );
    assert_eq!(number_suffix(23, false), "23rd");
}

#[test]
fn test_headline_helpers() {
    assert_eq!(title("the rise of the machines"), "The Rise of the Machines");
    assert_eq!(slug("The Rise of the Machines", Some(12)), "the-rise-of");
    assert_eq!(with_article("HTML page"), "an HTML page");
    assert_eq!(list_to_string(&["Rust", "Go", "Rust"], ", "), "Rust, Go");
}

#[test]
fn test_paragraph_body_is_safe_to_embed() {
    let body = entities("Fish & chips\n\nMushy <peas>");
    assert_eq!(
        paragraphs(&body, None),
        "<p>Fish &amp; chips</p><p>Mushy &lt;peas&gt;</p>"
    );
}
