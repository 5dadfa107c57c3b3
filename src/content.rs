//! Plain-text helpers for rendered WordPress markup.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static TRAILING_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+\S*$").expect("valid trailing word regex"));

/// Entities WordPress commonly emits in titles and excerpts, applied in order.
const HTML_ENTITIES: [(&str, &str); 8] = [
    ("&nbsp;", " "),
    ("&#8217;", "'"),
    ("&#8220;", "\""),
    ("&#8221;", "\""),
    ("&quot;", "\""),
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
];

pub const WORDS_PER_MINUTE: usize = 200;

pub fn decode_html_entities(text: &str) -> String {
    HTML_ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, ch)| acc.replace(entity, ch))
}

pub fn strip_html(html: &str) -> String {
    TAG_RE.replace_all(html, "").into_owned()
}

/// Decode entities first, then drop tags, so encoded markup never survives.
pub fn plain_text(markup: &str) -> String {
    strip_html(&decode_html_entities(markup))
}

/// `"N minutes read"`; blank content reads as `"0 minute read"`.
pub fn reading_time(content: &str, words_per_minute: usize) -> String {
    if content.trim().is_empty() {
        return "0 minute read".to_string();
    }
    let words = strip_html(content).split_whitespace().count();
    let minutes = words.div_ceil(words_per_minute.max(1));
    let plural = if minutes == 1 { "" } else { "s" };
    format!("{minutes} minute{plural} read")
}

/// Summary text capped at `max_len` characters, cut back to a word boundary.
pub fn meta_description(markup: &str, max_len: usize) -> String {
    let cleaned = strip_html(markup)
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#039;", "'");
    let trimmed = cleaned.trim();
    if trimmed.chars().count() <= max_len {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(max_len).collect();
    format!("{}...", TRAILING_WORD_RE.replace(&cut, ""))
}

/// `2025-01-05T10:00:00` → `January 5, 2025`. Unparseable input is echoed.
pub fn format_date(raw: &str) -> String {
    let date = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .map(|dt| dt.date())
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));
    match date {
        Ok(d) => d.format("%B %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Category heading from a slug: capitalized, first `-` turned into a space.
pub fn category_display_name(slug: &str) -> String {
    let mut chars = slug.chars();
    match chars.next() {
        Some(first) => format!(
            "{}{}",
            first.to_uppercase(),
            chars.as_str().replacen('-', " ", 1)
        ),
        None => String::new(),
    }
}

/// Collection label: every `-` becomes a space.
pub fn collection_label(name: &str) -> String {
    name.replace('-', " ")
}
