//! Query highlighting over plain text.
//!
//! Source titles and excerpts are markup. They are decoded and stripped
//! first ([`crate::content::plain_text`]) so the query is only ever matched
//! against visible text.

use regex::RegexBuilder;

use crate::content::plain_text;

/// Excerpts longer than this many characters are cut and suffixed with `...`.
pub const EXCERPT_CHARS: usize = 100;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub highlighted: bool,
}

impl Segment {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            highlighted: false,
        }
    }

    fn marked(text: &str) -> Self {
        Self {
            text: text.to_string(),
            highlighted: true,
        }
    }
}

/// Split `text` around every case-insensitive occurrence of `query`.
///
/// Matched segments keep the casing of `text`. An empty query yields the whole
/// text as one plain segment. Empty segments are never emitted.
pub fn highlight(text: &str, query: &str) -> Vec<Segment> {
    if query.is_empty() {
        return vec![Segment::plain(text)];
    }
    let Ok(re) = RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    else {
        return vec![Segment::plain(text)];
    };

    // The regex folds case more loosely than lowercasing does (`ſ` matches
    // `s`); only matches that lowercase to the query are marked.
    let needle = query.to_lowercase();
    let mut segments = Vec::new();
    let mut last = 0;
    for m in re.find_iter(text) {
        if m.as_str().to_lowercase() != needle {
            continue;
        }
        if m.start() > last {
            segments.push(Segment::plain(&text[last..m.start()]));
        }
        segments.push(Segment::marked(m.as_str()));
        last = m.end();
    }
    if last < text.len() || segments.is_empty() {
        segments.push(Segment::plain(&text[last..]));
    }
    segments
}

/// First [`EXCERPT_CHARS`] characters plus `...` when the text is longer.
pub fn truncate_excerpt(text: &str) -> String {
    match text.char_indices().nth(EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

pub fn clean_title(markup: &str) -> String {
    plain_text(markup)
}

pub fn clean_excerpt(markup: &str) -> String {
    truncate_excerpt(&plain_text(markup))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(segments: &[Segment]) -> Vec<(&str, bool)> {
        segments
            .iter()
            .map(|s| (s.text.as_str(), s.highlighted))
            .collect()
    }

    #[test]
    fn highlights_case_insensitively_preserving_case() {
        let segs = highlight("Hello World", "wor");
        assert_eq!(
            texts(&segs),
            vec![("Hello ", false), ("Wor", true), ("ld", false)]
        );
    }

    #[test]
    fn every_occurrence_is_marked() {
        let segs = highlight("Rust, rust and RUST", "rust");
        assert_eq!(
            texts(&segs),
            vec![
                ("Rust", true),
                (", ", false),
                ("rust", true),
                (" and ", false),
                ("RUST", true)
            ]
        );
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let segs = highlight("Is a+b (c)? yes", "a+b (c)?");
        assert_eq!(
            texts(&segs),
            vec![("Is ", false), ("a+b (c)?", true), (" yes", false)]
        );
        assert_eq!(texts(&highlight("a.c abc", ".")), vec![("a", false), (".", true), ("c abc", false)]);
    }

    #[test]
    fn loose_case_folds_are_not_marked() {
        assert_eq!(texts(&highlight("poſt", "s")), vec![("poſt", false)]);
        assert_eq!(
            texts(&highlight("poſt post", "s")),
            vec![("poſt po", false), ("s", true), ("t", false)]
        );
    }

    #[test]
    fn empty_query_disables_highlighting() {
        assert_eq!(texts(&highlight("Hello", "")), vec![("Hello", false)]);
        assert_eq!(texts(&highlight("", "x")), vec![("", false)]);
    }

    #[test]
    fn excerpt_truncation_boundary() {
        let long = "a".repeat(150);
        let out = truncate_excerpt(&long);
        assert_eq!(out, format!("{}...", "a".repeat(100)));

        let short = "b".repeat(80);
        assert_eq!(truncate_excerpt(&short), short);

        let exact = "c".repeat(100);
        assert_eq!(truncate_excerpt(&exact), exact);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "é".repeat(120);
        let out = truncate_excerpt(&text);
        assert_eq!(out.chars().count(), 103);
    }

    #[test]
    fn markup_never_matches() {
        let title = clean_title("<strong class=\"wor\">Hello</strong> World");
        assert_eq!(title, "Hello World");
        let segs = highlight(&title, "strong");
        assert_eq!(texts(&segs), vec![("Hello World", false)]);
    }

    #[test]
    fn excerpt_is_cleaned_before_truncation() {
        let markup = format!("<p>{}</p>", "x".repeat(99));
        assert_eq!(clean_excerpt(&markup), "x".repeat(99));
    }
}
