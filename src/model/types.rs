//! Normalized entity structs for content served by the WordPress REST API.

use serde::{Deserialize, Serialize};

/// A single post as consumed by the search and page views.
///
/// `title`, `excerpt` and `content` hold the rendered markup exactly as the
/// API returned it; callers strip and decode before display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "WpPost")]
pub struct ContentItem {
    pub id: u64,
    pub title: String,
    pub excerpt: String,
    pub slug: String,
    /// Publish date as sent by the API (`2025-01-05T10:00:00`).
    pub date: Option<String>,
    /// Name of the first embedded category term, when `_embed` was requested.
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ContentItem {
    /// Path of the detail page for this post.
    pub fn read_path(&self) -> String {
        format!("/blog/read/{}", self.slug)
    }
}

/// Wire shape of a `wp/v2/posts` entry (minimal fields).
#[derive(Debug, Deserialize)]
struct WpPost {
    #[serde(default)]
    id: u64,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    slug: String,
    #[serde(default, deserialize_with = "rendered_or_plain")]
    title: Option<String>,
    #[serde(default, deserialize_with = "rendered_or_plain")]
    excerpt: Option<String>,
    #[serde(default, deserialize_with = "rendered_or_plain")]
    content: Option<String>,
    #[serde(default, rename = "_embedded")]
    embedded: Option<Embedded>,
    /// Flat form produced by our own `Serialize` impl.
    #[serde(default)]
    category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Embedded {
    #[serde(default, rename = "wp:term")]
    terms: Vec<Vec<Term>>,
}

#[derive(Debug, Deserialize)]
struct Term {
    name: String,
}

/// WordPress wraps markup fields as `{"rendered": "..."}`; our own JSON
/// output writes them flat. Accept both.
fn rendered_or_plain<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Field {
        Rendered { rendered: String },
        Plain(String),
    }

    Ok(Option::<Field>::deserialize(deserializer)?.map(|f| match f {
        Field::Rendered { rendered } => rendered,
        Field::Plain(s) => s,
    }))
}

impl From<WpPost> for ContentItem {
    fn from(raw: WpPost) -> Self {
        let category = raw
            .embedded
            .and_then(|e| e.terms.into_iter().next())
            .and_then(|group| group.into_iter().next())
            .map(|term| term.name)
            .or(raw.category);
        Self {
            id: raw.id,
            title: raw.title.unwrap_or_default(),
            excerpt: raw.excerpt.unwrap_or_default(),
            slug: raw.slug,
            date: raw.date,
            category,
            content: raw.content,
        }
    }
}

/// A `wp/v2/categories` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: u64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub count: u64,
}

/// A `wp/v2/tags` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub id: u64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub count: u64,
}

/// One page of a paginated post listing.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PostPage {
    pub posts: Vec<ContentItem>,
    pub total_pages: u32,
}
