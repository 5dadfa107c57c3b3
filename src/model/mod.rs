//! Content model shared by the API client, search, and UI layers.

pub mod types;

pub use types::{Category, ContentItem, PostPage, Tag};
