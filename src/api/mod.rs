//! Content API layer.
//!
//! - **[`client`]**: reqwest-backed client for the WordPress REST endpoints.
//! - **[`error`]**: transport error taxonomy shared by every call.
//!
//! [`ContentSource`] is the seam the search controller depends on, so tests
//! can substitute a scripted source for the network.

pub mod client;
pub mod error;

use std::future::Future;

pub use client::{PostQuery, WpClient};
pub use error::ApiError;

use crate::model::types::ContentItem;

/// Posts per page in category listings.
pub const POSTS_PER_PAGE: u32 = 12;

/// Anything that can answer a full-text post search.
pub trait ContentSource: Send + Sync + 'static {
    fn search_posts(
        &self,
        query: &str,
        per_page: usize,
    ) -> impl Future<Output = Result<Vec<ContentItem>, ApiError>> + Send;
}

/// `ceil(total / per_page)`; zero posts means zero pages.
pub fn total_pages(total: u64, per_page: u32) -> u32 {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(u64::from(per_page)) as u32
}
