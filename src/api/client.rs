//! HTTP client for the WordPress `wp/v2` REST API.
//!
//! One [`WpClient`] is built at startup from [`AppConfig`] and shared by
//! reference (`Arc`) with the search controller and the page loaders.

use std::time::Duration;

use reqwest::header::{CACHE_CONTROL, HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::error::ApiError;
use super::{ContentSource, POSTS_PER_PAGE, total_pages};
use crate::config::AppConfig;
use crate::model::types::{Category, ContentItem, PostPage, Tag};

/// Header carrying the total number of matching posts.
pub const TOTAL_HEADER: &str = "x-wp-total";

/// Page size used for "fetch everything" listings (posts, categories, tags).
const LIST_PER_PAGE: u32 = 100;

/// Query parameters for `GET /posts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    pub per_page: u32,
    pub page: Option<u32>,
    pub categories: Option<u64>,
    pub slug: Option<String>,
    pub search: Option<String>,
    pub embed: bool,
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            per_page: LIST_PER_PAGE,
            page: None,
            categories: None,
            slug: None,
            search: None,
            embed: true,
        }
    }
}

impl PostQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        params.push(("per_page", self.per_page.to_string()));
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(id) = self.categories {
            params.push(("categories", id.to_string()));
        }
        if let Some(slug) = &self.slug {
            params.push(("slug", slug.clone()));
        }
        if self.embed {
            params.push(("_embed", "true".to_string()));
        }
        params
    }
}

pub struct WpClient {
    http: Client,
    base: Option<String>,
}

impl WpClient {
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        Self::with_base(config.api_base.as_deref(), config.timeout())
    }

    pub fn with_base(base: Option<&str>, timeout: Duration) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        let http = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .user_agent(concat!("blog-search/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Client)?;
        let base = base
            .map(|b| b.trim().trim_end_matches('/').to_string())
            .filter(|b| !b.is_empty());
        if base.is_none() {
            warn!("content API URL not configured");
        }
        Ok(Self { http, base })
    }

    pub fn is_configured(&self) -> bool {
        self.base.is_some()
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base.as_deref()
    }

    fn endpoint(&self, path: &str) -> Result<String, ApiError> {
        let base = self.base.as_deref().ok_or(ApiError::NotConfigured)?;
        Ok(format!("{base}/{}", path.trim_start_matches('/')))
    }

    async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<(String, Response), ApiError> {
        let url = self.endpoint(path)?;
        debug!(url = %url, params = ?params, "content_api_request");
        let response = self
            .http
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { url, status });
        }
        Ok((url, response))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<(T, HeaderMap), ApiError> {
        let (url, response) = self.get(path, params).await?;
        let headers = response.headers().clone();
        let body = response
            .json::<T>()
            .await
            .map_err(|source| ApiError::Decode { url, source })?;
        Ok((body, headers))
    }

    /// `GET /posts?search=<query>&per_page=<n>`
    pub async fn search_posts(&self, query: &str, per_page: usize) -> Result<Vec<ContentItem>, ApiError> {
        info!(query = query, per_page = per_page, "search_start");
        let params = [
            ("search", query.to_string()),
            ("per_page", per_page.to_string()),
        ];
        let (posts, _) = self.get_json::<Vec<ContentItem>>("posts", &params).await?;
        info!(query = query, hits = posts.len(), "search_done");
        Ok(posts)
    }

    /// Post listing. An unconfigured client yields an empty list.
    pub async fn get_posts(&self, query: &PostQuery) -> Result<Vec<ContentItem>, ApiError> {
        Ok(self.get_posts_page(query).await?.0)
    }

    /// Post listing together with the `x-wp-total` count.
    async fn get_posts_page(&self, query: &PostQuery) -> Result<(Vec<ContentItem>, u64), ApiError> {
        if !self.is_configured() {
            return Ok((Vec::new(), 0));
        }
        let (posts, headers) = self
            .get_json::<Vec<ContentItem>>("posts", &query.params())
            .await?;
        Ok((posts, parse_total(&headers)))
    }

    pub async fn get_post_by_slug(&self, slug: &str) -> Result<Option<ContentItem>, ApiError> {
        let query = PostQuery {
            slug: Some(slug.to_string()),
            ..PostQuery::default()
        };
        Ok(self.get_posts(&query).await?.into_iter().next())
    }

    pub async fn get_categories(&self) -> Result<Vec<Category>, ApiError> {
        if !self.is_configured() {
            return Ok(Vec::new());
        }
        let params = [("per_page", LIST_PER_PAGE.to_string())];
        Ok(self.get_json("categories", &params).await?.0)
    }

    pub async fn get_tags(&self) -> Result<Vec<Tag>, ApiError> {
        if !self.is_configured() {
            return Ok(Vec::new());
        }
        let params = [("per_page", LIST_PER_PAGE.to_string())];
        Ok(self.get_json("tags", &params).await?.0)
    }

    /// Resolve a category id from its slug.
    pub async fn category_id(&self, slug: &str) -> Result<Option<u64>, ApiError> {
        Ok(self
            .get_categories()
            .await?
            .into_iter()
            .find(|c| c.slug == slug)
            .map(|c| c.id))
    }

    /// One page of a category listing, [`POSTS_PER_PAGE`] posts per page.
    ///
    /// `"all"` lists every post; an unknown slug yields an empty single page.
    pub async fn posts_by_category(&self, slug: &str, page: u32) -> Result<PostPage, ApiError> {
        let categories = if slug == "all" {
            None
        } else {
            match self.category_id(slug).await? {
                Some(id) => Some(id),
                None => {
                    debug!(slug = slug, "unknown category");
                    return Ok(PostPage {
                        posts: Vec::new(),
                        total_pages: 1,
                    });
                }
            }
        };
        let query = PostQuery {
            per_page: POSTS_PER_PAGE,
            page: Some(page.max(1)),
            categories,
            ..PostQuery::default()
        };
        let (posts, total) = self.get_posts_page(&query).await?;
        Ok(PostPage {
            posts,
            total_pages: total_pages(total, POSTS_PER_PAGE),
        })
    }
}

impl ContentSource for WpClient {
    async fn search_posts(&self, query: &str, per_page: usize) -> Result<Vec<ContentItem>, ApiError> {
        WpClient::search_posts(self, query, per_page).await
    }
}

/// Value of `x-wp-total`; missing or malformed headers count as zero.
pub fn parse_total(headers: &HeaderMap) -> u64 {
    headers
        .get(TOTAL_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(0)
}
