//! Site routes and their path forms.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Collections,
    /// `/blog/category/<slug>?page=<n>`; `"all"` lists every post.
    Category { slug: String, page: u32 },
    /// `/blog/read/<slug>`
    Post { slug: String },
}

impl Route {
    pub fn all_posts() -> Self {
        Route::Category {
            slug: "all".to_string(),
            page: 1,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Collections => "/collections".to_string(),
            Route::Category { slug, page } => format!("/blog/category/{slug}?page={page}"),
            Route::Post { slug } => format!("/blog/read/{slug}"),
        }
    }

    /// Parse a site path. Category slugs are percent-decoded; a missing or
    /// invalid `page` parameter means page 1.
    pub fn parse(path: &str) -> Option<Self> {
        let (path, query) = path.split_once('?').unwrap_or((path, ""));
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Some(Route::Home),
            ["collections"] => Some(Route::Collections),
            ["blog"] => Some(Route::all_posts()),
            ["blog", "category", slug] => {
                let slug = urlencoding::decode(slug).ok()?.into_owned();
                let page = query
                    .split('&')
                    .filter_map(|kv| kv.split_once('='))
                    .find(|(k, _)| *k == "page")
                    .and_then(|(_, v)| v.parse::<u32>().ok())
                    .filter(|p| *p > 0)
                    .unwrap_or(1);
                Some(Route::Category { slug, page })
            }
            ["blog", "read", slug] => Some(Route::Post {
                slug: (*slug).to_string(),
            }),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
