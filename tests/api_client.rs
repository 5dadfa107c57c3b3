//! Content API client against a loopback stub server.

use std::time::Duration;

use blog_search::api::{ApiError, PostQuery, WpClient};
use serde_json::json;

mod util;
use util::{StubResponse, StubServer, TestTracing, wp_post};

fn client(server: &StubServer) -> WpClient {
    WpClient::with_base(Some(&server.base), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn search_sends_query_and_limit() {
    let server = StubServer::start(vec![StubResponse::json(json!([
        wp_post(1, "learning-rust", "Learning Rust", "Ownership &amp; borrowing"),
        wp_post(2, "rust-async", "Async Rust", "Futures"),
    ]))]);
    let tracing = TestTracing::new();
    let _guard = tracing.install();

    let posts = client(&server).search_posts("rust", 5).await.unwrap();

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].slug, "learning-rust");
    assert_eq!(posts[0].title, "Learning Rust");
    assert_eq!(posts[0].category.as_deref(), Some("Programming"));
    assert_eq!(posts[0].date.as_deref(), Some("2025-01-05T10:00:00"));

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert!(
        requests[0].starts_with("GET /wp-json/wp/v2/posts?search=rust&per_page=5 "),
        "unexpected request line: {}",
        requests[0]
    );
    tracing.assert_contains("search_done");
}

#[tokio::test]
async fn search_query_is_url_encoded() {
    let server = StubServer::start(vec![StubResponse::json(json!([]))]);
    let posts = client(&server).search_posts("rust & c++", 5).await.unwrap();
    assert!(posts.is_empty());
    let line = &server.requests()[0];
    assert!(line.contains("search=rust+%26+c%2B%2B"), "{line}");
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = StubServer::start(vec![StubResponse::status(500)]);
    let err = client(&server).search_posts("rust", 5).await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(500));
    assert!(matches!(err, ApiError::Status { .. }));
    assert!(err.to_string().contains("failed with status code 500"));
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let mut resp = StubResponse::status(200);
    resp.body = "not json".into();
    let server = StubServer::start(vec![resp]);
    let err = client(&server).search_posts("rust", 5).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }), "{err:?}");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Bind then drop to get a port nobody listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let base = format!("http://127.0.0.1:{port}/wp-json/wp/v2");
    let client = WpClient::with_base(Some(&base), Duration::from_secs(2)).unwrap();
    let err = client.search_posts("rust", 5).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport { .. }), "{err:?}");
}

#[tokio::test]
async fn unconfigured_client() {
    let client = WpClient::with_base(None, Duration::from_secs(1)).unwrap();
    assert!(!client.is_configured());
    assert!(client.get_posts(&PostQuery::default()).await.unwrap().is_empty());
    assert!(client.get_categories().await.unwrap().is_empty());
    assert!(matches!(
        client.search_posts("rust", 5).await,
        Err(ApiError::NotConfigured)
    ));
}

#[tokio::test]
async fn category_listing_resolves_slug_and_paginates() {
    let server = StubServer::start(vec![
        StubResponse::json(json!([
            { "id": 3, "name": "News", "slug": "news", "count": 1 },
            { "id": 7, "name": "Rust", "slug": "rust", "count": 25 }
        ])),
        StubResponse::json(json!([wp_post(9, "p9", "Nine", "")])).header("X-WP-Total", 25),
    ]);

    let page = client(&server).posts_by_category("rust", 2).await.unwrap();
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.posts.len(), 1);

    let requests = server.requests();
    assert!(requests[0].contains("/categories?per_page=100"), "{}", requests[0]);
    assert!(requests[1].contains("per_page=12"), "{}", requests[1]);
    assert!(requests[1].contains("&page=2"), "{}", requests[1]);
    assert!(requests[1].contains("categories=7"), "{}", requests[1]);
    assert!(requests[1].contains("_embed"), "{}", requests[1]);
}

#[tokio::test]
async fn unknown_category_is_an_empty_single_page() {
    let server = StubServer::start(vec![StubResponse::json(json!([
        { "id": 3, "name": "News", "slug": "news", "count": 1 }
    ]))]);
    let page = client(&server).posts_by_category("nope", 1).await.unwrap();
    assert!(page.posts.is_empty());
    assert_eq!(page.total_pages, 1);
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn all_category_skips_lookup() {
    let server = StubServer::start(vec![
        StubResponse::json(json!([])).header("X-WP-Total", 0),
    ]);
    let page = client(&server).posts_by_category("all", 1).await.unwrap();
    assert_eq!(page.total_pages, 0);
    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].contains("categories="), "{}", requests[0]);
}

#[tokio::test]
async fn post_by_slug_takes_first_match() {
    let server = StubServer::start(vec![StubResponse::json(json!([wp_post(
        4,
        "hello",
        "Hello",
        "Hi"
    )]))]);
    let post = client(&server).get_post_by_slug("hello").await.unwrap();
    assert_eq!(post.map(|p| p.id), Some(4));
    assert!(server.requests()[0].contains("slug=hello"));

    let server = StubServer::start(vec![StubResponse::json(json!([]))]);
    assert!(client(&server).get_post_by_slug("gone").await.unwrap().is_none());
}

#[tokio::test]
async fn tags_are_listed_with_counts() {
    let server = StubServer::start(vec![StubResponse::json(json!([
        { "id": 1, "name": "async", "slug": "async", "count": 4 },
        { "id": 2, "name": "ffi", "slug": "ffi" }
    ]))]);
    let tags = client(&server).get_tags().await.unwrap();
    assert_eq!(tags.len(), 2);
    assert_eq!(tags[0].count, 4);
    assert_eq!(tags[1].count, 0);
    assert!(server.requests()[0].contains("/tags?per_page=100"));
}
