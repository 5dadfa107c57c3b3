//! Binary smoke tests. Every run gets an explicit, empty config file and a
//! scrubbed environment so the host's settings never leak in.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

mod util;
use util::{StubResponse, StubServer, wp_post};

fn cmd(tmp: &TempDir) -> Command {
    let config = tmp.path().join("config.toml");
    std::fs::write(&config, "timeout_ms = 5000\n").unwrap();
    let mut cmd = cargo_bin_cmd!("blog-search");
    cmd.current_dir(tmp.path())
        .env_remove("BLOG_SEARCH_API")
        .env_remove("NEXT_PUBLIC_WORDPRESS_API")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .arg("--config")
        .arg(config);
    cmd
}

#[test]
fn help_lists_commands() {
    let tmp = TempDir::new().unwrap();
    cmd(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("collections"));
}

#[test]
fn tui_headless_once_without_api() {
    let tmp = TempDir::new().unwrap();
    let data_dir = tmp.path().join("data");
    cmd(&tmp)
        .arg("tui")
        .arg("--once")
        .arg("--data-dir")
        .arg(&data_dir)
        .env("TUI_HEADLESS", "1")
        .assert()
        .success();
    assert!(data_dir.join("logs").join("blog-search.log").exists());
}

#[test]
fn search_json_against_stub() {
    let server = StubServer::start(vec![StubResponse::json(json!([wp_post(
        1,
        "learning-rust",
        "Learning Rust",
        "All about rust"
    )]))]);
    let tmp = TempDir::new().unwrap();
    let out = cmd(&tmp)
        .args(["search", "rust", "--json", "--api", &server.base])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let body: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["hits"][0]["slug"], "learning-rust");
    assert_eq!(body["hits"][0]["title"][1]["text"], "Rust");
    assert_eq!(body["hits"][0]["title"][1]["highlighted"], true);
    assert!(server.requests()[0].contains("search=rust&per_page=5"));
}

#[test]
fn search_text_reports_nothing_found() {
    let server = StubServer::start(vec![StubResponse::json(json!([]))]);
    let tmp = TempDir::new().unwrap();
    cmd(&tmp)
        .args(["search", "zzz", "--api", &server.base])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Nothing found for \"zzz\". Please try again.",
        ))
        .stderr(predicate::str::contains("BLOG_SEARCH_API is not set").not());
}

#[test]
fn search_short_query_is_not_sent() {
    let tmp = TempDir::new().unwrap();
    cmd(&tmp)
        .args(["search", "r"])
        .assert()
        .success()
        .stderr(predicate::str::contains("at least 2 characters"));
}

#[test]
fn search_failure_exits_nonzero() {
    let server = StubServer::start(vec![StubResponse::status(500)]);
    let tmp = TempDir::new().unwrap();
    cmd(&tmp)
        .args(["search", "rust", "--api", &server.base])
        .assert()
        .failure()
        .stderr(predicate::str::contains("An error occurred while searching"));
}

#[test]
fn collections_without_api_is_empty() {
    let tmp = TempDir::new().unwrap();
    cmd(&tmp)
        .args(["collections", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"))
        .stderr(predicate::str::contains("BLOG_SEARCH_API is not set"));
}
