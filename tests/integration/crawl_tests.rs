//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small mock wiki and run the real HTTP
//! fetcher and SQLite storage against it end-to-end.

use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiki_ripple::config::{Config, UserAgentConfig};
use wiki_ripple::crawler::{run_crawl, Coordinator, HttpFetcher};
use wiki_ripple::storage::{open_storage, SqliteStorage, Storage};
use wiki_ripple::WikiError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a wiki article page
fn article(title: &str, body: &str) -> String {
    format!(
        r#"<html><head><title>{title}</title></head><body>
        <h1 id="firstHeading">{title}</h1>
        <div id="mw-content-text"><div class="mw-parser-output">{body}</div></div>
        </body></html>"#
    )
}

/// Mounts an HTML page that must be requested exactly `times` times
async fn mount_page(server: &MockServer, page_path: &str, html: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .expect(times)
        .mount(server)
        .await;
}

fn create_test_config(server: &MockServer, db_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.crawler.seed_url = format!("{}/wiki/Food", server.uri());
    config.crawler.fetch_timeout_secs = 5;
    config.user_agent = UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
    };
    config.output.database_path = db_dir
        .path()
        .join("crawl.db")
        .to_string_lossy()
        .into_owned();
    config
}

fn create_coordinator(config: &Config) -> Coordinator<HttpFetcher, SqliteStorage> {
    let storage = SqliteStorage::new(std::path::Path::new(&config.output.database_path))
        .expect("Failed to open database");
    let fetcher = HttpFetcher::from_config(
        &config.user_agent,
        Duration::from_secs(config.crawler.fetch_timeout_secs),
    )
    .expect("Failed to build fetcher");

    Coordinator::new(config, fetcher, storage, CancellationToken::new())
        .expect("Failed to create coordinator")
}

/// Food links to Bread and Salt; Bread links back to Food and on to Yeast
///
/// Salt is visited last, so a crawl aborted earlier never requests it.
async fn mount_small_wiki(server: &MockServer, salt_requests: u64) {
    mount_page(
        server,
        "/wiki/Food",
        article(
            "Food",
            r##"<p class="mw-empty-elt"></p>
               <p>Food is any substance consumed.[1]</p>
               <a href="/wiki/Bread">Bread</a>
               <a href="/wiki/Salt">Salt</a>
               <a href="/wiki/Bread">Bread (again)</a>
               <a href="/wiki/Help:Contents">Help</a>
               <a href="#History">History</a>
               <a href="https://external.example/page">External</a>
               <img src="//upload.wiki.test/food.jpg">
               <img src="//upload.wiki.test/Icon_Edit.svg">"##,
        ),
        1,
    )
    .await;

    mount_page(
        server,
        "/wiki/Bread",
        article(
            "Bread",
            r#"<p>Bread is a staple food.</p>
               <a href="/wiki/Food">Food</a>
               <a href="/wiki/Yeast">Yeast</a>"#,
        ),
        1,
    )
    .await;

    mount_page(
        server,
        "/wiki/Salt",
        article("Salt", "<p>Salt is a mineral.</p>"),
        salt_requests,
    )
    .await;
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let mock_server = MockServer::start().await;
    let db_dir = TempDir::new().unwrap();
    let base_url = mock_server.uri();

    mount_small_wiki(&mock_server, 1).await;
    mount_page(
        &mock_server,
        "/wiki/Yeast",
        article("Yeast", "<p>Yeast is a fungus.</p>"),
        1,
    )
    .await;

    let config = create_test_config(&mock_server, &db_dir);
    let mut coordinator = create_coordinator(&config);
    let report = coordinator.run().await.expect("Crawl failed");

    assert_eq!(report.pages_stored, 4);
    assert_eq!(report.edges_stored, 3);
    assert_eq!(report.media_stored, 1);
    assert_eq!(report.external_seen, 1);
    assert_eq!(report.dangling, 0);

    let storage = coordinator.storage();
    let food = storage
        .get_page_by_url(&format!("{}/wiki/Food", base_url))
        .unwrap()
        .expect("Food page should be stored");
    assert_eq!(food.page_title, "Food");
    assert_eq!(food.page_content, "Food is any substance consumed.");

    let links: Vec<String> = storage
        .get_links(food.page_id)
        .unwrap()
        .into_iter()
        .map(|link| link.link)
        .collect();
    assert_eq!(
        links,
        vec![
            format!("{}/wiki/Bread", base_url),
            format!("{}/wiki/Salt", base_url),
        ]
    );

    let media = storage.get_media(food.page_id).unwrap();
    assert_eq!(media.len(), 1);
    assert_eq!(media[0].file_url, "http://upload.wiki.test/food.jpg");

    // Each page was requested exactly once (checked by `expect(1)` on drop).
}

#[tokio::test]
async fn test_crawl_with_depth_limit() {
    let mock_server = MockServer::start().await;
    let db_dir = TempDir::new().unwrap();
    let base_url = mock_server.uri();

    mount_small_wiki(&mock_server, 1).await;
    // Yeast sits at depth 2 and must never be fetched.
    mount_page(
        &mock_server,
        "/wiki/Yeast",
        article("Yeast", "<p>Yeast.</p>"),
        0,
    )
    .await;

    let mut config = create_test_config(&mock_server, &db_dir);
    config.crawler.recursion_limit = 1;

    let mut coordinator = create_coordinator(&config);
    let report = coordinator.run().await.expect("Crawl failed");

    assert_eq!(report.pages_stored, 3);
    assert_eq!(report.dangling, 1);

    let storage = coordinator.storage();
    let bread = storage
        .get_page_by_url(&format!("{}/wiki/Bread", base_url))
        .unwrap()
        .unwrap();
    // The edge is kept even though the target is not fetched.
    let bread_links = storage.get_links(bread.page_id).unwrap();
    assert_eq!(bread_links.len(), 1);
    assert_eq!(bread_links[0].link, format!("{}/wiki/Yeast", base_url));
    assert!(storage
        .get_page_by_url(&format!("{}/wiki/Yeast", base_url))
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_missing_page_aborts_crawl() {
    let mock_server = MockServer::start().await;
    let db_dir = TempDir::new().unwrap();

    mount_small_wiki(&mock_server, 0).await;
    Mock::given(method("GET"))
        .and(path("/wiki/Yeast"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, &db_dir);
    let mut coordinator = create_coordinator(&config);
    let result = coordinator.run().await;

    match result {
        Err(WikiError::Transport { url, status }) => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/wiki/Yeast"));
        }
        other => panic!("Expected transport error, got {:?}", other),
    }

    // Food and Bread were stored before the abort; Salt was never reached.
    assert_eq!(coordinator.storage().count_pages().unwrap(), 2);
}

#[tokio::test]
async fn test_redirect_to_discovered_page_is_stored_once() {
    let mock_server = MockServer::start().await;
    let db_dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/wiki/Food",
        article(
            "Food",
            r#"<p>Food.</p>
               <a href="/wiki/Bread">Bread</a>
               <a href="/wiki/Loaf">Loaf</a>"#,
        ),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/wiki/Bread",
        article("Bread", "<p>Bread.</p>"),
        2,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/wiki/Loaf"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/wiki/Bread"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, &db_dir);
    let mut coordinator = create_coordinator(&config);
    let report = coordinator.run().await.expect("Crawl failed");

    assert_eq!(report.pages_stored, 2);
    assert_eq!(report.redirect_duplicates, 1);
    assert_eq!(coordinator.storage().count_pages().unwrap(), 2);
}

#[tokio::test]
async fn test_malformed_page_is_skipped() {
    let mock_server = MockServer::start().await;
    let db_dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/wiki/Food",
        article(
            "Food",
            r#"<p>Food.</p>
               <a href="/wiki/Broken">Broken</a>
               <a href="/wiki/Salt">Salt</a>"#,
        ),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/wiki/Broken",
        "<html><body><p>No heading, no content region</p></body></html>".to_string(),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/wiki/Salt",
        article("Salt", "<p>Salt.</p>"),
        1,
    )
    .await;

    let config = create_test_config(&mock_server, &db_dir);
    let mut coordinator = create_coordinator(&config);
    let report = coordinator.run().await.expect("Crawl failed");

    assert_eq!(report.pages_stored, 2);
    assert_eq!(report.malformed_skipped, 1);
}

#[tokio::test]
async fn test_slow_page_times_out() {
    let mock_server = MockServer::start().await;
    let db_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/wiki/Food"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(article("Food", "<p>Food.</p>"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server, &db_dir);
    config.crawler.fetch_timeout_secs = 1;

    let mut coordinator = create_coordinator(&config);
    let result = coordinator.run().await;

    assert!(matches!(result, Err(WikiError::Timeout { .. })));
}

#[tokio::test]
async fn test_run_crawl_writes_database() {
    let mock_server = MockServer::start().await;
    let db_dir = TempDir::new().unwrap();

    mount_small_wiki(&mock_server, 1).await;
    mount_page(
        &mock_server,
        "/wiki/Yeast",
        article("Yeast", "<p>Yeast.</p>"),
        1,
    )
    .await;

    let mut config = create_test_config(&mock_server, &db_dir);
    config.crawler.max_concurrent_fetches = 3;

    let report = run_crawl(&config, CancellationToken::new())
        .await
        .expect("Crawl failed");
    assert_eq!(report.pages_stored, 4);

    // A fresh handle on the same file sees the results.
    let storage = open_storage(std::path::Path::new(&config.output.database_path)).unwrap();
    assert_eq!(storage.count_pages().unwrap(), 4);
    assert_eq!(storage.count_links().unwrap(), 3);
    assert_eq!(storage.count_media().unwrap(), 1);
}
