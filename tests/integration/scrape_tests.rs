//! Full scrape cycle against a mock server

use crate::{create_test_config, CATALOG_PAGE, DOCUMENT_PAGE, QUOTES_PAGE};
use serde_json::{json, Value};
use site_harvest::config::{parse_config, ExecutionMode};
use site_harvest::harvest::{harvest, Orchestrator};
use site_harvest::model::{Payload, Source, SourceKind};
use site_harvest::ErrorKind;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Shared in-memory log sink for a test subscriber
#[derive(Clone, Default)]
struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

async fn mount_html(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_posts(server: &MockServer, count: usize) {
    let posts: Vec<Value> = (1..=count)
        .map(|id| json!({"userId": 1, "id": id, "title": format!("post {}", id)}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(posts))
        .mount(server)
        .await;
}

/// One source of each kind, all served by `server`
fn all_sources(base_url: &str) -> Vec<Source> {
    vec![
        Source::new("news", format!("{}/html", base_url), SourceKind::GenericDocument),
        Source::new("quotes", format!("{}/quotes/", base_url), SourceKind::QuoteList),
        Source::new("books", format!("{}/books/", base_url), SourceKind::Catalog),
        Source::new("posts", format!("{}/posts", base_url), SourceKind::JsonApi),
    ]
}

async fn mount_all(server: &MockServer) {
    mount_html(server, "/html", DOCUMENT_PAGE).await;
    mount_html(server, "/quotes/", QUOTES_PAGE).await;
    mount_html(server, "/books/", CATALOG_PAGE).await;
    mount_posts(server, 15).await;
}

#[tokio::test]
async fn test_full_scrape_all_kinds() {
    let mock_server = MockServer::start().await;
    mount_all(&mock_server).await;
    let base_url = mock_server.uri();

    let config = create_test_config(all_sources(&base_url));
    let store = harvest(&config).await.expect("Batch should run");

    assert_eq!(store.len(), 4);
    let ids: Vec<&str> = store.iter().map(|r| r.source_id()).collect();
    assert_eq!(ids, ["news", "quotes", "books", "posts"]);

    let news = store.get("news").unwrap();
    assert_eq!(news.title(), "Herman Melville - Moby-Dick");
    assert_eq!(news.item_count(), 2);
    match news.payload() {
        Payload::Document {
            headings, links, ..
        } => {
            assert_eq!(headings, &["Moby-Dick", "Chapter 1"]);
            assert_eq!(links.len(), 2);
            assert_eq!(links[0].text, "Next chapter");
            assert_eq!(links[0].url, format!("{}/chapter/2", base_url));
        }
        other => panic!("unexpected payload {:?}", other),
    }

    let quotes = store.get("quotes").unwrap();
    assert_eq!(quotes.title(), "Quotes to Scrape");
    assert_eq!(quotes.item_count(), 2);
    match quotes.payload() {
        Payload::Quotes { quotes } => {
            assert_eq!(quotes[0].author, "Albert Einstein");
            assert_eq!(quotes[0].tags, ["change", "thinking"]);
            assert!(quotes[1].tags.is_empty());
        }
        other => panic!("unexpected payload {:?}", other),
    }

    let books = store.get("books").unwrap();
    assert_eq!(books.item_count(), 2);
    match books.payload() {
        Payload::Catalog { items } => {
            assert_eq!(items[0].title, "A Light in the Attic");
            assert_eq!(items[0].rating, "Three");
            assert_eq!(items[0].availability, "In stock");
            assert_eq!(items[1].rating, "One");
            assert_eq!(items[1].availability, "Unknown");
        }
        other => panic!("unexpected payload {:?}", other),
    }

    let posts = store.get("posts").unwrap();
    assert_eq!(posts.title(), "JSON API Data");
    assert_eq!(posts.item_count(), 10);
}

#[tokio::test]
async fn test_failing_sources_are_isolated() {
    let mock_server = MockServer::start().await;
    mount_html(&mock_server, "/html", DOCUMENT_PAGE).await;
    mount_posts(&mock_server, 3).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/bad-json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;
    let base_url = mock_server.uri();

    let sources = vec![
        Source::new("broken", format!("{}/broken", base_url), SourceKind::QuoteList),
        Source::new("news", format!("{}/html", base_url), SourceKind::GenericDocument),
        Source::new("bad-json", format!("{}/bad-json", base_url), SourceKind::JsonApi),
        Source::new("refused", "http://127.0.0.1:1/", SourceKind::Catalog),
        Source::new("posts", format!("{}/posts", base_url), SourceKind::JsonApi),
    ];
    let config = create_test_config(sources.clone());
    let orchestrator = Orchestrator::new(&config).unwrap();

    let logs = LogCapture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(Level::ERROR)
        .finish();
    // tokio::test runs on the current thread, so the default covers the whole batch
    let _guard = tracing::subscriber::set_default(subscriber);

    let outcome = orchestrator.run_batch(&sources).await;

    // n sources, k failures: n - k records
    assert_eq!(outcome.store.len(), 2);
    assert_eq!(outcome.failures.len(), 3);

    let ids: Vec<&str> = outcome.store.iter().map(|r| r.source_id()).collect();
    assert_eq!(ids, ["news", "posts"]);

    let kinds: Vec<(&str, ErrorKind)> = outcome
        .failures
        .iter()
        .map(|f| (f.source_id.as_str(), f.error.kind()))
        .collect();
    assert_eq!(
        kinds,
        [
            ("broken", ErrorKind::HttpStatus),
            ("bad-json", ErrorKind::Parse),
            ("refused", ErrorKind::Connection),
        ]
    );

    // Each failure logged exactly once, with its source id and kind
    let output = logs.contents();
    let error_lines: Vec<&str> = output
        .lines()
        .filter(|line| line.contains("Failed to scrape source"))
        .collect();
    assert_eq!(error_lines.len(), 3, "logs: {}", output);
    for (id, kind) in [
        ("broken", "HttpStatusError"),
        ("bad-json", "ParseError"),
        ("refused", "ConnectionError"),
    ] {
        let matching: Vec<&&str> = error_lines
            .iter()
            .filter(|line| line.contains(&format!("source={} ", id)))
            .collect();
        assert_eq!(matching.len(), 1, "source {} in logs: {}", id, output);
        assert!(matching[0].contains(&format!("kind={}", kind)));
    }
}

#[tokio::test]
async fn test_empty_source_list() {
    let config = create_test_config(vec![]);
    let store = harvest(&config).await.unwrap();

    assert!(store.is_empty());
    assert_eq!(store.to_json().unwrap(), b"[]");
    assert_eq!(store.to_csv_summary(), b"URL,Title,Type,ItemsCount\r\n");
}

#[tokio::test]
async fn test_parallel_mode_keeps_configuration_order() {
    let mock_server = MockServer::start().await;
    // Earlier sources answer later
    for (i, delay) in [300u64, 200, 100, 0].iter().enumerate() {
        Mock::given(method("GET"))
            .and(path(format!("/page/{}", i)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(format!("<html><title>Page {}</title><p>x</p></html>", i))
                    .set_delay(Duration::from_millis(*delay)),
            )
            .mount(&mock_server)
            .await;
    }
    let base_url = mock_server.uri();

    let sources: Vec<Source> = (0..4)
        .map(|i| {
            Source::new(
                format!("page-{}", i),
                format!("{}/page/{}", base_url, i),
                SourceKind::GenericDocument,
            )
        })
        .collect();
    let config = create_test_config(sources.clone());
    let orchestrator = Orchestrator::new(&config)
        .unwrap()
        .with_mode(ExecutionMode::Parallel);

    let store = orchestrator.run_all(&sources).await;

    let titles: Vec<&str> = store.iter().map(|r| r.title()).collect();
    assert_eq!(titles, ["Page 0", "Page 1", "Page 2", "Page 3"]);
}

#[tokio::test]
async fn test_run_one_surfaces_error_kind() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let source = Source::new("quotes", mock_server.uri(), SourceKind::QuoteList);
    let config = create_test_config(vec![source.clone()]);
    let orchestrator = Orchestrator::new(&config).unwrap();

    let error = orchestrator
        .run_one(&source)
        .await
        .expect_err("404 should fail");
    assert_eq!(error.kind(), ErrorKind::HttpStatus);
}

#[tokio::test]
async fn test_run_one_at_overrides_url() {
    let mock_server = MockServer::start().await;
    mount_html(&mock_server, "/page/2/", QUOTES_PAGE).await;
    let base_url = mock_server.uri();

    // The configured URL is not served
    let source = Source::new("quotes", format!("{}/", base_url), SourceKind::QuoteList);
    let config = create_test_config(vec![source.clone()]);
    let orchestrator = Orchestrator::new(&config).unwrap();

    let page_two = format!("{}/page/2/", base_url);
    let record = orchestrator.run_one_at(&source, &page_two).await.unwrap();

    assert_eq!(record.url(), page_two);
    assert_eq!(record.source_id(), "quotes");
    assert_eq!(record.item_count(), 2);
}

#[tokio::test]
async fn test_missing_title_uses_fallback() {
    let mock_server = MockServer::start().await;
    mount_html(
        &mock_server,
        "/",
        r#"<html><body><div class="quote"><span class="text">"Hi"</span><small class="author">A</small></div></body></html>"#,
    )
    .await;

    let source = Source::new("quotes", mock_server.uri(), SourceKind::QuoteList);
    let config = create_test_config(vec![source.clone()]);
    let record = Orchestrator::new(&config)
        .unwrap()
        .run_one(&source)
        .await
        .unwrap();

    assert_eq!(record.title(), "Quotes to Scrape");
    assert_eq!(record.item_count(), 1);
}

#[tokio::test]
async fn test_transient_failure_retried() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    mount_posts(&mock_server, 2).await;

    let source = Source::new(
        "posts",
        format!("{}/posts", mock_server.uri()),
        SourceKind::JsonApi,
    );
    let mut config = create_test_config(vec![source.clone()]);
    config.scraper.max_retries = 2;
    let orchestrator = Orchestrator::new(&config).unwrap();

    let record = orchestrator.run_one(&source).await.unwrap();
    assert_eq!(record.item_count(), 2);
}

#[tokio::test]
async fn test_client_error_not_retried() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let source = Source::new("posts", mock_server.uri(), SourceKind::JsonApi);
    let mut config = create_test_config(vec![source.clone()]);
    config.scraper.max_retries = 3;
    let orchestrator = Orchestrator::new(&config).unwrap();

    assert!(orchestrator.run_one(&source).await.is_err());
    // The mock's expectation of one request is verified on drop
}

#[tokio::test]
async fn test_exports_agree_on_counts() {
    let mock_server = MockServer::start().await;
    mount_all(&mock_server).await;

    let config = create_test_config(all_sources(&mock_server.uri()));
    let store = harvest(&config).await.unwrap();

    let dir = TempDir::new().unwrap();
    let json_path = dir.path().join("scraped_data.json");
    let csv_path = dir.path().join("scraped_summary.csv");
    store.write_json(&json_path).unwrap();
    store.write_csv_summary(&csv_path).unwrap();

    let json: Value = serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    let records = json.as_array().unwrap();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    let rows: Vec<&str> = csv.lines().skip(1).collect();

    assert_eq!(records.len(), 4);
    assert_eq!(rows.len(), 4);
    for (record, row) in records.iter().zip(rows) {
        let csv_count = row.rsplit(',').next().unwrap();
        assert_eq!(record["item_count"].to_string(), csv_count);
        assert!(record["timestamp"].is_string());
        assert!(record["type"].is_string());
    }
}

#[tokio::test]
async fn test_config_file_drives_scrape() {
    let mock_server = MockServer::start().await;
    mount_html(&mock_server, "/books/", CATALOG_PAGE).await;

    let toml = format!(
        r#"
[scraper]
min-delay = 0.0
max-delay = 0.0
timeout = 2.0

[[source]]
id = "books"
url = "{}/books/"
kind = "catalog"
"#,
        mock_server.uri()
    );
    let config = parse_config(&toml).unwrap();
    let store = harvest(&config).await.unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(store.get("books").unwrap().kind(), SourceKind::Catalog);
}
