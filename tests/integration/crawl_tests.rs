//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use portal_harvest::config::{
    CollisionPolicy, Config, CrawlerConfig, OutputConfig, UserAgentConfig,
};
use portal_harvest::crawler::Coordinator;
use portal_harvest::output::CrawlSummary;
use portal_harvest::state::UrlOutcome;
use std::collections::HashMap;
use std::path::Path;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling the mock server from its root
fn create_test_config(server: &MockServer, root: &Path, max_depth: u32) -> Config {
    let base = url::Url::parse(&server.uri()).expect("Failed to parse base URL");
    let domain = base.host_str().expect("Failed to extract host").to_string();

    Config {
        crawler: CrawlerConfig {
            seeds: vec![format!("{}/", server.uri())],
            domain,
            max_depth,
            politeness_delay: 0.0,
            workers: 1,
            page_timeout: 5,
            document_timeout: 5,
            max_document_bytes: 10 * 1024 * 1024,
            respect_robots_txt: false,
            main_content_selectors: vec!["div.main-content".to_string()],
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            root: root.to_path_buf(),
            collision_policy: CollisionPolicy::Overwrite,
            summary_file: None,
        },
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html(body))
        .mount(server)
        .await;
}

async fn run_crawl(config: Config) -> CrawlSummary {
    Coordinator::new(config)
        .expect("Failed to create coordinator")
        .run(CancellationToken::new())
        .await
        .expect("Crawl failed")
}

/// Paths requested from the mock server, in arrival order
async fn requested_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect()
}

fn assert_no_duplicate_requests(paths: &[String]) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for p in paths {
        *counts.entry(p.as_str()).or_default() += 1;
    }
    for (p, count) in counts {
        assert_eq!(count, 1, "{} was requested {} times", p, count);
    }
}

/// A one-page PDF reading "Hello World!"
fn hello_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 48.into()]),
            Operation::new("Td", vec![100.into(), 600.into()]),
            Operation::new("Tj", vec![Object::string_literal("Hello World!")]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

#[tokio::test]
async fn test_depth_zero_fetches_only_seed() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        r#"<div class="main-content"><h1>MOSDAC</h1><p>Welcome</p></div><a href="/page1">Page 1</a>"#,
    )
    .await;
    mount_page(&mock_server, "/page1", "<p>never</p>").await;

    let dir = TempDir::new().unwrap();
    let summary = run_crawl(create_test_config(&mock_server, dir.path(), 0)).await;

    assert_eq!(requested_paths(&mock_server).await, vec!["/"]);
    assert_eq!(summary.pages_saved(), 1);
    assert_eq!(summary.unique_urls, 1);
    assert_eq!(summary.status(), "completed");

    let saved = std::fs::read_to_string(dir.path().join("web_pages").join("index.txt")).unwrap();
    assert!(saved.starts_with(&format!("URL: {}/\n\n--- EXTRACTED TEXT ---\nMOSDAC\nWelcome\n", mock_server.uri())));
}

#[tokio::test]
async fn test_pdf_link_is_downloaded_and_extracted() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        r#"<a href="report.pdf">Annual report</a><a href="/sheet.xlsx">Sheet</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(hello_pdf())
                .insert_header("content-type", "application/pdf"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sheet.xlsx"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK\x03\x04".to_vec()))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let summary = run_crawl(create_test_config(&mock_server, dir.path(), 1)).await;

    let documents = dir.path().join("documents");
    assert_eq!(std::fs::read(documents.join("report.pdf")).unwrap(), hello_pdf());
    let text = std::fs::read_to_string(documents.join("report.pdf.txt")).unwrap();
    assert!(text.contains("Hello"), "extracted text: {:?}", text);

    assert!(documents.join("sheet.xlsx").exists());
    assert!(!documents.join("sheet.xlsx.txt").exists());

    assert_eq!(summary.documents_saved(), 2);
    assert_eq!(summary.pdf_texts_extracted, 1);
    assert_no_duplicate_requests(&requested_paths(&mock_server).await);
}

#[tokio::test]
async fn test_dead_link_does_not_stop_crawl() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        r#"<a href="/missing">Gone</a><a href="/ok">Fine</a>"#,
    )
    .await;
    mount_page(&mock_server, "/ok", "<p>still here</p>").await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let summary = run_crawl(create_test_config(&mock_server, dir.path(), 2)).await;

    assert_eq!(summary.pages_saved(), 2);
    assert_eq!(summary.count(UrlOutcome::DeadLink), 1);
    assert_eq!(summary.unique_urls, 3);
    assert!(dir.path().join("web_pages").join("ok.txt").exists());
    assert!(!dir.path().join("web_pages").join("missing.txt").exists());
}

#[tokio::test]
async fn test_external_links_never_fetched() {
    let mock_server = MockServer::start().await;
    let port = url::Url::parse(&mock_server.uri()).unwrap().port().unwrap();
    mount_page(
        &mock_server,
        "/",
        &format!(
            r#"<a href="https://external.example.org/page">External</a>
               <a href="http://localhost:{port}/other-host">Same server, other host</a>
               <a href="mailto:ops@example.org">Mail</a>
               <a href="javascript:void(0)">Script</a>"#
        ),
    )
    .await;
    mount_page(&mock_server, "/other-host", "<p>must not be fetched</p>").await;

    let dir = TempDir::new().unwrap();
    let summary = run_crawl(create_test_config(&mock_server, dir.path(), 2)).await;

    assert_eq!(requested_paths(&mock_server).await, vec!["/"]);
    assert_eq!(summary.unique_urls, 1);
}

#[tokio::test]
async fn test_each_url_fetched_once() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        r#"<a href="/a">A</a><a href="/a#section">A again</a><a href="/a?utm_source=mail">A tracked</a>
           <a href="/b">B</a><a href="/">Home</a><a href="report.pdf">R</a>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/a",
        r#"<a href="/b">B</a><a href="/">Home</a><a href="./a">Self</a><a href="/report.pdf">R</a>"#,
    )
    .await;
    mount_page(&mock_server, "/b", r#"<a href="/a">A</a><a href="/b">B</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"not really a pdf".to_vec()))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let summary = run_crawl(create_test_config(&mock_server, dir.path(), 3)).await;

    let paths = requested_paths(&mock_server).await;
    assert_no_duplicate_requests(&paths);
    assert_eq!(paths.len(), 4);
    assert_eq!(summary.pages_saved(), 3);
    assert_eq!(summary.documents_saved(), 1);
    // Unparseable PDF still gets a (empty) text file
    assert_eq!(summary.pdf_texts_extracted, 0);
    assert!(dir.path().join("documents").join("report.pdf.txt").exists());
}

#[tokio::test]
async fn test_depth_limit_respected() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", r#"<a href="/level1">1</a>"#).await;
    mount_page(&mock_server, "/level1", r#"<a href="/level2">2</a>"#).await;
    mount_page(&mock_server, "/level2", r#"<a href="/level3">3</a>"#).await;
    mount_page(&mock_server, "/level3", "<p>too deep</p>").await;

    let dir = TempDir::new().unwrap();
    let summary = run_crawl(create_test_config(&mock_server, dir.path(), 2)).await;

    assert_eq!(
        requested_paths(&mock_server).await,
        vec!["/", "/level1", "/level2"]
    );
    assert_eq!(summary.pages_saved(), 3);
    assert_eq!(summary.depth_breakdown.get(&2), Some(&1));
    assert_eq!(summary.depth_breakdown.get(&3), None);
}

#[tokio::test]
async fn test_breadth_first_order_with_one_worker() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", r#"<a href="/a">A</a><a href="/b">B</a>"#).await;
    mount_page(&mock_server, "/a", r#"<a href="/a1">A1</a>"#).await;
    mount_page(&mock_server, "/b", r#"<a href="/b1">B1</a>"#).await;
    mount_page(&mock_server, "/a1", "<p>leaf</p>").await;
    mount_page(&mock_server, "/b1", "<p>leaf</p>").await;

    let dir = TempDir::new().unwrap();
    run_crawl(create_test_config(&mock_server, dir.path(), 2)).await;

    assert_eq!(
        requested_paths(&mock_server).await,
        vec!["/", "/a", "/b", "/a1", "/b1"]
    );
}

#[tokio::test]
async fn test_documents_finish_before_next_page() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        r#"<a href="/a">A</a><a href="r.pdf">Report</a>"#,
    )
    .await;
    mount_page(&mock_server, "/a", "<p>next page</p>").await;
    Mock::given(method("GET"))
        .and(path("/r.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(hello_pdf())
                .insert_header("content-type", "application/pdf"),
        )
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let summary = run_crawl(create_test_config(&mock_server, dir.path(), 1)).await;

    assert_eq!(
        requested_paths(&mock_server).await,
        vec!["/", "/r.pdf", "/a"]
    );
    assert_eq!(summary.documents_saved(), 1);
    assert_eq!(summary.pages_saved(), 2);
    assert!(dir.path().join("documents").join("r.pdf").exists());
    assert!(dir.path().join("documents").join("r.pdf.txt").exists());
}

#[tokio::test]
async fn test_parallel_workers_keep_dedup() {
    let mock_server = MockServer::start().await;
    let links: String = (0..8)
        .map(|i| format!(r#"<a href="/p{i}">{i}</a>"#))
        .collect();
    mount_page(&mock_server, "/", &links).await;
    for i in 0..8 {
        mount_page(&mock_server, &format!("/p{i}"), &links).await;
    }

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&mock_server, dir.path(), 2);
    config.crawler.workers = 4;
    let summary = run_crawl(config).await;

    let paths = requested_paths(&mock_server).await;
    assert_no_duplicate_requests(&paths);
    assert_eq!(paths.len(), 9);
    assert_eq!(summary.pages_saved(), 9);
}

#[tokio::test]
async fn test_robots_txt_respect() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private"),
        )
        .mount(&mock_server)
        .await;
    mount_page(
        &mock_server,
        "/",
        r#"<a href="/private/data">Private</a><a href="/public">Public</a>"#,
    )
    .await;
    mount_page(&mock_server, "/public", "<p>open</p>").await;
    mount_page(&mock_server, "/private/data", "<p>closed</p>").await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&mock_server, dir.path(), 2);
    config.crawler.respect_robots_txt = true;
    let summary = run_crawl(config).await;

    let paths = requested_paths(&mock_server).await;
    assert!(paths.contains(&"/public".to_string()));
    assert!(!paths.contains(&"/private/data".to_string()));
    assert_eq!(summary.count(UrlOutcome::RobotsDenied), 1);
    assert_eq!(summary.pages_saved(), 2);
}

#[tokio::test]
async fn test_hash_suffix_keeps_colliding_pages() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", r#"<a href="/a/b">1</a><a href="/a_b">2</a>"#).await;
    mount_page(&mock_server, "/a/b", "<p>first</p>").await;
    mount_page(&mock_server, "/a_b", "<p>second</p>").await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&mock_server, dir.path(), 1);
    config.output.collision_policy = CollisionPolicy::HashSuffix;
    run_crawl(config).await;

    let saved = std::fs::read_dir(dir.path().join("web_pages")).unwrap().count();
    assert_eq!(saved, 3);
}

#[tokio::test]
async fn test_run_report_written() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", "<p>home</p>").await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&mock_server, dir.path(), 1);
    config.output.summary_file = Some("crawl_summary.md".to_string());
    run_crawl(config).await;

    let report = std::fs::read_to_string(dir.path().join("crawl_summary.md")).unwrap();
    assert!(report.contains("# Portal-Harvest Crawl Summary"));
    assert!(report.contains("| page_saved | 1 |"));
}
