//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use std::path::Path;
use sumi_scrape::config::Config;
use sumi_scrape::crawler::{crawl, CrawlRequest, PageLimit};
use sumi_scrape::{CrawlState, FetchError, ScopeMode, ScrapeError};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing under `root` with no politeness delay
fn create_test_config(root: &Path) -> Config {
    let mut config = Config::default();
    config.user_agent.crawler_name = "TestBot".to_string();
    config.user_agent.crawler_version = "1.0.0".to_string();
    config.crawler.delay_ms = 0;
    config.crawler.request_timeout_secs = 5;
    config.output.root = root.to_path_buf();
    config
}

async fn mount_html(server: &MockServer, route: &str, body: String) {
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

/// Host directory name for the mock server, e.g. `127_0_0_1_49152`
fn host_dir(server: &MockServer) -> String {
    let url = url::Url::parse(&server.uri()).unwrap();
    format!(
        "{}_{}",
        url.host_str().unwrap().replace('.', "_"),
        url.port().unwrap()
    )
}

/// Mounts a five-page documentation tree plus an index outside it
async fn mount_docs_site(server: &MockServer) {
    let base = server.uri();
    mount_html(
        server,
        "/docs/",
        format!(
            r#"<html><body><h1>Docs</h1>
            <a href="/docs/intro">Intro</a>
            <a href="/docs/guide/setup">Setup</a>
            <a href="https://external.invalid/x">External</a>
            <a href="/docs/style.css">Style</a>
            <a href="/blog/">Blog</a>
            <a href="/docs/api">API</a>
            <a href="/docs/faq">FAQ</a>
            <a href="http://other.invalid/docs/">Other</a>
            <a href="{base}/docs/intro#top">Intro again</a>
            </body></html>"#
        ),
    )
    .await;

    for page in ["/docs/intro", "/docs/guide/setup", "/docs/api", "/docs/faq"] {
        mount_html(
            server,
            page,
            format!(
                r#"<html><body><p>Page {page}</p><a href="/docs/">Back</a></body></html>"#
            ),
        )
        .await;
    }

    Mock::given(method("GET"))
        .and(path("/blog/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>blog</p>"))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_recursive_directory_crawl_with_limit() {
    let server = MockServer::start().await;
    mount_docs_site(&server).await;

    let dir = TempDir::new().unwrap();
    let request = CrawlRequest::new(format!("{}/docs/", server.uri()))
        .with_scope(ScopeMode::RecursiveDirectory)
        .with_page_limit(PageLimit::pages(3));

    let report = crawl(create_test_config(dir.path()), request).await.unwrap();

    assert_eq!(report.state, CrawlState::Completed);
    assert_eq!(report.scope, ScopeMode::RecursiveDirectory);

    let paths: Vec<_> = report.results.iter().map(|r| r.url.path().to_string()).collect();
    assert_eq!(paths, vec!["/docs/", "/docs/intro", "/docs/guide/setup"]);

    let host = host_dir(&server);
    for file in ["docs.md", "docs_intro.md", "docs_guide_setup.md"] {
        let written = dir.path().join(&host).join(file);
        assert!(written.is_file(), "missing {}", written.display());
    }

    let intro = std::fs::read_to_string(dir.path().join(&host).join("docs_intro.md")).unwrap();
    assert!(intro.starts_with(&format!("# URL: {}/docs/intro\n\n", server.uri())));
    assert!(intro.contains("Page /docs/intro"));
}

#[tokio::test]
async fn test_unlimited_crawl_stays_in_scope() {
    let server = MockServer::start().await;
    mount_docs_site(&server).await;

    let dir = TempDir::new().unwrap();
    let request = CrawlRequest::new(format!("{}/docs/", server.uri()))
        .with_page_limit(PageLimit::UNLIMITED);

    let report = crawl(create_test_config(dir.path()), request).await.unwrap();

    // Auto resolves a directory seed to a recursive crawl
    assert_eq!(report.scope, ScopeMode::RecursiveDirectory);
    assert_eq!(report.results.len(), 5);
    assert!(report
        .results
        .iter()
        .all(|r| r.url.path().starts_with("/docs/")));
    assert!(report.failures.is_empty());
}

#[tokio::test]
async fn test_directory_scope_skips_nested_pages() {
    let server = MockServer::start().await;
    mount_docs_site(&server).await;

    let dir = TempDir::new().unwrap();
    let request = CrawlRequest::new(format!("{}/docs/", server.uri()))
        .with_scope(ScopeMode::Directory)
        .with_page_limit(PageLimit::UNLIMITED);

    let report = crawl(create_test_config(dir.path()), request).await.unwrap();

    let paths: Vec<_> = report.results.iter().map(|r| r.url.path().to_string()).collect();
    assert_eq!(paths, vec!["/docs/", "/docs/intro", "/docs/api", "/docs/faq"]);
}

#[tokio::test]
async fn test_single_page_limit_makes_one_request() {
    let server = MockServer::start().await;
    let links: String = (0..10)
        .map(|i| format!(r#"<a href="/p{i}">{i}</a>"#))
        .collect();
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(links))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/p0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("p0"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let request = CrawlRequest::new(format!("{}/", server.uri()))
        .with_scope(ScopeMode::Domain)
        .with_page_limit(PageLimit::pages(1));

    let report = crawl(create_test_config(dir.path()), request).await.unwrap();

    assert_eq!(report.results.len(), 1);
    assert!(dir.path().join(host_dir(&server)).join("index.md").is_file());
}

#[tokio::test]
async fn test_single_scope_ignores_links() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/guide.html",
        r#"<a href="/other.html">Other</a>"#.to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/other.html"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let request = CrawlRequest::new(format!("{}/guide.html", server.uri()))
        .with_page_limit(PageLimit::UNLIMITED);

    let report = crawl(create_test_config(dir.path()), request).await.unwrap();

    assert_eq!(report.scope, ScopeMode::Single);
    assert_eq!(report.results.len(), 1);
    assert_eq!(
        report.results[0].relative_path,
        Path::new(&host_dir(&server)).join("guide.html.md")
    );
}

#[tokio::test]
async fn test_robots_disallowed_seed_yields_empty_report() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/private/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("secret"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let request = CrawlRequest::new(format!("{}/private/", server.uri()));

    let report = crawl(create_test_config(dir.path()), request).await.unwrap();

    assert_eq!(report.state, CrawlState::Completed);
    assert!(report.results.is_empty());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].error.kind(), "disallowed");
}

#[tokio::test]
async fn test_robots_rules_filter_discovered_links() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: TestBot\nDisallow: /docs/secret"),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_html(
        &server,
        "/docs/",
        r#"<a href="/docs/secret">s</a><a href="/docs/open">o</a>"#.to_string(),
    )
    .await;
    mount_html(&server, "/docs/open", "<p>open</p>".to_string()).await;
    Mock::given(method("GET"))
        .and(path("/docs/secret"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let request = CrawlRequest::new(format!("{}/docs/", server.uri()))
        .with_page_limit(PageLimit::UNLIMITED);

    let report = crawl(create_test_config(dir.path()), request).await.unwrap();

    let paths: Vec<_> = report.results.iter().map(|r| r.url.path().to_string()).collect();
    assert_eq!(paths, vec!["/docs/", "/docs/open"]);
    assert_eq!(report.failures_by_kind().get("disallowed"), Some(&1));
}

#[tokio::test]
async fn test_missing_page_is_skipped() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/",
        r#"<a href="/gone">gone</a><a href="/here">here</a>"#.to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_html(&server, "/here", "<p>here</p>".to_string()).await;

    let dir = TempDir::new().unwrap();
    let request = CrawlRequest::new(format!("{}/", server.uri()))
        .with_page_limit(PageLimit::UNLIMITED);

    let report = crawl(create_test_config(dir.path()), request).await.unwrap();

    let paths: Vec<_> = report.results.iter().map(|r| r.url.path().to_string()).collect();
    assert_eq!(paths, vec!["/", "/here"]);
    assert_eq!(report.failures_by_kind().get("http"), Some(&1));
    assert!(!dir.path().join(host_dir(&server)).join("gone.md").exists());
}

#[tokio::test]
async fn test_zero_page_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let request = CrawlRequest::new(format!("{}/", server.uri()))
        .with_page_limit(PageLimit::pages(0));

    let report = crawl(create_test_config(dir.path()), request).await.unwrap();

    assert_eq!(report.state, CrawlState::Completed);
    assert!(report.results.is_empty());
}

#[tokio::test]
async fn test_invalid_seed_is_rejected() {
    let dir = TempDir::new().unwrap();

    for seed in ["", "not a url", "ftp://example.com/", "mailto:someone@example.com"] {
        let err = crawl(create_test_config(dir.path()), CrawlRequest::new(seed))
            .await
            .unwrap_err();
        assert!(
            matches!(err, ScrapeError::InvalidInput(_)),
            "seed {:?} gave {:?}",
            seed,
            err
        );
    }
}

#[tokio::test]
async fn test_unwritable_output_root_aborts() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("not-a-dir");
    std::fs::write(&file, "occupied").unwrap();

    let err = crawl(
        create_test_config(&file),
        CrawlRequest::new("http://127.0.0.1:9/"),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ScrapeError::OutputRoot { .. }));
}

#[tokio::test]
async fn test_repeated_crawls_are_identical() {
    let server = MockServer::start().await;
    mount_docs_site(&server).await;

    let mut runs = Vec::new();
    for _ in 0..2 {
        let dir = TempDir::new().unwrap();
        let request = CrawlRequest::new(format!("{}/docs/", server.uri()))
            .with_page_limit(PageLimit::UNLIMITED);
        let report = crawl(create_test_config(dir.path()), request).await.unwrap();
        runs.push(
            report
                .results
                .into_iter()
                .map(|r| (r.url, r.relative_path, r.content))
                .collect::<Vec<_>>(),
        );
    }

    assert_eq!(runs[0], runs[1]);
}

#[tokio::test]
async fn test_existing_file_is_overwritten() {
    let server = MockServer::start().await;
    mount_html(&server, "/", "<p>fresh</p>".to_string()).await;

    let dir = TempDir::new().unwrap();
    let target = dir.path().join(host_dir(&server)).join("index.md");
    std::fs::create_dir_all(target.parent().unwrap()).unwrap();
    std::fs::write(&target, "stale").unwrap();

    let mut config = create_test_config(dir.path());
    config.output.source_header = false;
    crawl(config, CrawlRequest::new(format!("{}/", server.uri())))
        .await
        .unwrap();

    assert_eq!(std::fs::read_to_string(&target).unwrap(), "fresh");
}

/// `/docs/` links to `/docs/moved`, which redirects into robots-disallowed `/blog/`
async fn mount_redirect_into_blog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /blog/"))
        .mount(server)
        .await;
    mount_html(server, "/docs/", r#"<a href="/docs/moved">moved</a>"#.to_string()).await;
    Mock::given(method("GET"))
        .and(path("/docs/moved"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/blog/secret"))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/blog/secret"))
        .respond_with(ResponseTemplate::new(200).set_body_string("SECRET BLOG"))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_redirect_out_of_scope_is_not_fetched() {
    let server = MockServer::start().await;
    mount_redirect_into_blog(&server).await;

    let dir = TempDir::new().unwrap();
    let request = CrawlRequest::new(format!("{}/docs/", server.uri()))
        .with_scope(ScopeMode::RecursiveDirectory)
        .with_page_limit(PageLimit::UNLIMITED);

    let report = crawl(create_test_config(dir.path()), request).await.unwrap();

    let paths: Vec<_> = report.results.iter().map(|r| r.url.path().to_string()).collect();
    assert_eq!(paths, vec!["/docs/"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].url.path(), "/docs/moved");
    assert_eq!(report.failures[0].error.kind(), "redirect");
    assert!(!dir.path().join(host_dir(&server)).join("docs_moved.md").exists());
}

#[tokio::test]
async fn test_redirect_to_disallowed_path_is_not_fetched() {
    let server = MockServer::start().await;
    mount_redirect_into_blog(&server).await;

    let dir = TempDir::new().unwrap();
    let request = CrawlRequest::new(format!("{}/docs/", server.uri()))
        .with_scope(ScopeMode::Domain)
        .with_page_limit(PageLimit::UNLIMITED);

    let report = crawl(create_test_config(dir.path()), request).await.unwrap();

    let paths: Vec<_> = report.results.iter().map(|r| r.url.path().to_string()).collect();
    assert_eq!(paths, vec!["/docs/"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(
        report.failures[0].error,
        FetchError::Disallowed {
            url: format!("{}/blog/secret", server.uri())
        }
    );
}

#[tokio::test]
async fn test_non_text_page_is_skipped() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/docs/",
        r#"<a href="/docs/manual.pdf" download>PDF</a><a href="/docs/faq">FAQ</a>"#.to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/docs/manual.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0x25, 0x50, 0x44, 0x46])
                .insert_header("content-type", "application/pdf"),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_html(&server, "/docs/faq", "<p>faq</p>".to_string()).await;

    let dir = TempDir::new().unwrap();
    let request = CrawlRequest::new(format!("{}/docs/", server.uri()))
        .with_page_limit(PageLimit::UNLIMITED);

    let report = crawl(create_test_config(dir.path()), request).await.unwrap();

    let paths: Vec<_> = report.results.iter().map(|r| r.url.path().to_string()).collect();
    assert_eq!(paths, vec!["/docs/", "/docs/faq"]);
    assert_eq!(report.failures_by_kind().get("content-type"), Some(&1));
    assert!(!dir
        .path()
        .join(host_dir(&server))
        .join("docs_manual.pdf.md")
        .exists());
}
