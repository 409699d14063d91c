//! Integration tests for the crawler
//!
//! The engine tests drive a full crawl against an in-memory site. The fetcher
//! tests use wiremock to check the reqwest-backed HTTP client on its own.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wordcrawl::config::CrawlConfig;
use wordcrawl::crawler::{
    Crawler, FetchedPage, HttpClient, PageProcessor, ProcessedPage, ReqwestFetcher, TokenCounts,
};
use wordcrawl::output::write_report;
use wordcrawl::{CrawlError, PageResult};

/// In-memory site: URL -> body, with a log of every GET
#[derive(Default)]
struct MockSite {
    pages: HashMap<String, String>,
    fallback: Option<String>,
    failing: Vec<String>,
    latency: Duration,
    fetches: Mutex<Vec<String>>,
}

impl MockSite {
    fn new() -> Self {
        Self::default()
    }

    fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    fn fallback(mut self, body: &str) -> Self {
        self.fallback = Some(body.to_string());
        self
    }

    fn failing(mut self, url: &str) -> Self {
        self.failing.push(url.to_string());
        self
    }

    fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn fetches(&self) -> Vec<String> {
        self.fetches.lock().unwrap().clone()
    }

    fn fetch_count(&self, url: &str) -> usize {
        self.fetches().iter().filter(|u| u.as_str() == url).count()
    }
}

#[async_trait]
impl HttpClient for MockSite {
    async fn get(&self, url: &str) -> Result<FetchedPage, CrawlError> {
        self.fetches.lock().unwrap().push(url.to_string());

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if self.failing.iter().any(|u| u == url) {
            return Err(CrawlError::Transport {
                url: url.to_string(),
                message: "connection refused".to_string(),
            });
        }

        let body = match self.pages.get(url).or(self.fallback.as_ref()) {
            Some(body) => body.clone(),
            None => {
                return Ok(FetchedPage {
                    status: 404,
                    body: "<html><body>not found</body></html>".to_string(),
                })
            }
        };

        Ok(FetchedPage { status: 200, body })
    }
}

fn config(max_depth: u32, parallelism: usize) -> CrawlConfig {
    CrawlConfig {
        max_depth,
        parallelism,
        ..CrawlConfig::default()
    }
}

fn result(url: &str, words: usize, numbers: usize) -> PageResult {
    PageResult {
        url: url.to_string(),
        word_count: words,
        number_count: numbers,
    }
}

/// Three-level site with a cycle back to the root
fn layered_site() -> MockSite {
    MockSite::new()
        .page(
            "https://site.test",
            r#"<html><body>root page 1 <a href="/a">a</a> <a href="b">b</a></body></html>"#,
        )
        .page(
            "https://site.test/a",
            r#"<html><body>page a <a href="/">home</a> <a href="/a/deep">deep</a></body></html>"#,
        )
        .page(
            "https://site.test/b",
            r#"<html><body>page b 2 3 <a href="https://site.test/a">a</a></body></html>"#,
        )
        .page(
            "https://site.test/a/deep",
            r#"<html><body>deep page <a href="/a/deeper">deeper</a></body></html>"#,
        )
        .page(
            "https://site.test/a/deeper",
            "<html><body>too deep</body></html>",
        )
}

#[tokio::test]
async fn test_single_page_counts() {
    let site = Arc::new(MockSite::new().fallback(
        r#"<html><body><div>some words and 1 number</div><<a href="google.com" /></body></html>"#,
    ));

    let crawler = Crawler::new("https://google.com", site.clone(), config(2, 1)).unwrap();
    let report = crawler.run().await;

    assert!(!report.cancelled);
    assert_eq!(report.pages.len(), 1);
    assert_eq!(
        report.pages.get("https://google.com"),
        Some(&result("https://google.com", 4, 1))
    );
    assert_eq!(site.fetch_count("https://google.com"), 1);
}

#[tokio::test]
async fn test_seed_without_scheme_fetches_https() {
    let site = Arc::new(MockSite::new().fallback("<html><body>hi</body></html>"));

    let report = Crawler::new("google.com", site.clone(), config(0, 1))
        .unwrap()
        .run()
        .await;

    assert_eq!(site.fetches(), vec!["https://google.com".to_string()]);
    assert_eq!(report.seed, "https://google.com");
}

#[tokio::test]
async fn test_depth_zero_fetches_seed_only() {
    let site = Arc::new(layered_site());

    let report = Crawler::new("site.test", site.clone(), config(0, 1))
        .unwrap()
        .run()
        .await;

    assert_eq!(site.fetches(), vec!["https://site.test".to_string()]);
    assert_eq!(report.pages.len(), 1);
    assert_eq!(
        report.pages.get("https://site.test"),
        Some(&result("https://site.test", 4, 1))
    );
    assert_eq!(report.items_produced, 1);
}

#[tokio::test]
async fn test_depth_limit_prunes_expansion() {
    let site = Arc::new(layered_site());

    let report = Crawler::new("site.test", site.clone(), config(2, 1))
        .unwrap()
        .run()
        .await;

    let visited: Vec<&str> = report.pages.keys().map(String::as_str).collect();
    assert_eq!(
        visited,
        vec![
            "https://site.test",
            "https://site.test/a",
            "https://site.test/a/deep",
            "https://site.test/b",
        ]
    );
    assert_eq!(site.fetch_count("https://site.test/a/deeper"), 0);
    assert_eq!(
        report.pages.get("https://site.test/b"),
        Some(&result("https://site.test/b", 3, 2))
    );
}

#[tokio::test]
async fn test_cycles_terminate_and_fetch_once() {
    let site = Arc::new(layered_site());

    let report = tokio::time::timeout(
        Duration::from_secs(10),
        Crawler::new("site.test", site.clone(), config(10, 1))
            .unwrap()
            .run(),
    )
    .await
    .expect("crawl did not terminate");

    assert_eq!(report.pages.len(), 5);
    for url in report.pages.keys() {
        assert_eq!(site.fetch_count(url), 1, "{} fetched more than once", url);
    }
    assert_eq!(report.items_completed, report.items_produced);
    assert!(report.items_produced > report.pages.len());
}

#[tokio::test]
async fn test_parallel_workers_fetch_each_url_once() {
    // Every page links to every other page
    let mut site = MockSite::new().latency(Duration::from_millis(5));
    let urls: Vec<String> = (0..20).map(|i| format!("https://mesh.test/p{}", i)).collect();
    let links: String = urls
        .iter()
        .map(|u| format!(r#"<a href="{}">x</a>"#, u))
        .collect();
    site = site.page(
        "https://mesh.test",
        &format!("<html><body>{}</body></html>", links),
    );
    for url in &urls {
        site = site.page(url, &format!("<html><body>{} 42</body></html>", links));
    }
    let site = Arc::new(site);

    let report = Crawler::new("mesh.test", site.clone(), config(3, 8))
        .unwrap()
        .run()
        .await;

    assert!(!report.cancelled);
    assert_eq!(report.pages.len(), 21);
    assert_eq!(site.fetches().len(), 21);
    for url in &urls {
        assert_eq!(site.fetch_count(url), 1);
        assert_eq!(report.pages[url].number_count, 1);
    }
}

#[tokio::test]
async fn test_failed_fetch_does_not_stop_crawl() {
    let site = Arc::new(layered_site().failing("https://site.test/a"));

    let report = Crawler::new("site.test", site.clone(), config(2, 2))
        .unwrap()
        .run()
        .await;

    assert!(!report.cancelled);
    assert_eq!(report.items_failed, 1);
    assert_eq!(
        report.pages.get("https://site.test/a"),
        Some(&result("https://site.test/a", 0, 0))
    );
    assert!(report.pages.contains_key("https://site.test/b"));
    // /a/deep was only linked from the failed page
    assert!(!report.pages.contains_key("https://site.test/a/deep"));
    // Failed URLs are not retried
    assert_eq!(site.fetch_count("https://site.test/a"), 1);
}

#[tokio::test]
async fn test_non_success_status_is_content() {
    let site = Arc::new(MockSite::new().page(
        "https://site.test",
        r#"<html><body><a href="/missing">gone</a></body></html>"#,
    ));

    let report = Crawler::new("site.test", site, config(1, 1))
        .unwrap()
        .run()
        .await;

    assert_eq!(
        report.pages.get("https://site.test/missing"),
        Some(&result("https://site.test/missing", 2, 0))
    );
}

#[tokio::test]
async fn test_cross_host_links_ignored() {
    let site = Arc::new(MockSite::new().page(
        "https://site.test",
        r#"<body><a href="https://other.test/x">x</a><a href="something.com">y</a><a href="mailto:a@site.test">m</a></body>"#,
    ));

    let report = Crawler::new("site.test", site.clone(), config(3, 1))
        .unwrap()
        .run()
        .await;

    assert_eq!(report.pages.len(), 1);
    assert_eq!(site.fetches().len(), 1);
}

#[tokio::test]
async fn test_request_timeout_marks_item_failed() {
    let site = Arc::new(MockSite::new().fallback("<body>slow</body>").latency(Duration::from_secs(30)));
    let config = CrawlConfig {
        request_timeout: Duration::from_millis(50),
        ..config(0, 1)
    };

    let report = Crawler::new("slow.test", site, config).unwrap().run().await;

    assert!(!report.cancelled);
    assert_eq!(report.items_failed, 1);
    assert_eq!(
        report.pages.get("https://slow.test"),
        Some(&result("https://slow.test", 0, 0))
    );
}

#[tokio::test]
async fn test_cancellation_stops_workers() {
    let site = Arc::new(layered_site().latency(Duration::from_secs(30)));
    let cancel = CancellationToken::new();

    let crawler = Crawler::new("site.test", site, config(5, 2)).unwrap();
    let run = tokio::spawn(crawler.run_until_cancelled(cancel.clone()));

    tokio::time::sleep(Duration::from_millis(50)).await;
    cancel.cancel();

    let report = tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .expect("cancelled crawl did not stop")
        .unwrap();

    assert!(report.cancelled);
    assert!(report.items_completed < report.items_produced);
    assert!(report.pages.contains_key("https://site.test"));
}

#[tokio::test]
async fn test_inter_request_delay_applies() {
    let site = Arc::new(layered_site());
    let config = CrawlConfig {
        inter_request_delay: Duration::from_millis(20),
        ..config(1, 1)
    };

    let report = Crawler::new("site.test", site, config).unwrap().run().await;

    // Seed plus its two links, each preceded by the pause
    assert_eq!(report.items_completed, 3);
    assert!(report.elapsed >= Duration::from_millis(60));
}

#[tokio::test]
async fn test_inter_request_delay_is_per_worker() {
    let site = Arc::new(layered_site());
    let config = CrawlConfig {
        inter_request_delay: Duration::from_millis(100),
        ..config(1, 3)
    };

    let report = Crawler::new("site.test", site.clone(), config)
        .unwrap()
        .run()
        .await;

    assert_eq!(report.items_completed, 3);
    assert_eq!(site.fetches().len(), 3);
    // The seed pauses alone, then two workers pause for /a and /b together.
    // A shared limiter would need three full pauses.
    assert!(report.elapsed >= Duration::from_millis(200));
    assert!(report.elapsed < Duration::from_millis(290));
}

struct LengthProcessor;

impl PageProcessor for LengthProcessor {
    fn process(&self, raw_html: &str, _host: &str) -> ProcessedPage {
        ProcessedPage {
            counts: TokenCounts {
                words: raw_html.len(),
                numbers: 0,
            },
            links: Default::default(),
        }
    }
}

#[tokio::test]
async fn test_custom_page_processor() {
    let site = Arc::new(layered_site());

    let report = Crawler::new("site.test", site.clone(), config(3, 1))
        .unwrap()
        .with_processor(Arc::new(LengthProcessor))
        .run()
        .await;

    assert_eq!(report.pages.len(), 1);
    assert_eq!(site.fetches().len(), 1);
    assert!(report.pages["https://site.test"].word_count > 0);
}

#[tokio::test]
async fn test_report_for_crawl() {
    let site = Arc::new(layered_site());

    let report = Crawler::new("site.test", site, config(1, 1))
        .unwrap()
        .run()
        .await;

    let mut out = Vec::new();
    write_report(&mut out, &report, false).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(
        text,
        "site.test\t\t4\t1\t\t\nsite.test\t\t4\t0\t\t/a\nsite.test\t\t3\t2\t\t/b\n"
    );
}

// ===== reqwest fetcher against a real HTTP server =====

#[tokio::test]
async fn test_reqwest_fetcher_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<body>hello 1</body>"))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::from_config(&CrawlConfig::default()).unwrap();
    let page = fetcher.get(&format!("{}/page", server.uri())).await.unwrap();

    assert_eq!(page.status, 200);
    assert_eq!(page.body, "<body>hello 1</body>");
}

#[tokio::test]
async fn test_reqwest_fetcher_keeps_error_status_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<body>not here</body>"))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::from_config(&CrawlConfig::default()).unwrap();
    let page = fetcher.get(&format!("{}/missing", server.uri())).await.unwrap();

    assert_eq!(page.status, 404);
    assert_eq!(page.body, "<body>not here</body>");
}

#[tokio::test]
async fn test_reqwest_fetcher_sends_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("user-agent", "TestCrawler/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let config = CrawlConfig {
        user_agent: "TestCrawler/1.0".to_string(),
        ..CrawlConfig::default()
    };
    let fetcher = ReqwestFetcher::from_config(&config).unwrap();
    let page = fetcher.get(&server.uri()).await.unwrap();

    assert_eq!(page.body, "ok");
}

#[tokio::test]
async fn test_reqwest_fetcher_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let config = CrawlConfig {
        request_timeout: Duration::from_millis(100),
        ..CrawlConfig::default()
    };
    let fetcher = ReqwestFetcher::from_config(&config).unwrap();
    let result = fetcher.get(&server.uri()).await;

    assert!(matches!(result, Err(CrawlError::Timeout { .. })));
}

#[tokio::test]
async fn test_reqwest_fetcher_connection_refused() {
    // Bind and drop a server so the port is closed
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };

    let fetcher = ReqwestFetcher::from_config(&CrawlConfig::default()).unwrap();
    let result = fetcher.get(&uri).await;

    assert!(matches!(result, Err(CrawlError::Http { .. })));
}
