mod fixtures;
mod server;

use fixtures::good_page;
use seo_audit::auditor::Auditor;
use seo_audit::error::{FetchError, FetchErrorKind};
use seo_audit::fetcher::{FetchOptions, HttpFetcher, PageSource};
use seo_audit::models::{Category, OverallResult, PageData, Winner};
use server::start_test_server;
use std::time::Duration;

fn fetcher(check_links: bool) -> HttpFetcher {
    HttpFetcher::new(FetchOptions {
        timeout: Duration::from_secs(5),
        probe_timeout: Duration::from_millis(1000),
        check_links,
        ..Default::default()
    })
    .expect("Failed to create fetcher")
}

fn category_codes(result: &OverallResult, category: Category) -> Vec<String> {
    result
        .categories
        .iter()
        .filter(|c| c.category == category)
        .flat_map(|c| c.issues.iter().map(|issue| issue.code.clone()))
        .collect()
}

/// Serves canned pages without touching the network
struct StaticSource;

impl PageSource for StaticSource {
    async fn fetch(&self, url: &str) -> Result<PageData, FetchError> {
        match url {
            "https://example.com/rust-guide" => Ok(good_page()),
            _ => Err(FetchError::new(FetchErrorKind::Dns, url, "no such host")),
        }
    }
}

#[tokio::test]
async fn test_fetch_parses_page_and_probes_site_files() {
    let base_url = start_test_server().await;
    let page = fetcher(false)
        .fetch(&format!("{}/", base_url))
        .await
        .expect("Fetch failed");

    assert_eq!(page.status_code, 200);
    assert!(page.response_time_ms.is_some());
    assert_eq!(
        page.title.as_deref(),
        Some("Rust Web Performance Guide: Faster Pages with Async Rust")
    );
    assert_eq!(page.header("x-content-type-options"), Some("nosniff"));
    assert_eq!(page.lang.as_deref(), Some("en"));
    assert_eq!(page.json_ld.len(), 1);

    let robots = page.robots_txt.as_ref().expect("robots.txt should be probed");
    assert!(robots.is_present());
    assert!(robots.body.contains("Disallow: /private"));

    let sitemap = page.sitemap_xml.as_ref().expect("sitemap should be probed");
    assert!(sitemap.is_present());
    assert!(sitemap.url.ends_with("/sitemap.xml"));
    assert!(page.linked_resource_statuses.is_none());
}

#[tokio::test]
async fn test_analyze_live_page() {
    let base_url = start_test_server().await;
    let auditor = Auditor::new(fetcher(false));

    let result = auditor
        .analyze(&format!("{}/", base_url), Some("rust"))
        .await
        .expect("Analysis failed");

    assert_eq!(result.category_scores.get(&Category::Sitemap), Some(&100));
    assert!(result.category_scores.contains_key(&Category::Keyword));
    assert!(!result.category_scores.contains_key(&Category::LinkHealth));
    // Served over plain http
    assert!(category_codes(&result, Category::Security).contains(&"not_https".to_string()));
}

#[tokio::test]
async fn test_page_blocked_by_robots() {
    let base_url = start_test_server().await;
    let auditor = Auditor::new(fetcher(false));

    let result = auditor
        .analyze(&format!("{}/private/page", base_url), None)
        .await
        .expect("Analysis failed");

    assert!(
        category_codes(&result, Category::Sitemap).contains(&"blocked_by_robots".to_string())
    );
    assert!(
        result
            .priority_issues
            .high
            .iter()
            .any(|issue| issue.code == "blocked_by_robots")
    );
}

#[tokio::test]
async fn test_http_error_is_terminal() {
    let base_url = start_test_server().await;
    let auditor = Auditor::new(fetcher(false));

    let error = auditor
        .analyze(&format!("{}/does-not-exist", base_url), None)
        .await
        .expect_err("A 404 page should not be analyzed");

    assert_eq!(error.kind, FetchErrorKind::HttpError);
    assert_eq!(error.message, "HTTP 404");
}

#[tokio::test]
async fn test_connection_failure_is_terminal() {
    let error = fetcher(false)
        .fetch("http://127.0.0.1:1/")
        .await
        .expect_err("Nothing listens on port 1");

    assert_ne!(error.kind, FetchErrorKind::HttpError);
    assert_ne!(error.kind, FetchErrorKind::InvalidUrl);
}

#[tokio::test]
async fn test_unsupported_scheme_is_rejected_before_fetching() {
    let error = fetcher(false)
        .fetch("ftp://example.com/file")
        .await
        .expect_err("ftp is not supported");

    assert_eq!(error.kind, FetchErrorKind::InvalidUrl);
}

#[tokio::test]
async fn test_compare_live_pages() {
    let base_url = start_test_server().await;
    let auditor = Auditor::new(fetcher(false));

    let comparison = auditor
        .compare(&format!("{}/", base_url), &format!("{}/thin", base_url), None)
        .await
        .expect("Comparison failed");

    assert_eq!(comparison.winner, Winner::YourSite);
    assert!(comparison.categories[&Category::Title].delta > 0);
}

#[tokio::test]
async fn test_compare_fails_when_either_side_fails() {
    let auditor = Auditor::new(StaticSource);

    let error = auditor
        .compare("https://example.com/rust-guide", "https://missing.example/", None)
        .await
        .expect_err("Competitor fetch should fail");

    assert_eq!(error.kind, FetchErrorKind::Dns);
    assert_eq!(error.url, "https://missing.example/");
}

#[tokio::test]
async fn test_auditor_with_custom_source() {
    let auditor = Auditor::new(StaticSource);

    let result = auditor
        .analyze("https://example.com/rust-guide", Some("rust"))
        .await
        .expect("Analysis failed");

    assert_eq!(result.url, "https://example.com/rust-guide");
    assert_eq!(result.category_scores.get(&Category::Keyword), Some(&100));
}
