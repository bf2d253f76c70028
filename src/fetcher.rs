use crate::error::{FetchError, FetchErrorKind};
use crate::http_client::build_http_client;
use crate::link_checker::{LinkChecker, LinkCheckerConfig, collect_targets};
use crate::models::PageData;
use crate::parser::{RawPage, parse_page};
use crate::robots::probe_site_files;
use std::collections::BTreeMap;
use std::future::Future;
use std::time::{Duration, Instant};
use url::Url;

/// Anything that can turn a URL into a [`PageData`] snapshot
pub trait PageSource: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<PageData, FetchError>> + Send;
}

/// Configuration for the HTTP fetcher
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub probe_timeout: Duration,
    pub max_links: usize,
    pub concurrency: usize,
    pub rate_limit: Option<f64>,
    pub check_links: bool,
    pub check_sitemap: bool,
    pub show_progress: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            probe_timeout: Duration::from_millis(5000),
            max_links: 50,
            concurrency: 10,
            rate_limit: None,
            check_links: true,
            check_sitemap: true,
            show_progress: false,
        }
    }
}

/// Fetches pages over HTTP, then probes robots.txt, the sitemap and linked
/// resources as configured
pub struct HttpFetcher {
    client: reqwest::Client,
    probe_client: reqwest::Client,
    link_checker: LinkChecker,
    options: FetchOptions,
}

impl HttpFetcher {
    pub fn new(options: FetchOptions) -> anyhow::Result<Self> {
        let mut link_checker = LinkChecker::new(LinkCheckerConfig {
            timeout: options.probe_timeout,
            concurrency: options.concurrency,
            requests_per_second: options.rate_limit,
        })?;
        if options.show_progress {
            link_checker.enable_progress_bar();
        }

        Ok(Self {
            client: build_http_client(options.timeout, true)?,
            probe_client: build_http_client(options.probe_timeout, true)?,
            link_checker,
            options,
        })
    }

    async fn fetch_page(&self, url: &str) -> Result<PageData, FetchError> {
        let target = normalize_url(url)?;
        tracing::info!(url = %target, "Fetching page");

        let start = Instant::now();
        let response = self
            .client
            .get(target.as_str())
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(target.as_str(), &e))?;
        let response_time_ms = start.elapsed().as_millis() as u64;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FetchErrorKind::HttpError,
                target.as_str(),
                format!("HTTP {}", status.as_u16()),
            ));
        }

        let final_url = response.url().to_string();
        let mut headers: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers
                    .entry(name.as_str().to_lowercase())
                    .and_modify(|existing| {
                        existing.push_str(", ");
                        existing.push_str(value);
                    })
                    .or_insert_with(|| value.to_string());
            }
        }

        let html = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(target.as_str(), &e))?;

        tracing::info!(
            url = %final_url,
            status = status.as_u16(),
            elapsed_ms = response_time_ms,
            bytes = html.len(),
            "Fetched page"
        );

        Ok(parse_page(RawPage {
            url: target.to_string(),
            final_url,
            status_code: status.as_u16(),
            response_time_ms: Some(response_time_ms),
            headers,
            html,
        }))
    }

    /// Fills in the probe augmentations of a parsed page
    async fn augment(&self, mut page: PageData) -> PageData {
        let site_files = async {
            if !self.options.check_sitemap {
                return None;
            }
            let page_url = Url::parse(page.effective_url()).ok()?;
            Some(probe_site_files(&self.probe_client, &page_url).await)
        };

        let link_statuses = async {
            if !self.options.check_links {
                return None;
            }
            let targets = collect_targets(&page.links, self.options.max_links);
            tracing::debug!(links = targets.len(), "Probing linked resources");
            Some(self.link_checker.check_all(targets).await)
        };

        let (site_files, link_statuses) = tokio::join!(site_files, link_statuses);

        if let Some((robots, sitemap)) = site_files {
            page.robots_txt = Some(robots);
            page.sitemap_xml = Some(sitemap);
        }
        page.linked_resource_statuses = link_statuses;
        page
    }
}

impl PageSource for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<PageData, FetchError> {
        let page = self.fetch_page(url).await?;
        Ok(self.augment(page).await)
    }
}

/// Parses a user-supplied URL, assuming https when no scheme is given.
/// Only http and https are accepted.
pub fn normalize_url(input: &str) -> Result<Url, FetchError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(FetchError::new(
            FetchErrorKind::InvalidUrl,
            input,
            "URL is empty",
        ));
    }

    let candidate = if input.contains("://") {
        input.to_string()
    } else {
        format!("https://{}", input)
    };

    let url = Url::parse(&candidate)
        .map_err(|e| FetchError::new(FetchErrorKind::InvalidUrl, input, e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(FetchError::new(
                FetchErrorKind::InvalidUrl,
                input,
                format!(
                    "Invalid URL scheme '{}': only http and https are supported",
                    scheme
                ),
            ));
        }
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(FetchError::new(
            FetchErrorKind::InvalidUrl,
            input,
            "URL has no host",
        ));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url() {
        struct TestCase {
            input: &'static str,
            expected: Option<&'static str>,
        }

        let cases = [
            TestCase {
                input: "example.com",
                expected: Some("https://example.com/"),
            },
            TestCase {
                input: "  http://example.com/path?q=1 ",
                expected: Some("http://example.com/path?q=1"),
            },
            TestCase {
                input: "https://example.com/a",
                expected: Some("https://example.com/a"),
            },
            TestCase {
                input: "ftp://example.com/file",
                expected: None,
            },
            TestCase {
                input: "",
                expected: None,
            },
            TestCase {
                input: "https://",
                expected: None,
            },
        ];

        for case in cases {
            let result = normalize_url(case.input);
            match case.expected {
                Some(expected) => assert_eq!(
                    result.as_ref().map(Url::as_str).ok(),
                    Some(expected),
                    "input: {:?}",
                    case.input
                ),
                None => {
                    let error = result.expect_err(case.input);
                    assert_eq!(error.kind, FetchErrorKind::InvalidUrl);
                }
            }
        }
    }
}
