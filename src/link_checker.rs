use crate::http_client::build_http_client;
use crate::models::{Link, LinkStatus, ProbeOutcome};
use anyhow::Result;
use futures::stream::{self, StreamExt};
use governor::{
    Quota, RateLimiter, clock::DefaultClock, state::InMemoryState, state::direct::NotKeyed,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::num::NonZeroU32;
use std::time::Duration;

/// Settings for probing a page's outbound links
#[derive(Debug, Clone)]
pub struct LinkCheckerConfig {
    pub timeout: Duration,
    pub concurrency: usize,
    pub requests_per_second: Option<f64>,
}

impl Default for LinkCheckerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(5000),
            concurrency: 10,
            requests_per_second: None,
        }
    }
}

pub struct LinkChecker {
    client: reqwest::Client,
    timeout: Duration,
    concurrency: usize,
    rate_limiter: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    show_progress: bool,
}

impl LinkChecker {
    pub fn new(config: LinkCheckerConfig) -> Result<Self> {
        // Only positive, finite rates produce a limiter
        let rate_limiter = config
            .requests_per_second
            .filter(|rps| rps.is_finite() && *rps > 0.0)
            .and_then(|rps| NonZeroU32::new(rps.ceil() as u32))
            .map(|rps| RateLimiter::direct(Quota::per_second(rps)));

        Ok(Self {
            // Redirects are reported, not followed
            client: build_http_client(config.timeout, false)?,
            timeout: config.timeout,
            concurrency: config.concurrency.max(1),
            rate_limiter,
            show_progress: false,
        })
    }

    /// Enable a progress spinner for each probe run
    pub fn enable_progress_bar(&mut self) {
        self.show_progress = true;
    }

    fn progress_bar(&self, total: usize) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("[{elapsed_precise}] {spinner:.cyan} Checking links: {pos}/{len}")
                .expect("Progress bar template should be valid"),
        );
        Some(pb)
    }

    /// Probes every URL, returning statuses in input order
    pub async fn check_all(&self, urls: Vec<String>) -> Vec<LinkStatus> {
        let progress_bar = self.progress_bar(urls.len());
        let progress_bar = progress_bar.as_ref();

        let statuses = stream::iter(urls)
            .map(|url| async move {
                if let Some(limiter) = &self.rate_limiter {
                    limiter.until_ready().await;
                }

                let outcome = self.check_link(&url).await;
                if let Some(pb) = progress_bar {
                    pb.inc(1);
                }
                LinkStatus { url, outcome }
            })
            .buffered(self.concurrency)
            .collect::<Vec<_>>()
            .await;

        if let Some(pb) = progress_bar {
            pb.finish_and_clear();
        }

        statuses
    }

    async fn check_link(&self, url: &str) -> ProbeOutcome {
        // Use GET with full browser-like headers (many sites block HEAD requests)
        let outcome = match tokio::time::timeout(self.timeout, self.client.get(url).send()).await {
            Ok(Ok(response)) => ProbeOutcome::Status(response.status().as_u16()),
            Ok(Err(e)) if e.is_timeout() => ProbeOutcome::Timeout,
            Ok(Err(e)) => {
                tracing::warn!(url = %url, error = %e, "Link probe failed");
                ProbeOutcome::Unreachable(crate::error::error_chain(&e))
            }
            Err(_) => ProbeOutcome::Timeout,
        };

        if outcome == ProbeOutcome::Timeout {
            tracing::debug!(url = %url, timeout_ms = self.timeout.as_millis() as u64, "Link probe timed out");
        }
        outcome
    }
}

/// Unique http(s) link targets in document order, at most `max`
pub fn collect_targets(links: &[Link], max: usize) -> Vec<String> {
    let mut seen = HashSet::new();

    links
        .iter()
        .map(|link| link.href.split('#').next().unwrap_or_default())
        .filter(|href| href.starts_with("http://") || href.starts_with("https://"))
        .filter(|href| seen.insert(href.to_string()))
        .take(max)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(href: &str) -> Link {
        Link {
            href: href.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_collect_targets_dedupes_and_caps() {
        let links = vec![
            link("https://example.com/a"),
            link("https://example.com/a#section"),
            link("mailto:someone@example.com"),
            link("https://example.com/b"),
            link("http://other.org/"),
        ];

        assert_eq!(
            collect_targets(&links, 10),
            vec!["https://example.com/a", "https://example.com/b", "http://other.org/"]
        );
        assert_eq!(collect_targets(&links, 1), vec!["https://example.com/a"]);
        assert!(collect_targets(&links, 0).is_empty());
    }

    #[test]
    fn test_invalid_rate_limit_is_ignored() {
        let checker = LinkChecker::new(LinkCheckerConfig {
            requests_per_second: Some(0.0),
            ..Default::default()
        })
        .unwrap();
        assert!(checker.rate_limiter.is_none());
    }
}
