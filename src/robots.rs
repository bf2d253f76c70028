use crate::models::RemoteFile;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use url::Url;

static URL_ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<url[\s>]").expect("url entry regex should be valid"));
static SITEMAP_ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<sitemap[\s>]").expect("sitemap entry regex should be valid"));

/// Conventional sitemap locations tried after any robots.txt directives
const SITEMAP_FALLBACK_PATHS: &[&str] = &["/sitemap.xml", "/sitemap_index.xml"];

/// Represents a robots.txt rule (either Allow or Disallow)
#[derive(Debug, Clone)]
struct Rule {
    pattern: String,
    is_allow: bool,
}

/// Represents the parsed robots.txt file
#[derive(Debug, Default)]
pub struct RobotsTxt {
    /// Rules grouped by user-agent (lowercased)
    rules: HashMap<String, Vec<Rule>>,
    /// `Sitemap:` directives, in file order
    sitemaps: Vec<String>,
}

impl RobotsTxt {
    /// Parses robots.txt content. Consecutive `User-agent` lines share one
    /// group of rules; `Sitemap` lines apply globally.
    pub fn parse(content: &str) -> Self {
        let mut robots = Self::default();
        let mut current_agents: Vec<String> = Vec::new();
        let mut current_rules: Vec<Rule> = Vec::new();
        let mut in_rules = false;

        for line in content.lines() {
            // Strip trailing comments
            let line = line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }

            let Some((field, value)) = line.split_once(':') else {
                continue;
            };
            let field = field.trim().to_lowercase();
            let value = value.trim();

            match field.as_str() {
                "user-agent" => {
                    // A user-agent after rules starts a new group
                    if in_rules {
                        robots.save_group(&current_agents, &current_rules);
                        current_agents.clear();
                        current_rules.clear();
                        in_rules = false;
                    }
                    current_agents.push(value.to_lowercase());
                }
                "disallow" | "allow" => {
                    in_rules = true;
                    if !value.is_empty() {
                        current_rules.push(Rule {
                            pattern: value.to_string(),
                            is_allow: field == "allow",
                        });
                    }
                }
                "sitemap" => {
                    if !value.is_empty() {
                        robots.sitemaps.push(value.to_string());
                    }
                }
                _ => {
                    // Ignore other directives (Crawl-delay, Host, etc.)
                }
            }
        }

        robots.save_group(&current_agents, &current_rules);
        robots
    }

    fn save_group(&mut self, agents: &[String], rules: &[Rule]) {
        for agent in agents {
            self.rules
                .entry(agent.clone())
                .or_default()
                .extend(rules.iter().cloned());
        }
    }

    /// Checks if a path may be crawled by `user_agent`, falling back to the
    /// `*` group. Paths with no matching group are allowed.
    pub fn is_allowed(&self, path: &str, user_agent: &str) -> bool {
        let rules = self
            .rules
            .get(&user_agent.to_lowercase())
            .or_else(|| self.rules.get("*"));

        match rules {
            Some(rules) => check_rules(rules, path),
            None => true,
        }
    }

    pub fn sitemaps(&self) -> &[String] {
        &self.sitemaps
    }
}

/// Checks if a path matches any rules. The longest matching pattern wins and
/// Allow wins a tie.
fn check_rules(rules: &[Rule], path: &str) -> bool {
    let mut allowed = true;
    let mut most_specific_length = 0;

    for rule in rules {
        if path_matches(&rule.pattern, path) {
            let pattern_len = rule.pattern.len();
            if pattern_len > most_specific_length
                || (pattern_len == most_specific_length && rule.is_allow)
            {
                most_specific_length = pattern_len;
                allowed = rule.is_allow;
            }
        }
    }

    allowed
}

/// Checks if a path matches a pattern (supports * and $ wildcards)
fn path_matches(pattern: &str, path: &str) -> bool {
    let (pattern, must_end) = match pattern.strip_suffix('$') {
        Some(stripped) => (stripped, true),
        None => (pattern, false),
    };

    if !pattern.contains('*') {
        return if must_end {
            path == pattern
        } else {
            path.starts_with(pattern)
        };
    }

    // Each `*` becomes `.*`; the regex engine matches in linear time
    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    let anchored = format!("(?s)^{}{}", body, if must_end { "$" } else { "" });

    Regex::new(&anchored).is_ok_and(|re| re.is_match(path))
}

/// What a sitemap document contains
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SitemapSummary {
    /// `true` for a `<sitemapindex>` that lists other sitemaps
    pub is_index: bool,
    /// Number of `<url>` (or `<sitemap>` for an index) entries
    pub entries: usize,
}

impl SitemapSummary {
    /// Returns `None` when the body is not a sitemap document
    pub fn parse(body: &str) -> Option<Self> {
        let head = body.trim_start();
        let looks_like_xml = head.starts_with("<?xml")
            || head.starts_with("<urlset")
            || head.starts_with("<sitemapindex");
        if !looks_like_xml {
            return None;
        }

        let is_index = body.contains("<sitemapindex");
        let (is_urlset, entry) = if is_index {
            (false, &*SITEMAP_ENTRY)
        } else {
            (body.contains("<urlset"), &*URL_ENTRY)
        };
        if !is_index && !is_urlset {
            return None;
        }

        Some(Self {
            is_index,
            entries: entry.find_iter(body).count(),
        })
    }
}

/// Gets the robots.txt URL for a page URL
pub fn robots_url(page_url: &Url) -> String {
    site_url(page_url, "/robots.txt")
}

fn site_url(page_url: &Url, path: &str) -> String {
    let mut url = page_url.clone();
    url.set_path(path);
    url.set_query(None);
    url.set_fragment(None);
    url.to_string()
}

/// GETs a site file. Transport failures yield a file with no status.
pub async fn fetch_remote_file(client: &reqwest::Client, url: &str) -> RemoteFile {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::info!(url = %url, error = %e, "Could not fetch site file");
            return RemoteFile {
                url: url.to_string(),
                status_code: None,
                body: String::new(),
            };
        }
    };

    let status = response.status().as_u16();
    let body = if response.status().is_success() {
        response.text().await.unwrap_or_default()
    } else {
        tracing::info!(url = %url, status = status, "Site file not found");
        String::new()
    };

    RemoteFile {
        url: url.to_string(),
        status_code: Some(status),
        body,
    }
}

/// Fetches robots.txt and the first reachable sitemap for the page's site.
///
/// Sitemap candidates are the robots.txt `Sitemap` directives followed by
/// the conventional locations. When none answers 200 the first attempt is
/// returned so its status is still reported.
pub async fn probe_site_files(
    client: &reqwest::Client,
    page_url: &Url,
) -> (RemoteFile, RemoteFile) {
    let robots = fetch_remote_file(client, &robots_url(page_url)).await;

    let mut candidates: Vec<String> = if robots.is_present() {
        RobotsTxt::parse(&robots.body).sitemaps().to_vec()
    } else {
        Vec::new()
    };
    for path in SITEMAP_FALLBACK_PATHS {
        let candidate = site_url(page_url, path);
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }

    let mut first_attempt = None;
    for candidate in candidates {
        let sitemap = fetch_remote_file(client, &candidate).await;
        if sitemap.is_present() {
            return (robots, sitemap);
        }
        first_attempt.get_or_insert(sitemap);
    }

    let sitemap = first_attempt.unwrap_or_else(|| RemoteFile {
        url: site_url(page_url, SITEMAP_FALLBACK_PATHS[0]),
        status_code: None,
        body: String::new(),
    });
    (robots, sitemap)
}
