use super::rules::{Rule, evaluate, flag};
use super::{Analyzer, AnalyzerParams, finish};
use crate::models::{Category, CategoryResult, PageData, Severity};
use serde::Serialize;
use url::Url;

/// Recommended response headers, (header, display name)
pub const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("strict-transport-security", "Strict-Transport-Security (HSTS)"),
    ("content-security-policy", "Content-Security-Policy"),
    ("x-content-type-options", "X-Content-Type-Options"),
    ("x-frame-options", "X-Frame-Options"),
    ("x-xss-protection", "X-XSS-Protection"),
    ("referrer-policy", "Referrer-Policy"),
    ("permissions-policy", "Permissions-Policy"),
];

#[derive(Debug, Serialize)]
struct SecurityFacts {
    is_https: bool,
    present_headers: Vec<String>,
    missing_headers: Vec<String>,
    mixed_content: Vec<String>,
}

fn not_https(facts: &SecurityFacts) -> Option<String> {
    flag(!facts.is_https, || "Page is not served over HTTPS".to_string())
}

fn mixed_content(facts: &SecurityFacts) -> Option<String> {
    flag(!facts.mixed_content.is_empty(), || {
        format!(
            "{} resource(s) load over insecure HTTP on an HTTPS page",
            facts.mixed_content.len()
        )
    })
}

fn missing_header(facts: &SecurityFacts) -> Vec<String> {
    facts
        .missing_headers
        .iter()
        .map(|header| format!("Missing security header: {}", header))
        .collect()
}

const RULES: &[Rule<SecurityFacts>] = &[
    Rule::once("not_https", Severity::High, 40, not_https),
    Rule::once("mixed_content", Severity::High, 20, mixed_content),
    Rule::each("missing_header", Severity::Low, 5, usize::MAX, missing_header),
];

fn insecure_resources(page: &PageData) -> Vec<String> {
    let images = page.images.iter().map(|i| i.src.as_str());
    let scripts = page.scripts.iter().filter_map(|s| s.src.as_deref());
    let stylesheets = page.stylesheets.iter().map(|s| s.href.as_str());
    let iframes = page.iframes.iter().map(|f| f.src.as_str());

    images
        .chain(scripts)
        .chain(stylesheets)
        .chain(iframes)
        .filter(|src| src.to_ascii_lowercase().starts_with("http://"))
        .map(str::to_string)
        .collect()
}

pub struct SecurityAnalyzer;

impl Analyzer for SecurityAnalyzer {
    fn category(&self) -> Category {
        Category::Security
    }

    fn analyze(&self, page: &PageData, _params: &AnalyzerParams) -> CategoryResult {
        let is_https = Url::parse(page.effective_url()).is_ok_and(|url| url.scheme() == "https");

        let (present, missing): (Vec<_>, Vec<_>) = SECURITY_HEADERS
            .iter()
            .partition(|(header, _)| page.header(header).is_some());

        let facts = SecurityFacts {
            is_https,
            present_headers: present.iter().map(|(_, name)| name.to_string()).collect(),
            missing_headers: missing.iter().map(|(_, name)| name.to_string()).collect(),
            mixed_content: if is_https {
                insecure_resources(page)
            } else {
                Vec::new()
            },
        };

        let outcome = evaluate(Category::Security, &facts, RULES);
        finish(Category::Security, outcome, &facts)
    }
}
