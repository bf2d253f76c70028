use super::rules::{Rule, evaluate, flag};
use super::{Analyzer, AnalyzerParams, finish};
use crate::models::{Category, CategoryResult, PageData, Severity};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use url::Url;

pub const MAX_LENGTH: usize = 100;
const MAX_QUERY_PARAMS: usize = 2;

static SPECIAL_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9\-/._~%]").expect("special chars regex should be valid"));
static DOUBLE_EXTENSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.(html?|php|aspx?)\.(html?|php|aspx?)$")
        .expect("double extension regex should be valid")
});
static DATED_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\d{4}/\d{2}/").expect("dated path regex should be valid"));

#[derive(Debug, Default, Serialize)]
struct UrlFacts {
    url: String,
    valid: bool,
    scheme: String,
    length: usize,
    path: String,
    query_params: usize,
    has_underscores: bool,
    has_uppercase: bool,
    has_special_chars: bool,
    has_double_extension: bool,
    has_date: bool,
}

fn invalid(facts: &UrlFacts) -> Option<String> {
    flag(!facts.valid, || format!("URL could not be parsed: {}", facts.url))
}

fn not_https(facts: &UrlFacts) -> Option<String> {
    flag(facts.valid && facts.scheme != "https", || {
        "URL does not use HTTPS".to_string()
    })
}

fn double_extension(facts: &UrlFacts) -> Option<String> {
    flag(facts.has_double_extension, || {
        "URL has a duplicated file extension".to_string()
    })
}

fn too_long(facts: &UrlFacts) -> Option<String> {
    flag(facts.length > MAX_LENGTH, || {
        format!("URL is too long ({} chars, keep it under {})", facts.length, MAX_LENGTH)
    })
}

fn underscores(facts: &UrlFacts) -> Option<String> {
    flag(facts.has_underscores, || {
        "URL path uses underscores instead of hyphens".to_string()
    })
}

fn uppercase(facts: &UrlFacts) -> Option<String> {
    flag(facts.has_uppercase, || {
        "URL path contains uppercase characters".to_string()
    })
}

fn special_characters(facts: &UrlFacts) -> Option<String> {
    flag(facts.has_special_chars, || {
        "URL path contains special characters".to_string()
    })
}

fn query_heavy(facts: &UrlFacts) -> Option<String> {
    flag(facts.query_params > MAX_QUERY_PARAMS, || {
        format!("URL carries {} query parameters", facts.query_params)
    })
}

fn dated_path(facts: &UrlFacts) -> Option<String> {
    flag(facts.has_date, || {
        "URL contains a date, which can make content look outdated".to_string()
    })
}

const RULES: &[Rule<UrlFacts>] = &[
    Rule::once("invalid", Severity::High, 100, invalid),
    Rule::once("not_https", Severity::High, 20, not_https),
    Rule::once("double_extension", Severity::High, 30, double_extension),
    Rule::once("too_long", Severity::Medium, 15, too_long),
    Rule::once("underscores", Severity::Low, 10, underscores),
    Rule::once("uppercase", Severity::Low, 5, uppercase),
    Rule::once("special_characters", Severity::Low, 10, special_characters),
    Rule::once("query_heavy", Severity::Low, 10, query_heavy),
    Rule::once("dated_path", Severity::Low, 0, dated_path),
];

pub struct UrlAnalyzer;

impl Analyzer for UrlAnalyzer {
    fn category(&self) -> Category {
        Category::UrlStructure
    }

    fn analyze(&self, page: &PageData, _params: &AnalyzerParams) -> CategoryResult {
        let facts = match Url::parse(&page.url) {
            Ok(parsed) => {
                let path = parsed.path().to_string();
                UrlFacts {
                    url: page.url.clone(),
                    valid: true,
                    scheme: parsed.scheme().to_string(),
                    length: page.url.chars().count(),
                    query_params: parsed.query_pairs().count(),
                    has_underscores: path.contains('_'),
                    has_uppercase: path.chars().any(|c| c.is_ascii_uppercase()),
                    has_special_chars: SPECIAL_CHARS.is_match(&path),
                    has_double_extension: DOUBLE_EXTENSION.is_match(&path),
                    has_date: DATED_PATH.is_match(&path),
                    path,
                }
            }
            Err(_) => UrlFacts {
                url: page.url.clone(),
                ..Default::default()
            },
        };

        let outcome = evaluate(Category::UrlStructure, &facts, RULES);
        finish(Category::UrlStructure, outcome, &facts)
    }
}
