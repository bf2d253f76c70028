use super::rules::{Rule, evaluate, flag};
use super::{Analyzer, AnalyzerParams, finish};
use crate::models::{Category, CategoryResult, Link, PageData, Severity};
use serde::Serialize;

const MIN_INTERNAL_LINKS: usize = 3;
const GENERIC_ANCHOR_RATIO: f64 = 0.1;

const GENERIC_ANCHORS: &[&str] = &[
    "click here",
    "click",
    "here",
    "read more",
    "more",
    "learn more",
    "link",
    "this",
    "this link",
    "go",
];

const SUSPICIOUS_MARKERS: &[&str] = &[".html.html", ".php.php", "undefined", "/404", "null"];

#[derive(Debug, Serialize)]
struct LinkFacts {
    total: usize,
    internal: usize,
    external: usize,
    empty_anchors: usize,
    generic_anchors: usize,
    generic_ratio: f64,
    suspicious: Vec<String>,
    unsafe_new_tab: usize,
}

fn no_internal(facts: &LinkFacts) -> Option<String> {
    flag(facts.internal == 0, || "Page has no internal links".to_string())
}

fn few_internal(facts: &LinkFacts) -> Option<String> {
    flag(facts.internal > 0 && facts.internal < MIN_INTERNAL_LINKS, || {
        format!("Page has only {} internal link(s)", facts.internal)
    })
}

fn no_external(facts: &LinkFacts) -> Option<String> {
    flag(facts.external == 0, || {
        "Page has no external links to authoritative sources".to_string()
    })
}

fn empty_anchor(facts: &LinkFacts) -> Option<String> {
    flag(facts.empty_anchors > 0, || {
        format!("{} link(s) have no anchor text", facts.empty_anchors)
    })
}

fn suspicious_href(facts: &LinkFacts) -> Option<String> {
    flag(!facts.suspicious.is_empty(), || {
        format!("{} link(s) look malformed or broken", facts.suspicious.len())
    })
}

fn generic_anchor(facts: &LinkFacts) -> Option<String> {
    flag(facts.generic_ratio > GENERIC_ANCHOR_RATIO, || {
        format!(
            "{} link(s) use generic anchor text like \"click here\"",
            facts.generic_anchors
        )
    })
}

fn unsafe_new_tab(facts: &LinkFacts) -> Option<String> {
    flag(facts.unsafe_new_tab > 0, || {
        format!(
            "{} external link(s) open a new tab without rel=\"noopener\"",
            facts.unsafe_new_tab
        )
    })
}

const RULES: &[Rule<LinkFacts>] = &[
    Rule::once("no_internal", Severity::Medium, 30, no_internal),
    Rule::once("few_internal", Severity::Low, 15, few_internal),
    Rule::once("no_external", Severity::Low, 5, no_external),
    Rule::once("empty_anchor", Severity::Medium, 10, empty_anchor),
    Rule::once("suspicious_href", Severity::Medium, 15, suspicious_href),
    Rule::once("generic_anchor", Severity::Low, 5, generic_anchor),
    Rule::once("unsafe_new_tab", Severity::Low, 0, unsafe_new_tab),
];

fn is_generic(link: &Link) -> bool {
    let anchor = link.anchor_text.trim().to_lowercase();
    GENERIC_ANCHORS.contains(&anchor.as_str())
}

fn opens_unsafely(link: &Link) -> bool {
    let new_tab = link
        .target
        .as_deref()
        .is_some_and(|target| target.eq_ignore_ascii_case("_blank"));
    let rel = link.rel.as_deref().unwrap_or("").to_lowercase();
    !link.is_internal && new_tab && !rel.contains("noopener") && !rel.contains("noreferrer")
}

pub struct LinksAnalyzer;

impl Analyzer for LinksAnalyzer {
    fn category(&self) -> Category {
        Category::Links
    }

    fn analyze(&self, page: &PageData, _params: &AnalyzerParams) -> CategoryResult {
        let total = page.links.len();
        let internal = page.links.iter().filter(|link| link.is_internal).count();
        let generic_anchors = page.links.iter().filter(|link| is_generic(link)).count();

        let facts = LinkFacts {
            total,
            internal,
            external: total - internal,
            empty_anchors: page
                .links
                .iter()
                .filter(|link| link.anchor_text.trim().is_empty())
                .count(),
            generic_anchors,
            generic_ratio: if total == 0 {
                0.0
            } else {
                generic_anchors as f64 / total as f64
            },
            suspicious: page
                .links
                .iter()
                .filter(|link| {
                    let href = link.href.to_lowercase();
                    SUSPICIOUS_MARKERS.iter().any(|marker| href.contains(marker))
                })
                .map(|link| link.href.clone())
                .collect(),
            unsafe_new_tab: page.links.iter().filter(|link| opens_unsafely(link)).count(),
        };

        let outcome = evaluate(Category::Links, &facts, RULES);
        finish(Category::Links, outcome, &facts)
    }
}
