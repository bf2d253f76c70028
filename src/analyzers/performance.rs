use super::rules::{Rule, evaluate, flag};
use super::{Analyzer, AnalyzerParams, finish};
use crate::models::{Category, CategoryResult, PageData, Severity};
use serde::Serialize;

pub const VERY_SLOW_MS: u64 = 3000;
pub const SLOW_MS: u64 = 1000;
pub const MAX_BLOCKING_SCRIPTS: usize = 3;
const MAX_EXTERNAL_SCRIPTS: usize = 10;
const MAX_STYLESHEETS: usize = 5;
const MAX_HTML_BYTES: usize = 100_000;

#[derive(Debug, Serialize)]
struct PerformanceFacts {
    response_time_ms: Option<u64>,
    html_bytes: usize,
    external_scripts: usize,
    blocking_scripts: usize,
    stylesheets: usize,
}

fn very_slow(facts: &PerformanceFacts) -> Option<String> {
    let elapsed = facts.response_time_ms?;
    flag(elapsed > VERY_SLOW_MS, || {
        format!("Server responded in {} ms, well over {} ms", elapsed, VERY_SLOW_MS)
    })
}

fn slow(facts: &PerformanceFacts) -> Option<String> {
    let elapsed = facts.response_time_ms?;
    flag(elapsed > SLOW_MS && elapsed <= VERY_SLOW_MS, || {
        format!("Server responded in {} ms, aim for under {} ms", elapsed, SLOW_MS)
    })
}

fn render_blocking(facts: &PerformanceFacts) -> Option<String> {
    flag(facts.blocking_scripts > MAX_BLOCKING_SCRIPTS, || {
        format!(
            "{} render-blocking scripts in <head>",
            facts.blocking_scripts
        )
    })
}

fn many_scripts(facts: &PerformanceFacts) -> Option<String> {
    flag(facts.external_scripts > MAX_EXTERNAL_SCRIPTS, || {
        format!("{} external scripts are loaded", facts.external_scripts)
    })
}

fn many_stylesheets(facts: &PerformanceFacts) -> Option<String> {
    flag(facts.stylesheets > MAX_STYLESHEETS, || {
        format!("{} stylesheets are loaded", facts.stylesheets)
    })
}

fn large_html(facts: &PerformanceFacts) -> Option<String> {
    flag(facts.html_bytes > MAX_HTML_BYTES, || {
        format!("HTML document is {} KB", facts.html_bytes / 1024)
    })
}

const RULES: &[Rule<PerformanceFacts>] = &[
    Rule::once("very_slow", Severity::High, 30, very_slow),
    Rule::once("slow", Severity::Medium, 15, slow),
    Rule::once("render_blocking", Severity::Medium, 10, render_blocking),
    Rule::once("many_scripts", Severity::Medium, 15, many_scripts),
    Rule::once("many_stylesheets", Severity::Low, 10, many_stylesheets),
    Rule::once("large_html", Severity::Low, 10, large_html),
];

pub struct PerformanceAnalyzer;

impl Analyzer for PerformanceAnalyzer {
    fn category(&self) -> Category {
        Category::Performance
    }

    fn analyze(&self, page: &PageData, _params: &AnalyzerParams) -> CategoryResult {
        let facts = PerformanceFacts {
            response_time_ms: page.response_time_ms,
            html_bytes: page.html.len(),
            external_scripts: page.scripts.iter().filter(|s| s.src.is_some()).count(),
            blocking_scripts: page.scripts.iter().filter(|s| s.is_blocking).count(),
            stylesheets: page.stylesheets.len(),
        };

        let outcome = evaluate(Category::Performance, &facts, RULES);
        finish(Category::Performance, outcome, &facts)
    }
}
