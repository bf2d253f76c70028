use super::rules::{Rule, evaluate};
use super::{Analyzer, AnalyzerParams, finish};
use crate::models::{Category, CategoryResult, LinkStatus, PageData, ProbeOutcome, Severity};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkClass {
    Working,
    Redirect,
    ClientError,
    ServerError,
    UnexpectedStatus,
    Timeout,
    Unreachable,
}

pub fn classify(outcome: &ProbeOutcome) -> LinkClass {
    match outcome {
        ProbeOutcome::Status(code) => match code {
            200..=299 => LinkClass::Working,
            300..=399 => LinkClass::Redirect,
            400..=499 => LinkClass::ClientError,
            500..=599 => LinkClass::ServerError,
            _ => LinkClass::UnexpectedStatus,
        },
        ProbeOutcome::Timeout => LinkClass::Timeout,
        ProbeOutcome::Unreachable(_) => LinkClass::Unreachable,
    }
}

#[derive(Debug, Serialize)]
struct LinkHealthFacts {
    total: usize,
    working: usize,
    broken: usize,
    redirects: usize,
    statuses: Vec<LinkStatus>,
}

fn matching(facts: &LinkHealthFacts, class: LinkClass, describe: fn(&LinkStatus) -> String) -> Vec<String> {
    facts
        .statuses
        .iter()
        .filter(|status| classify(&status.outcome) == class)
        .map(describe)
        .collect()
}

fn status_code(status: &LinkStatus) -> String {
    match &status.outcome {
        ProbeOutcome::Status(code) => code.to_string(),
        ProbeOutcome::Timeout => "timeout".to_string(),
        ProbeOutcome::Unreachable(reason) => reason.clone(),
    }
}

fn server_error(facts: &LinkHealthFacts) -> Vec<String> {
    matching(facts, LinkClass::ServerError, |s| {
        format!("Broken link (HTTP {}): {}", status_code(s), s.url)
    })
}

fn timeout(facts: &LinkHealthFacts) -> Vec<String> {
    matching(facts, LinkClass::Timeout, |s| {
        format!("Link timed out: {}", s.url)
    })
}

fn unreachable(facts: &LinkHealthFacts) -> Vec<String> {
    matching(facts, LinkClass::Unreachable, |s| {
        format!("Link is unreachable ({}): {}", status_code(s), s.url)
    })
}

fn client_error(facts: &LinkHealthFacts) -> Vec<String> {
    matching(facts, LinkClass::ClientError, |s| {
        format!("Broken link (HTTP {}): {}", status_code(s), s.url)
    })
}

fn unexpected_status(facts: &LinkHealthFacts) -> Vec<String> {
    matching(facts, LinkClass::UnexpectedStatus, |s| {
        format!("Link returned unexpected status {}: {}", status_code(s), s.url)
    })
}

fn redirect(facts: &LinkHealthFacts) -> Vec<String> {
    matching(facts, LinkClass::Redirect, |s| {
        format!("Link redirects (HTTP {}): {}", status_code(s), s.url)
    })
}

// Penalties are zero: the score is the working ratio.
const RULES: &[Rule<LinkHealthFacts>] = &[
    Rule::each("server_error", Severity::High, 0, usize::MAX, server_error),
    Rule::each("timeout", Severity::High, 0, usize::MAX, timeout),
    Rule::each("unreachable", Severity::High, 0, usize::MAX, unreachable),
    Rule::each("client_error", Severity::Medium, 0, usize::MAX, client_error),
    Rule::each("unexpected_status", Severity::Medium, 0, usize::MAX, unexpected_status),
    Rule::each("redirect", Severity::Low, 0, usize::MAX, redirect),
];

/// round(100 * working / total); a page without probed links scores 100
pub fn health_score(working: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((working * 200 + total) / (total * 2)).min(100) as u8
}

pub struct LinkHealthAnalyzer;

impl Analyzer for LinkHealthAnalyzer {
    fn category(&self) -> Category {
        Category::LinkHealth
    }

    fn applies(&self, page: &PageData, _params: &AnalyzerParams) -> bool {
        page.linked_resource_statuses.is_some()
    }

    fn analyze(&self, page: &PageData, _params: &AnalyzerParams) -> CategoryResult {
        let statuses = page.linked_resource_statuses.clone().unwrap_or_default();
        let classes: Vec<LinkClass> = statuses.iter().map(|s| classify(&s.outcome)).collect();

        let redirects = classes.iter().filter(|c| **c == LinkClass::Redirect).count();
        let working = classes.iter().filter(|c| **c == LinkClass::Working).count() + redirects;

        let facts = LinkHealthFacts {
            total: statuses.len(),
            working,
            broken: statuses.len() - working,
            redirects,
            statuses,
        };

        let mut outcome = evaluate(Category::LinkHealth, &facts, RULES);
        outcome.score = health_score(facts.working, facts.total);
        finish(Category::LinkHealth, outcome, &facts)
    }
}
