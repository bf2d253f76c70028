use super::rules::{Rule, evaluate, flag};
use super::text::char_len;
use super::{Analyzer, AnalyzerParams, finish};
use crate::models::{Category, CategoryResult, PageData, Severity};
use serde::Serialize;

const MAX_H1_LENGTH: usize = 70;

#[derive(Debug, Serialize)]
struct HeadingFacts {
    h1_count: usize,
    h2_count: usize,
    total: usize,
    h1_texts: Vec<String>,
    /// First (from, to) pair that skips a level
    first_skip: Option<(u8, u8)>,
    outline: Vec<String>,
}

fn missing_h1(facts: &HeadingFacts) -> Option<String> {
    flag(facts.h1_count == 0, || "Page has no H1 heading".to_string())
}

fn multiple_h1(facts: &HeadingFacts) -> Option<String> {
    flag(facts.h1_count > 1, || {
        format!("Page has {} H1 headings, use exactly one", facts.h1_count)
    })
}

fn missing_h2(facts: &HeadingFacts) -> Option<String> {
    flag(facts.h2_count == 0, || {
        "Page has no H2 headings to structure its content".to_string()
    })
}

fn long_h1(facts: &HeadingFacts) -> Option<String> {
    let h1 = facts.h1_texts.first()?;
    flag(facts.h1_count == 1 && char_len(h1) > MAX_H1_LENGTH, || {
        format!("H1 is too long ({} chars)", char_len(h1))
    })
}

fn skipped_level(facts: &HeadingFacts) -> Option<String> {
    let (from, to) = facts.first_skip?;
    Some(format!("Heading hierarchy skips a level (H{} followed by H{})", from, to))
}

const RULES: &[Rule<HeadingFacts>] = &[
    Rule::once("missing_h1", Severity::High, 40, missing_h1),
    Rule::once("multiple_h1", Severity::Medium, 25, multiple_h1),
    Rule::once("missing_h2", Severity::Medium, 15, missing_h2),
    Rule::once("long_h1", Severity::Low, 10, long_h1),
    Rule::once("skipped_level", Severity::Low, 10, skipped_level),
];

pub struct HeadingsAnalyzer;

impl Analyzer for HeadingsAnalyzer {
    fn category(&self) -> Category {
        Category::Headings
    }

    fn analyze(&self, page: &PageData, _params: &AnalyzerParams) -> CategoryResult {
        let h1_texts: Vec<String> = page
            .headings
            .iter()
            .filter(|heading| heading.level == 1)
            .map(|heading| heading.text.trim().to_string())
            .collect();

        let first_skip = page
            .headings
            .windows(2)
            .map(|pair| (pair[0].level, pair[1].level))
            .find(|(from, to)| *to > from + 1);

        let facts = HeadingFacts {
            h1_count: h1_texts.len(),
            h2_count: page.headings.iter().filter(|h| h.level == 2).count(),
            total: page.headings.len(),
            h1_texts,
            first_skip,
            outline: page
                .headings
                .iter()
                .map(|h| format!("H{}: {}", h.level, h.text.trim()))
                .collect(),
        };

        let outcome = evaluate(Category::Headings, &facts, RULES);
        finish(Category::Headings, outcome, &facts)
    }
}
