use super::rules::{Rule, evaluate, flag};
use super::text::{char_len, tokens};
use super::{Analyzer, AnalyzerParams, finish};
use crate::models::{Category, CategoryResult, PageData, Severity};
use serde::Serialize;

pub const MIN_LENGTH: usize = 120;
pub const MAX_LENGTH: usize = 160;

const CALL_TO_ACTION_WORDS: &[&str] = &[
    "learn", "discover", "find", "get", "read", "try", "start", "explore", "see", "click", "shop",
    "buy", "join", "download", "contact",
];

#[derive(Debug, Serialize)]
struct MetaFacts {
    description: Option<String>,
    length: usize,
    has_call_to_action: bool,
}

fn missing(facts: &MetaFacts) -> Option<String> {
    flag(facts.description.is_none(), || {
        "Meta description is missing".to_string()
    })
}

fn too_short(facts: &MetaFacts) -> Option<String> {
    flag(facts.description.is_some() && facts.length < MIN_LENGTH, || {
        format!(
            "Meta description is too short ({} chars, recommended {}-{})",
            facts.length, MIN_LENGTH, MAX_LENGTH
        )
    })
}

fn too_long(facts: &MetaFacts) -> Option<String> {
    flag(facts.length > MAX_LENGTH, || {
        format!(
            "Meta description is too long ({} chars, recommended {}-{})",
            facts.length, MIN_LENGTH, MAX_LENGTH
        )
    })
}

fn no_call_to_action(facts: &MetaFacts) -> Option<String> {
    flag(facts.description.is_some() && !facts.has_call_to_action, || {
        "Meta description has no call-to-action phrase".to_string()
    })
}

fn truncated(facts: &MetaFacts) -> Option<String> {
    let description = facts.description.as_deref()?;
    flag(
        description.ends_with("...") || description.ends_with('\u{2026}'),
        || "Meta description ends with an ellipsis and looks truncated".to_string(),
    )
}

const RULES: &[Rule<MetaFacts>] = &[
    Rule::once("missing", Severity::High, 100, missing),
    Rule::once("too_short", Severity::Medium, 25, too_short),
    Rule::once("too_long", Severity::Medium, 15, too_long),
    Rule::once("no_call_to_action", Severity::Low, 10, no_call_to_action),
    Rule::once("truncated", Severity::Low, 10, truncated),
];

pub struct MetaDescriptionAnalyzer;

impl Analyzer for MetaDescriptionAnalyzer {
    fn category(&self) -> Category {
        Category::MetaDescription
    }

    fn analyze(&self, page: &PageData, _params: &AnalyzerParams) -> CategoryResult {
        let description = page.meta("description");

        let has_call_to_action = description.is_some_and(|description| {
            tokens(description)
                .iter()
                .any(|word| CALL_TO_ACTION_WORDS.contains(&word.as_str()))
        });

        let facts = MetaFacts {
            description: description.map(str::to_string),
            length: description.map(char_len).unwrap_or(0),
            has_call_to_action,
        };

        let outcome = evaluate(Category::MetaDescription, &facts, RULES);
        finish(Category::MetaDescription, outcome, &facts)
    }
}
