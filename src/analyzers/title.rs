use super::rules::{Rule, evaluate, flag};
use super::text::{char_len, contains_keyword};
use super::{Analyzer, AnalyzerParams, finish};
use crate::models::{Category, CategoryResult, PageData, Severity};
use serde::Serialize;

pub const MIN_LENGTH: usize = 30;
pub const OPTIMAL_MIN_LENGTH: usize = 50;
pub const MAX_LENGTH: usize = 60;
const KEYWORD_BONUS: u8 = 5;

const BOILERPLATE_TITLES: &[&str] = &[
    "home",
    "homepage",
    "home page",
    "index",
    "untitled",
    "untitled document",
    "welcome",
    "new page",
    "page",
    "document",
];

#[derive(Debug, Serialize)]
struct TitleFacts {
    title: Option<String>,
    length: usize,
    is_boilerplate: bool,
    keyword_in_title: Option<bool>,
}

fn missing(facts: &TitleFacts) -> Option<String> {
    flag(facts.title.is_none(), || "Title tag is missing".to_string())
}

fn too_short(facts: &TitleFacts) -> Option<String> {
    flag(facts.title.is_some() && facts.length < MIN_LENGTH, || {
        format!(
            "Title is too short ({} chars, recommended {}-{})",
            facts.length, OPTIMAL_MIN_LENGTH, MAX_LENGTH
        )
    })
}

fn too_long(facts: &TitleFacts) -> Option<String> {
    flag(facts.length > MAX_LENGTH, || {
        format!(
            "Title is too long ({} chars) and may be truncated in search results",
            facts.length
        )
    })
}

fn below_optimal(facts: &TitleFacts) -> Option<String> {
    flag(
        (MIN_LENGTH..OPTIMAL_MIN_LENGTH).contains(&facts.length),
        || {
            format!(
                "Title is acceptable but below the optimal {}-{} chars ({} chars)",
                OPTIMAL_MIN_LENGTH, MAX_LENGTH, facts.length
            )
        },
    )
}

fn boilerplate(facts: &TitleFacts) -> Option<String> {
    flag(facts.is_boilerplate, || {
        "Title is generic boilerplate or repeats the page URL".to_string()
    })
}

const RULES: &[Rule<TitleFacts>] = &[
    Rule::once("missing", Severity::High, 100, missing),
    Rule::once("too_short", Severity::Medium, 30, too_short),
    Rule::once("too_long", Severity::Medium, 20, too_long),
    Rule::once("below_optimal", Severity::Low, 5, below_optimal),
    Rule::once("boilerplate", Severity::Low, 10, boilerplate),
];

pub struct TitleAnalyzer;

impl Analyzer for TitleAnalyzer {
    fn category(&self) -> Category {
        Category::Title
    }

    fn analyze(&self, page: &PageData, params: &AnalyzerParams) -> CategoryResult {
        let title = page
            .title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty());

        let is_boilerplate = title.is_some_and(|title| {
            let normalized = title.to_lowercase();
            BOILERPLATE_TITLES.contains(&normalized.as_str())
                || title == page.url
                || title == page.effective_url()
        });

        let keyword_in_title = params
            .keyword()
            .map(|keyword| title.is_some_and(|title| contains_keyword(title, keyword)));

        let facts = TitleFacts {
            title: title.map(str::to_string),
            length: title.map(char_len).unwrap_or(0),
            is_boilerplate,
            keyword_in_title,
        };

        let mut outcome = evaluate(Category::Title, &facts, RULES);
        if keyword_in_title == Some(true) {
            outcome = outcome.with_bonus(KEYWORD_BONUS);
        }

        finish(Category::Title, outcome, &facts)
    }
}
