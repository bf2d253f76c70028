use super::rules::{Rule, evaluate, flag};
use super::text::{keyword_density, round2};
use super::{Analyzer, AnalyzerParams, finish};
use crate::models::{Category, CategoryResult, PageData, Severity};
use serde::Serialize;

pub const MIN_WORDS: usize = 300;
pub const GOOD_WORDS: usize = 600;
pub const MIN_DENSITY: f64 = 0.5;
pub const MAX_DENSITY: f64 = 3.0;
const MIN_PARAGRAPHS: usize = 3;

#[derive(Debug, Serialize)]
struct ContentFacts {
    word_count: usize,
    paragraph_count: usize,
    keyword: Option<String>,
    keyword_density: Option<f64>,
}

fn very_thin(facts: &ContentFacts) -> Option<String> {
    flag(facts.word_count < MIN_WORDS, || {
        format!(
            "Content is very thin ({} words, aim for at least {})",
            facts.word_count, MIN_WORDS
        )
    })
}

fn thin(facts: &ContentFacts) -> Option<String> {
    flag((MIN_WORDS..GOOD_WORDS).contains(&facts.word_count), || {
        format!(
            "Content is on the short side ({} words, {}+ performs better)",
            facts.word_count, GOOD_WORDS
        )
    })
}

fn keyword_density_high(facts: &ContentFacts) -> Option<String> {
    let density = facts.keyword_density?;
    flag(density > MAX_DENSITY, || {
        format!(
            "Keyword density is {:.2}%, above {}% looks like keyword stuffing",
            density, MAX_DENSITY
        )
    })
}

fn keyword_density_low(facts: &ContentFacts) -> Option<String> {
    let density = facts.keyword_density?;
    flag(density < MIN_DENSITY, || {
        format!("Keyword density is {:.2}%, below {}%", density, MIN_DENSITY)
    })
}

fn few_paragraphs(facts: &ContentFacts) -> Option<String> {
    flag(facts.paragraph_count < MIN_PARAGRAPHS, || {
        format!("Only {} paragraph(s) of body text", facts.paragraph_count)
    })
}

const RULES: &[Rule<ContentFacts>] = &[
    Rule::once("very_thin", Severity::High, 30, very_thin),
    Rule::once("thin", Severity::Medium, 15, thin),
    Rule::once("keyword_density_high", Severity::Medium, 20, keyword_density_high),
    Rule::once("keyword_density_low", Severity::Medium, 10, keyword_density_low),
    Rule::once("few_paragraphs", Severity::Low, 10, few_paragraphs),
];

pub struct ContentAnalyzer;

impl Analyzer for ContentAnalyzer {
    fn category(&self) -> Category {
        Category::Content
    }

    fn analyze(&self, page: &PageData, params: &AnalyzerParams) -> CategoryResult {
        let keyword = params.keyword();
        let density = keyword.map(|keyword| keyword_density(&page.text_content, keyword).unwrap_or(0.0));

        let facts = ContentFacts {
            word_count: page.word_count,
            paragraph_count: page
                .paragraphs
                .iter()
                .filter(|p| !p.trim().is_empty())
                .count(),
            keyword: keyword.map(str::to_string),
            keyword_density: density.map(round2),
        };

        let outcome = evaluate(Category::Content, &facts, RULES);
        finish(Category::Content, outcome, &facts)
    }
}
