use super::content::{MAX_DENSITY, MIN_DENSITY};
use super::rules::{Rule, evaluate, flag};
use super::text::{contains_keyword, count_phrase, round2, tokens};
use super::{Analyzer, AnalyzerParams, finish};
use crate::models::{Category, CategoryResult, PageData, Severity};
use serde::Serialize;
use std::collections::HashMap;

const TOP_KEYWORDS: usize = 10;

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "also", "am", "an", "and", "any", "are", "as",
    "at", "be", "because", "been", "before", "being", "below", "between", "both", "but", "by",
    "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from",
    "further", "had", "has", "have", "having", "he", "her", "here", "hers", "him", "his", "how",
    "i", "if", "in", "into", "is", "it", "its", "just", "me", "more", "most", "my", "no", "nor",
    "not", "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours", "out", "over",
    "own", "same", "she", "should", "so", "some", "such", "than", "that", "the", "their", "them",
    "then", "there", "these", "they", "this", "those", "through", "to", "too", "under", "until",
    "up", "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom",
    "why", "will", "with", "would", "you", "your", "yours",
];

#[derive(Debug, Serialize, PartialEq)]
pub struct TermCount {
    pub word: String,
    pub count: usize,
    pub density: f64,
}

#[derive(Debug, Serialize)]
struct KeywordFacts {
    keyword: String,
    occurrences: usize,
    total_words: usize,
    density: f64,
    in_title: bool,
    in_h1: bool,
    in_meta_description: bool,
    in_first_paragraph: bool,
    placement_score: u8,
    top_keywords: Vec<TermCount>,
}

fn density_low(facts: &KeywordFacts) -> Option<String> {
    flag(facts.density < MIN_DENSITY, || {
        format!(
            "\"{}\" appears {} time(s), density {:.2}% is below {}%",
            facts.keyword, facts.occurrences, facts.density, MIN_DENSITY
        )
    })
}

fn density_high(facts: &KeywordFacts) -> Option<String> {
    flag(facts.density > MAX_DENSITY, || {
        format!(
            "\"{}\" density {:.2}% is above {}%",
            facts.keyword, facts.density, MAX_DENSITY
        )
    })
}

fn not_in_title(facts: &KeywordFacts) -> Option<String> {
    flag(!facts.in_title, || format!("\"{}\" is not in the title", facts.keyword))
}

fn not_in_h1(facts: &KeywordFacts) -> Option<String> {
    flag(!facts.in_h1, || format!("\"{}\" is not in the H1", facts.keyword))
}

fn not_in_meta(facts: &KeywordFacts) -> Option<String> {
    flag(!facts.in_meta_description, || {
        format!("\"{}\" is not in the meta description", facts.keyword)
    })
}

fn not_in_first_paragraph(facts: &KeywordFacts) -> Option<String> {
    flag(!facts.in_first_paragraph, || {
        format!("\"{}\" is not in the first paragraph", facts.keyword)
    })
}

const RULES: &[Rule<KeywordFacts>] = &[
    Rule::once("density_low", Severity::Medium, 15, density_low),
    Rule::once("density_high", Severity::Medium, 20, density_high),
    Rule::once("not_in_title", Severity::Low, 10, not_in_title),
    Rule::once("not_in_h1", Severity::Low, 10, not_in_h1),
    Rule::once("not_in_meta", Severity::Low, 10, not_in_meta),
    Rule::once("not_in_first_paragraph", Severity::Low, 5, not_in_first_paragraph),
];

/// Most frequent non-stop-words, by count then alphabetically
pub fn top_keywords(words: &[String], limit: usize) -> Vec<TermCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for word in words {
        if word.chars().count() > 2 && !STOP_WORDS.contains(&word.as_str()) {
            *counts.entry(word.as_str()).or_default() += 1;
        }
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    ranked
        .into_iter()
        .take(limit)
        .map(|(word, count)| TermCount {
            word: word.to_string(),
            count,
            density: round2(count as f64 / words.len() as f64 * 100.0),
        })
        .collect()
}

pub struct KeywordAnalyzer;

impl Analyzer for KeywordAnalyzer {
    fn category(&self) -> Category {
        Category::Keyword
    }

    fn applies(&self, _page: &PageData, params: &AnalyzerParams) -> bool {
        params.keyword().is_some()
    }

    fn analyze(&self, page: &PageData, params: &AnalyzerParams) -> CategoryResult {
        let keyword = params.keyword().unwrap_or_default();
        let words = tokens(&page.text_content);
        let occurrences = count_phrase(&words, &tokens(keyword));

        let in_title = page
            .title
            .as_deref()
            .is_some_and(|title| contains_keyword(title, keyword));
        let in_h1 = page
            .headings
            .iter()
            .any(|h| h.level == 1 && contains_keyword(&h.text, keyword));
        let in_meta_description = page
            .meta("description")
            .is_some_and(|description| contains_keyword(description, keyword));
        let in_first_paragraph = page
            .paragraphs
            .iter()
            .find(|p| !p.trim().is_empty())
            .is_some_and(|p| contains_keyword(p, keyword));

        let placement_score = [in_title, in_h1, in_meta_description, in_first_paragraph]
            .iter()
            .filter(|placed| **placed)
            .count() as u8
            * 25;

        let facts = KeywordFacts {
            keyword: keyword.to_string(),
            occurrences,
            total_words: words.len(),
            density: if words.is_empty() {
                0.0
            } else {
                round2(occurrences as f64 / words.len() as f64 * 100.0)
            },
            in_title,
            in_h1,
            in_meta_description,
            in_first_paragraph,
            placement_score,
            top_keywords: top_keywords(&words, TOP_KEYWORDS),
        };

        let outcome = evaluate(Category::Keyword, &facts, RULES);
        finish(Category::Keyword, outcome, &facts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_keywords_orders_by_count_then_word() {
        let words = tokens("rust cargo rust crates cargo rust the and zebra apple");
        let top = top_keywords(&words, 3);

        let ranked: Vec<(&str, usize)> = top.iter().map(|t| (t.word.as_str(), t.count)).collect();
        assert_eq!(ranked, vec![("rust", 3), ("cargo", 2), ("apple", 1)]);
    }
}
