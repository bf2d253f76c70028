use super::rules::{Rule, evaluate, flag};
use super::text::round2;
use super::{Analyzer, AnalyzerParams, finish};
use crate::models::{Category, CategoryResult, PageData, Severity};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

const MIN_WORDS: usize = 20;
const MIN_SENTENCE_WORDS: usize = 3;
const MAX_AVG_SENTENCE_WORDS: f64 = 25.0;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-zA-Z]+").expect("word regex should be valid"));
static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("sentence regex should be valid"));

/// Sentence, word and syllable statistics for a block of prose
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStats {
    pub words: usize,
    pub sentences: usize,
    pub syllables: usize,
    pub complex_words: usize,
}

impl TextStats {
    pub fn from_text(text: &str) -> Self {
        let words: Vec<&str> = WORD
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|w| w.len() > 1)
            .collect();

        let sentences = SENTENCE_END
            .split(text)
            .filter(|sentence| sentence.split_whitespace().count() >= MIN_SENTENCE_WORDS)
            .count()
            .max(1);

        let syllable_counts: Vec<usize> = words.iter().map(|w| count_syllables(w)).collect();

        Self {
            words: words.len(),
            sentences,
            syllables: syllable_counts.iter().sum(),
            complex_words: syllable_counts.iter().filter(|count| **count >= 3).count(),
        }
    }

    fn words_per_sentence(&self) -> f64 {
        self.words as f64 / self.sentences as f64
    }

    fn syllables_per_word(&self) -> f64 {
        self.syllables as f64 / self.words.max(1) as f64
    }

    pub fn flesch_reading_ease(&self) -> f64 {
        206.835 - 1.015 * self.words_per_sentence() - 84.6 * self.syllables_per_word()
    }

    pub fn flesch_kincaid_grade(&self) -> f64 {
        0.39 * self.words_per_sentence() + 11.8 * self.syllables_per_word() - 15.59
    }

    pub fn gunning_fog(&self) -> f64 {
        let complex_ratio = self.complex_words as f64 / self.words.max(1) as f64;
        0.4 * (self.words_per_sentence() + 100.0 * complex_ratio)
    }
}

/// Vowel-group heuristic with silent-e and consonant-le adjustments
pub fn count_syllables(word: &str) -> usize {
    let word = word.to_lowercase();
    let chars: Vec<char> = word.chars().collect();
    let is_vowel = |c: char| "aeiouy".contains(c);

    let mut count = 0;
    let mut previous_vowel = false;
    for &c in &chars {
        let vowel = is_vowel(c);
        if vowel && !previous_vowel {
            count += 1;
        }
        previous_vowel = vowel;
    }

    let len = chars.len();
    if word.ends_with('e') && count > 1 {
        count -= 1;
    }
    if len > 2 && word.ends_with("le") && !is_vowel(chars[len - 3]) {
        count += 1;
    }

    count.max(1)
}

pub fn difficulty(flesch: f64) -> &'static str {
    match flesch {
        f if f >= 80.0 => "easy",
        f if f >= 60.0 => "standard",
        f if f >= 40.0 => "fairly_difficult",
        f if f >= 20.0 => "difficult",
        _ => "very_difficult",
    }
}

#[derive(Debug, Serialize)]
struct ReadabilityFacts {
    stats: TextStats,
    sufficient: bool,
    flesch_reading_ease: f64,
    flesch_kincaid_grade: f64,
    gunning_fog: f64,
    avg_sentence_length: f64,
    difficulty: &'static str,
}

fn insufficient_text(facts: &ReadabilityFacts) -> Option<String> {
    flag(!facts.sufficient, || {
        format!(
            "Only {} words of prose, too little to judge readability",
            facts.stats.words
        )
    })
}

fn flesch_band(facts: &ReadabilityFacts, low: f64, high: f64, wording: &str) -> Option<String> {
    let score = facts.flesch_reading_ease;
    flag(facts.sufficient && score >= low && score < high, || {
        format!("Flesch reading ease is {:.1}, {}", score, wording)
    })
}

fn difficult(facts: &ReadabilityFacts) -> Option<String> {
    flesch_band(facts, f64::NEG_INFINITY, 30.0, "very hard to read")
}

fn moderate(facts: &ReadabilityFacts) -> Option<String> {
    flesch_band(facts, 30.0, 50.0, "hard to read")
}

fn fairly_difficult(facts: &ReadabilityFacts) -> Option<String> {
    flesch_band(facts, 50.0, 70.0, "fairly hard to read")
}

fn long_sentences(facts: &ReadabilityFacts) -> Option<String> {
    flag(
        facts.sufficient && facts.avg_sentence_length > MAX_AVG_SENTENCE_WORDS,
        || {
            format!(
                "Sentences average {:.1} words, aim for under {}",
                facts.avg_sentence_length, MAX_AVG_SENTENCE_WORDS
            )
        },
    )
}

const RULES: &[Rule<ReadabilityFacts>] = &[
    Rule::once("insufficient_text", Severity::Medium, 50, insufficient_text),
    Rule::once("difficult", Severity::High, 60, difficult),
    Rule::once("moderate", Severity::Medium, 30, moderate),
    Rule::once("fairly_difficult", Severity::Low, 15, fairly_difficult),
    Rule::once("long_sentences", Severity::Medium, 10, long_sentences),
];

pub struct ReadabilityAnalyzer;

impl Analyzer for ReadabilityAnalyzer {
    fn category(&self) -> Category {
        Category::Readability
    }

    fn analyze(&self, page: &PageData, _params: &AnalyzerParams) -> CategoryResult {
        let stats = TextStats::from_text(&page.text_content);
        let flesch = stats.flesch_reading_ease();

        let facts = ReadabilityFacts {
            stats,
            sufficient: stats.words >= MIN_WORDS,
            flesch_reading_ease: round2(flesch),
            flesch_kincaid_grade: round2(stats.flesch_kincaid_grade()),
            gunning_fog: round2(stats.gunning_fog()),
            avg_sentence_length: round2(stats.words_per_sentence()),
            difficulty: difficulty(flesch),
        };

        let outcome = evaluate(Category::Readability, &facts, RULES);
        finish(Category::Readability, outcome, &facts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_syllables() {
        let cases = [
            ("cat", 1),
            ("make", 1),
            ("table", 2),
            ("reading", 2),
            ("beautiful", 3),
            ("syllable", 3),
            ("rhythm", 1),
        ];
        for (word, expected) in cases {
            assert_eq!(count_syllables(word), expected, "word: {}", word);
        }
    }

    #[test]
    fn test_text_stats_ignores_fragments() {
        let stats = TextStats::from_text("The cat sat on the mat. Yes! Dogs like long walks outside.");
        assert_eq!(stats.sentences, 2);
        assert_eq!(stats.words, 12);
    }

    #[test]
    fn test_difficulty_bands() {
        assert_eq!(difficulty(85.0), "easy");
        assert_eq!(difficulty(60.0), "standard");
        assert_eq!(difficulty(45.0), "fairly_difficult");
        assert_eq!(difficulty(25.0), "difficult");
        assert_eq!(difficulty(5.0), "very_difficult");
    }

    fn facts_with_flesch(flesch: f64) -> ReadabilityFacts {
        let stats = TextStats {
            words: 100,
            sentences: 10,
            syllables: 150,
            complex_words: 5,
        };
        ReadabilityFacts {
            stats,
            sufficient: true,
            flesch_reading_ease: flesch,
            flesch_kincaid_grade: 8.0,
            gunning_fog: 10.0,
            avg_sentence_length: 10.0,
            difficulty: difficulty(flesch),
        }
    }

    #[test]
    fn test_flesch_band_boundaries() {
        let cases: [(f64, &[&str], u8); 7] = [
            (29.99, &["difficult"], 40),
            (30.0, &["moderate"], 70),
            (49.99, &["moderate"], 70),
            (50.0, &["fairly_difficult"], 85),
            (69.99, &["fairly_difficult"], 85),
            (70.0, &[], 100),
            (95.0, &[], 100),
        ];

        for (flesch, expected_codes, expected_score) in cases {
            let outcome = evaluate(Category::Readability, &facts_with_flesch(flesch), RULES);
            let codes: Vec<&str> = outcome.issues.iter().map(|i| i.code.as_str()).collect();
            assert_eq!(codes, expected_codes, "flesch {}", flesch);
            assert_eq!(outcome.score, expected_score, "flesch {}", flesch);
        }
    }

    #[test]
    fn test_band_message_matches_its_rule() {
        let outcome = evaluate(Category::Readability, &facts_with_flesch(45.0), RULES);
        assert_eq!(outcome.issues[0].message, "Flesch reading ease is 45.0, hard to read");

        let outcome = evaluate(Category::Readability, &facts_with_flesch(65.0), RULES);
        assert_eq!(
            outcome.issues[0].message,
            "Flesch reading ease is 65.0, fairly hard to read"
        );
    }
}
