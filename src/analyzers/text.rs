//! Small text utilities shared by the content-oriented analyzers.

/// Lower-cased alphanumeric word tokens
pub fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .map(|word| word.trim_matches('\'').to_lowercase())
        .filter(|word| !word.is_empty())
        .collect()
}

/// Number of times `phrase` occurs as a contiguous token sequence in `words`
pub fn count_phrase(words: &[String], phrase: &[String]) -> usize {
    if phrase.is_empty() || phrase.len() > words.len() {
        return 0;
    }
    words.windows(phrase.len()).filter(|window| *window == phrase).count()
}

/// Keyword occurrences per hundred words, `None` when there is no text
pub fn keyword_density(text: &str, keyword: &str) -> Option<f64> {
    let words = tokens(text);
    if words.is_empty() {
        return None;
    }
    let occurrences = count_phrase(&words, &tokens(keyword));
    Some(occurrences as f64 / words.len() as f64 * 100.0)
}

/// Whether `keyword` appears in `text` as a whole-word phrase
pub fn contains_keyword(text: &str, keyword: &str) -> bool {
    count_phrase(&tokens(text), &tokens(keyword)) > 0
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Truncates to `max` characters, appending an ellipsis when shortened
pub fn truncate(text: &str, max: usize) -> String {
    if char_len(text) <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}

/// Rounds to two decimals for reporting
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens() {
        assert_eq!(
            tokens("Rust's SEO, rust-lang & 2024!"),
            vec!["rust's", "seo", "rust", "lang", "2024"]
        );
    }

    #[test]
    fn test_keyword_density_counts_phrases() {
        let text = "rust web rust web framework guide";
        let density = keyword_density(text, "Rust Web").unwrap();
        assert!((density - 2.0 / 6.0 * 100.0).abs() < f64::EPSILON);
        assert_eq!(keyword_density("", "rust"), None);
    }

    #[test]
    fn test_contains_keyword_is_whole_word() {
        assert!(contains_keyword("Learn Rust today", "rust"));
        assert!(!contains_keyword("Trusty tools", "rust"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }
}
