use super::rules::{Rule, evaluate, flag};
use super::{Analyzer, AnalyzerParams, finish};
use crate::models::{Category, CategoryResult, PageData, Severity};
use serde::Serialize;

const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("ar", "Arabic"),
    ("de", "German"),
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("hi", "Hindi"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("nl", "Dutch"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("sv", "Swedish"),
    ("tr", "Turkish"),
    ("zh", "Chinese"),
];

#[derive(Debug, Serialize)]
struct I18nFacts {
    lang: Option<String>,
    language_name: Option<&'static str>,
    has_region: bool,
    charset: Option<String>,
    is_utf8: bool,
    hreflang: Vec<String>,
    has_x_default: bool,
}

fn missing_lang(facts: &I18nFacts) -> Option<String> {
    flag(facts.lang.is_none(), || {
        "The <html> element has no lang attribute".to_string()
    })
}

fn missing_charset(facts: &I18nFacts) -> Option<String> {
    flag(facts.charset.is_none(), || {
        "No character encoding is declared".to_string()
    })
}

fn non_utf8_charset(facts: &I18nFacts) -> Option<String> {
    let charset = facts.charset.as_deref()?;
    flag(!facts.is_utf8, || {
        format!("Character encoding is {}, UTF-8 is recommended", charset)
    })
}

fn missing_hreflang(facts: &I18nFacts) -> Option<String> {
    flag(facts.has_region && facts.hreflang.is_empty(), || {
        "Page targets a region but declares no hreflang alternates".to_string()
    })
}

fn missing_x_default(facts: &I18nFacts) -> Option<String> {
    flag(facts.hreflang.len() > 1 && !facts.has_x_default, || {
        "hreflang alternates have no x-default fallback".to_string()
    })
}

const RULES: &[Rule<I18nFacts>] = &[
    Rule::once("missing_lang", Severity::High, 40, missing_lang),
    Rule::once("missing_charset", Severity::Medium, 30, missing_charset),
    Rule::once("non_utf8_charset", Severity::Low, 10, non_utf8_charset),
    Rule::once("missing_hreflang", Severity::Low, 5, missing_hreflang),
    Rule::once("missing_x_default", Severity::Low, 5, missing_x_default),
];

/// Extracts `charset=` from a Content-Type value
pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| part.trim().split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

fn language_name(lang: &str) -> Option<&'static str> {
    let primary = lang.split(['-', '_']).next()?.to_lowercase();
    LANGUAGE_NAMES
        .iter()
        .find(|(code, _)| *code == primary)
        .map(|(_, name)| *name)
}

pub struct I18nAnalyzer;

impl Analyzer for I18nAnalyzer {
    fn category(&self) -> Category {
        Category::I18n
    }

    fn analyze(&self, page: &PageData, _params: &AnalyzerParams) -> CategoryResult {
        let lang = page
            .lang
            .as_deref()
            .map(str::trim)
            .filter(|lang| !lang.is_empty());

        let charset = page
            .charset
            .clone()
            .or_else(|| page.header("content-type").and_then(charset_from_content_type));

        let hreflang: Vec<String> = page
            .hreflang
            .iter()
            .map(|alternate| alternate.lang.to_lowercase())
            .collect();

        let facts = I18nFacts {
            lang: lang.map(str::to_string),
            language_name: lang.and_then(language_name),
            has_region: lang.is_some_and(|lang| lang.contains(['-', '_'])),
            is_utf8: charset.as_deref().is_some_and(|c| {
                let c = c.to_lowercase();
                c == "utf-8" || c == "utf8"
            }),
            charset,
            has_x_default: hreflang.iter().any(|lang| lang == "x-default"),
            hreflang,
        };

        let outcome = evaluate(Category::I18n, &facts, RULES);
        finish(Category::I18n, outcome, &facts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charset_from_content_type() {
        assert_eq!(
            charset_from_content_type("text/html; charset=UTF-8"),
            Some("UTF-8".to_string())
        );
        assert_eq!(
            charset_from_content_type("text/html;Charset=\"iso-8859-1\""),
            Some("iso-8859-1".to_string())
        );
        assert_eq!(charset_from_content_type("text/html"), None);
    }

    #[test]
    fn test_language_name() {
        assert_eq!(language_name("en-US"), Some("English"));
        assert_eq!(language_name("pt_BR"), Some("Portuguese"));
        assert_eq!(language_name("xx"), None);
    }
}
