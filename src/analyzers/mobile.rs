use super::rules::{Rule, evaluate, flag};
use super::{Analyzer, AnalyzerParams, finish};
use crate::models::{Category, CategoryResult, PageData, Severity};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

const MIN_FONT_PX: f64 = 14.0;
const MAX_SMALL_TEXT: usize = 5;
const MIN_TAP_TARGET_PX: f64 = 44.0;
const TEXT_SAMPLE: usize = 50;

const TEXT_TAGS: &[&str] = &[
    "p", "span", "div", "li", "td", "th", "label", "a", "small", "em", "strong", "blockquote",
];
const TAP_TAGS: &[&str] = &["a", "button", "input", "select", "textarea"];

static FONT_SIZE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)font-size\s*:\s*(\d+(?:\.\d+)?)px").expect("font-size regex should be valid")
});
static BOX_SIZE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[;\s])(?:min-)?(width|height)\s*:\s*(\d+(?:\.\d+)?)px")
        .expect("box size regex should be valid")
});

#[derive(Debug, Serialize)]
struct MobileFacts {
    viewport: Option<String>,
    viewport_valid: bool,
    small_text_elements: usize,
    small_tap_targets: usize,
    has_media_queries: bool,
    status: &'static str,
}

fn missing_viewport(facts: &MobileFacts) -> Option<String> {
    flag(facts.viewport.is_none(), || {
        "Viewport meta tag is missing".to_string()
    })
}

fn invalid_viewport(facts: &MobileFacts) -> Option<String> {
    flag(facts.viewport.is_some() && !facts.viewport_valid, || {
        "Viewport meta tag does not set width=device-width".to_string()
    })
}

fn small_text(facts: &MobileFacts) -> Option<String> {
    flag(facts.small_text_elements > MAX_SMALL_TEXT, || {
        format!(
            "{} elements use font sizes below {}px",
            facts.small_text_elements, MIN_FONT_PX
        )
    })
}

fn small_tap_targets(facts: &MobileFacts) -> Option<String> {
    flag(facts.small_tap_targets > 0, || {
        format!(
            "{} tap target(s) are smaller than {}px",
            facts.small_tap_targets, MIN_TAP_TARGET_PX
        )
    })
}

fn no_media_queries(facts: &MobileFacts) -> Option<String> {
    flag(!facts.has_media_queries, || {
        "No responsive @media queries were found".to_string()
    })
}

const RULES: &[Rule<MobileFacts>] = &[
    Rule::once("missing_viewport", Severity::High, 40, missing_viewport),
    Rule::once("invalid_viewport", Severity::High, 25, invalid_viewport),
    Rule::once("small_text", Severity::Medium, 15, small_text),
    Rule::once("small_tap_targets", Severity::Medium, 15, small_tap_targets),
    Rule::once("no_media_queries", Severity::Low, 5, no_media_queries),
];

pub fn mobile_status(score: u8) -> &'static str {
    match score {
        80..=100 => "mobile_friendly",
        60..=79 => "partially_mobile",
        _ => "not_mobile",
    }
}

fn viewport_is_valid(viewport: &str) -> bool {
    let normalized: String = viewport
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    normalized.contains("width=device-width")
}

fn font_too_small(style: &str) -> bool {
    FONT_SIZE
        .captures(style)
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .is_some_and(|size| size < MIN_FONT_PX)
}

fn tap_target_too_small(style: &str) -> bool {
    BOX_SIZE
        .captures_iter(style)
        .filter_map(|caps| caps[2].parse::<f64>().ok())
        .any(|size| size < MIN_TAP_TARGET_PX)
}

pub struct MobileAnalyzer;

impl Analyzer for MobileAnalyzer {
    fn category(&self) -> Category {
        Category::Mobile
    }

    fn analyze(&self, page: &PageData, _params: &AnalyzerParams) -> CategoryResult {
        let viewport = page.meta("viewport");

        let small_text_elements = page
            .styled_elements
            .iter()
            .filter(|el| TEXT_TAGS.contains(&el.tag.as_str()))
            .take(TEXT_SAMPLE)
            .filter(|el| font_too_small(&el.style))
            .count();

        let small_tap_targets = page
            .styled_elements
            .iter()
            .filter(|el| TAP_TAGS.contains(&el.tag.as_str()))
            .filter(|el| tap_target_too_small(&el.style))
            .count();

        let has_media_queries = page
            .style_blocks
            .iter()
            .any(|css| css.to_lowercase().contains("@media"))
            || page.stylesheets.iter().any(|sheet| {
                sheet
                    .media
                    .as_deref()
                    .is_some_and(|media| media.contains("width"))
            });

        let mut facts = MobileFacts {
            viewport: viewport.map(str::to_string),
            viewport_valid: viewport.is_some_and(viewport_is_valid),
            small_text_elements,
            small_tap_targets,
            has_media_queries,
            status: "",
        };

        let outcome = evaluate(Category::Mobile, &facts, RULES);
        facts.status = mobile_status(outcome.score);
        finish(Category::Mobile, outcome, &facts)
    }
}
