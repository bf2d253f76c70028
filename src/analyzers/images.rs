use super::rules::{Rule, evaluate, flag};
use super::{Analyzer, AnalyzerParams, finish};
use crate::models::{Category, CategoryResult, Image, PageData, Severity};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// At most this many per-image alt issues are raised
pub const MISSING_ALT_CAP: usize = 5;

static GENERIC_FILENAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(img|image|photo|picture|pic|untitled|dsc|dscn|screenshot|screen shot)[-_ ]?\d*\.[a-z0-9]+$")
        .expect("generic filename regex should be valid")
});

#[derive(Debug, Serialize)]
struct ImageFacts {
    total: usize,
    missing_alt: Vec<String>,
    missing_alt_ratio: f64,
    missing_dimensions: usize,
    generic_filenames: Vec<String>,
}

fn no_images(facts: &ImageFacts) -> Option<String> {
    flag(facts.total == 0, || {
        "Page has no images; visual content helps engagement".to_string()
    })
}

fn missing_alt_messages(facts: &ImageFacts) -> Vec<String> {
    facts
        .missing_alt
        .iter()
        .map(|src| format!("Image is missing alt text: {}", src))
        .collect()
}

fn missing_alt_majority(facts: &ImageFacts) -> Vec<String> {
    if facts.missing_alt_ratio > 0.5 {
        missing_alt_messages(facts)
    } else {
        Vec::new()
    }
}

fn missing_alt(facts: &ImageFacts) -> Vec<String> {
    if facts.missing_alt_ratio > 0.2 && facts.missing_alt_ratio <= 0.5 {
        missing_alt_messages(facts)
    } else {
        Vec::new()
    }
}

fn missing_alt_minor(facts: &ImageFacts) -> Vec<String> {
    if facts.missing_alt_ratio > 0.0 && facts.missing_alt_ratio <= 0.2 {
        missing_alt_messages(facts)
    } else {
        Vec::new()
    }
}

fn missing_dimensions(facts: &ImageFacts) -> Option<String> {
    flag(facts.missing_dimensions > 0, || {
        format!(
            "{} image(s) lack explicit width/height attributes",
            facts.missing_dimensions
        )
    })
}

fn generic_filenames(facts: &ImageFacts) -> Option<String> {
    flag(!facts.generic_filenames.is_empty(), || {
        format!(
            "{} image(s) use non-descriptive file names",
            facts.generic_filenames.len()
        )
    })
}

const RULES: &[Rule<ImageFacts>] = &[
    Rule::once("no_images", Severity::Low, 10, no_images),
    Rule::each("missing_alt_majority", Severity::High, 10, MISSING_ALT_CAP, missing_alt_majority),
    Rule::each("missing_alt", Severity::Medium, 6, MISSING_ALT_CAP, missing_alt),
    Rule::each("missing_alt_minor", Severity::Low, 3, MISSING_ALT_CAP, missing_alt_minor),
    Rule::once("missing_dimensions", Severity::Low, 10, missing_dimensions),
    Rule::once("generic_filenames", Severity::Low, 5, generic_filenames),
];

fn file_name(src: &str) -> &str {
    let path = src.split(['?', '#']).next().unwrap_or(src);
    path.rsplit('/').next().unwrap_or(path)
}

/// An empty `alt=""` marks a decorative image and counts as present.
fn lacks_alt(image: &Image) -> bool {
    image.alt.is_none()
}

pub struct ImagesAnalyzer;

impl Analyzer for ImagesAnalyzer {
    fn category(&self) -> Category {
        Category::Images
    }

    fn analyze(&self, page: &PageData, _params: &AnalyzerParams) -> CategoryResult {
        let total = page.images.len();
        let missing_alt: Vec<String> = page
            .images
            .iter()
            .filter(|image| lacks_alt(image))
            .map(|image| image.src.clone())
            .collect();

        let facts = ImageFacts {
            total,
            missing_alt_ratio: if total == 0 {
                0.0
            } else {
                missing_alt.len() as f64 / total as f64
            },
            missing_alt,
            missing_dimensions: page.images.iter().filter(|i| !i.has_dimensions()).count(),
            generic_filenames: page
                .images
                .iter()
                .map(|image| file_name(&image.src))
                .filter(|name| GENERIC_FILENAME.is_match(name))
                .map(str::to_string)
                .collect(),
        };

        let outcome = evaluate(Category::Images, &facts, RULES);
        finish(Category::Images, outcome, &facts)
    }
}
