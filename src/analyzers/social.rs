use super::rules::{Rule, evaluate, flag};
use super::text::truncate;
use super::{Analyzer, AnalyzerParams, finish};
use crate::models::{Category, CategoryResult, PageData, Severity};
use serde::Serialize;
use std::collections::BTreeMap;

const OPEN_GRAPH_TAGS: &[&str] = &["og:title", "og:description", "og:image", "og:url", "og:type"];
const TWITTER_TAGS: &[&str] = &[
    "twitter:card",
    "twitter:title",
    "twitter:description",
    "twitter:image",
];

/// (platform, max title chars, max description chars)
const PREVIEW_LIMITS: &[(&str, usize, usize)] = &[
    ("facebook", 60, 155),
    ("twitter", 70, 200),
    ("linkedin", 100, 200),
];

#[derive(Debug, Serialize)]
struct Preview {
    title: String,
    description: String,
    image: Option<String>,
}

#[derive(Debug, Serialize)]
struct SocialFacts {
    open_graph: BTreeMap<String, String>,
    twitter: BTreeMap<String, String>,
    has_open_graph: bool,
    missing_open_graph_core: Vec<String>,
    has_twitter_card: bool,
    preview_image: Option<String>,
    previews: BTreeMap<String, Preview>,
}

fn missing_open_graph(facts: &SocialFacts) -> Option<String> {
    flag(!facts.has_open_graph, || {
        "Open Graph tags are missing; shares on Facebook and LinkedIn will look plain".to_string()
    })
}

fn incomplete_open_graph(facts: &SocialFacts) -> Option<String> {
    flag(
        facts.has_open_graph && !facts.missing_open_graph_core.is_empty(),
        || {
            format!(
                "Open Graph is incomplete, missing {}",
                facts.missing_open_graph_core.join(", ")
            )
        },
    )
}

fn missing_twitter_card(facts: &SocialFacts) -> Option<String> {
    flag(!facts.has_twitter_card, || {
        "Twitter Card tags are missing".to_string()
    })
}

fn missing_preview_image(facts: &SocialFacts) -> Option<String> {
    flag(facts.preview_image.is_none(), || {
        "No og:image or twitter:image for link previews".to_string()
    })
}

const RULES: &[Rule<SocialFacts>] = &[
    Rule::once("missing_open_graph", Severity::Medium, 30, missing_open_graph),
    Rule::once("incomplete_open_graph", Severity::Low, 10, incomplete_open_graph),
    Rule::once("missing_twitter_card", Severity::Medium, 20, missing_twitter_card),
    Rule::once("missing_preview_image", Severity::Low, 15, missing_preview_image),
];

fn collect(page: &PageData, tags: &[&str]) -> BTreeMap<String, String> {
    tags.iter()
        .filter_map(|tag| page.meta(tag).map(|value| (tag.to_string(), value.to_string())))
        .collect()
}

pub struct SocialAnalyzer;

impl Analyzer for SocialAnalyzer {
    fn category(&self) -> Category {
        Category::Social
    }

    fn analyze(&self, page: &PageData, _params: &AnalyzerParams) -> CategoryResult {
        let open_graph = collect(page, OPEN_GRAPH_TAGS);
        let twitter = collect(page, TWITTER_TAGS);

        let title = open_graph
            .get("og:title")
            .or_else(|| twitter.get("twitter:title"))
            .cloned()
            .or_else(|| page.title.clone())
            .unwrap_or_default();
        let description = open_graph
            .get("og:description")
            .or_else(|| twitter.get("twitter:description"))
            .cloned()
            .or_else(|| page.meta("description").map(str::to_string))
            .unwrap_or_default();
        let preview_image = open_graph
            .get("og:image")
            .or_else(|| twitter.get("twitter:image"))
            .cloned();

        let previews = PREVIEW_LIMITS
            .iter()
            .map(|(platform, title_max, description_max)| {
                let preview = Preview {
                    title: truncate(&title, *title_max),
                    description: truncate(&description, *description_max),
                    image: preview_image.clone(),
                };
                (platform.to_string(), preview)
            })
            .collect();

        let facts = SocialFacts {
            has_open_graph: ["og:title", "og:description", "og:image"]
                .iter()
                .any(|tag| open_graph.contains_key(*tag)),
            missing_open_graph_core: ["og:title", "og:description"]
                .iter()
                .filter(|tag| !open_graph.contains_key(**tag))
                .map(|tag| tag.to_string())
                .collect(),
            has_twitter_card: twitter.contains_key("twitter:card"),
            preview_image,
            previews,
            open_graph,
            twitter,
        };

        let outcome = evaluate(Category::Social, &facts, RULES);
        finish(Category::Social, outcome, &facts)
    }
}
