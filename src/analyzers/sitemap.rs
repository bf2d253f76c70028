use super::rules::{Rule, evaluate, flag};
use super::{Analyzer, AnalyzerParams, finish};
use crate::models::{Category, CategoryResult, PageData, Severity};
use crate::robots::{RobotsTxt, SitemapSummary};
use serde::Serialize;
use url::Url;

#[derive(Debug, Default, Serialize)]
struct SitemapFacts {
    robots_probed: bool,
    robots_present: bool,
    sitemap_directives: Vec<String>,
    page_allowed: bool,
    sitemap_probed: bool,
    sitemap_url: Option<String>,
    sitemap: Option<SitemapSummary>,
}

fn blocked_by_robots(facts: &SitemapFacts) -> Option<String> {
    flag(facts.robots_present && !facts.page_allowed, || {
        "robots.txt disallows crawling this page".to_string()
    })
}

fn robots_missing(facts: &SitemapFacts) -> Option<String> {
    flag(facts.robots_probed && !facts.robots_present, || {
        "robots.txt was not found".to_string()
    })
}

fn sitemap_missing(facts: &SitemapFacts) -> Option<String> {
    flag(facts.sitemap_probed && facts.sitemap.is_none(), || {
        "No XML sitemap was found".to_string()
    })
}

fn no_sitemap_directive(facts: &SitemapFacts) -> Option<String> {
    flag(facts.robots_present && facts.sitemap_directives.is_empty(), || {
        "robots.txt does not reference a sitemap".to_string()
    })
}

fn empty_sitemap(facts: &SitemapFacts) -> Option<String> {
    let sitemap = facts.sitemap.as_ref()?;
    flag(sitemap.entries == 0, || "Sitemap contains no entries".to_string())
}

const RULES: &[Rule<SitemapFacts>] = &[
    Rule::once("blocked_by_robots", Severity::High, 40, blocked_by_robots),
    Rule::once("robots_missing", Severity::Medium, 30, robots_missing),
    Rule::once("sitemap_missing", Severity::Medium, 30, sitemap_missing),
    Rule::once("no_sitemap_directive", Severity::Low, 10, no_sitemap_directive),
    Rule::once("empty_sitemap", Severity::Low, 10, empty_sitemap),
];

pub struct SitemapAnalyzer;

impl Analyzer for SitemapAnalyzer {
    fn category(&self) -> Category {
        Category::Sitemap
    }

    fn applies(&self, page: &PageData, _params: &AnalyzerParams) -> bool {
        page.robots_txt.is_some() || page.sitemap_xml.is_some()
    }

    fn analyze(&self, page: &PageData, _params: &AnalyzerParams) -> CategoryResult {
        let mut facts = SitemapFacts {
            page_allowed: true,
            ..Default::default()
        };

        if let Some(robots) = &page.robots_txt {
            facts.robots_probed = true;
            facts.robots_present = robots.is_present();
            if facts.robots_present {
                let parsed = RobotsTxt::parse(&robots.body);
                let path = Url::parse(page.effective_url())
                    .map(|url| url.path().to_string())
                    .unwrap_or_else(|_| "/".to_string());
                facts.page_allowed = parsed.is_allowed(&path, "*");
                facts.sitemap_directives = parsed.sitemaps().to_vec();
            }
        }

        if let Some(sitemap) = &page.sitemap_xml {
            facts.sitemap_probed = true;
            facts.sitemap_url = Some(sitemap.url.clone());
            if sitemap.is_present() {
                facts.sitemap = SitemapSummary::parse(&sitemap.body);
            }
        }

        let outcome = evaluate(Category::Sitemap, &facts, RULES);
        finish(Category::Sitemap, outcome, &facts)
    }
}
