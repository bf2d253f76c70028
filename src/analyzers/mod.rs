//! The analyzer set: one stateless analyzer per SEO category.

pub mod content;
pub mod headings;
pub mod i18n;
pub mod images;
pub mod keyword;
pub mod link_health;
pub mod links;
pub mod meta;
pub mod mobile;
pub mod performance;
pub mod readability;
pub mod rules;
pub mod schema;
pub mod security;
pub mod sitemap;
pub mod social;
pub mod text;
pub mod title;
pub mod url;
pub mod vitals;

use crate::models::{Category, CategoryResult, PageData};
use rules::Outcome;
use serde::Serialize;
use std::sync::Arc;

/// Optional inputs shared by every analyzer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyzerParams {
    pub keyword: Option<String>,
}

impl AnalyzerParams {
    pub fn with_keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: Some(keyword.into()),
        }
    }

    /// The keyword, ignoring blank input
    pub fn keyword(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
    }
}

/// A pure function from page data to one category's score and issues
pub trait Analyzer: Send + Sync {
    fn category(&self) -> Category;

    /// Analyzers whose input was never collected return false and are left out
    /// of the aggregate instead of being penalised.
    fn applies(&self, _page: &PageData, _params: &AnalyzerParams) -> bool {
        true
    }

    fn analyze(&self, page: &PageData, params: &AnalyzerParams) -> CategoryResult;
}

/// Every analyzer, in category order
pub fn default_analyzers() -> Vec<Arc<dyn Analyzer>> {
    vec![
        Arc::new(title::TitleAnalyzer),
        Arc::new(meta::MetaDescriptionAnalyzer),
        Arc::new(url::UrlAnalyzer),
        Arc::new(headings::HeadingsAnalyzer),
        Arc::new(content::ContentAnalyzer),
        Arc::new(images::ImagesAnalyzer),
        Arc::new(links::LinksAnalyzer),
        Arc::new(performance::PerformanceAnalyzer),
        Arc::new(keyword::KeywordAnalyzer),
        Arc::new(social::SocialAnalyzer),
        Arc::new(mobile::MobileAnalyzer),
        Arc::new(schema::SchemaAnalyzer),
        Arc::new(link_health::LinkHealthAnalyzer),
        Arc::new(security::SecurityAnalyzer),
        Arc::new(sitemap::SitemapAnalyzer),
        Arc::new(readability::ReadabilityAnalyzer),
        Arc::new(i18n::I18nAnalyzer),
        Arc::new(vitals::VitalsAnalyzer),
    ]
}

/// Packs an outcome and its facts into a category result
pub(crate) fn finish<F: Serialize>(category: Category, outcome: Outcome, facts: &F) -> CategoryResult {
    let facts = serde_json::to_value(facts).unwrap_or_else(|e| {
        tracing::warn!(category = %category, error = %e, "Failed to serialize analyzer facts");
        serde_json::Value::Object(Default::default())
    });

    CategoryResult {
        category,
        score: outcome.score,
        issues: outcome.issues,
        facts,
    }
}
