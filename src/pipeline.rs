use crate::analyzers::{Analyzer, AnalyzerParams, default_analyzers};
use crate::models::{Category, CategoryResult, Issue, OverallResult, PageData, Severity};
use crate::scorer;
use futures::future::join_all;
use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

/// Runs the analyzer set over one page and aggregates the results.
///
/// A failing analyzer never aborts the run: its category is replaced by a
/// degraded result scoring 0 with a single high-severity issue.
#[derive(Clone)]
pub struct Pipeline {
    analyzers: Vec<Arc<dyn Analyzer>>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self::with_analyzers(default_analyzers())
    }

    pub fn with_analyzers(analyzers: Vec<Arc<dyn Analyzer>>) -> Self {
        Self { analyzers }
    }

    /// Analyzes on the calling thread, one analyzer after another
    pub fn evaluate(&self, page: &PageData, params: &AnalyzerParams) -> OverallResult {
        let results = self
            .analyzers
            .iter()
            .filter(|analyzer| analyzer.applies(page, params))
            .map(|analyzer| {
                let category = analyzer.category();
                catch_unwind(AssertUnwindSafe(|| analyzer.analyze(page, params)))
                    .unwrap_or_else(|panic| degraded(category, &panic_message(panic.as_ref())))
            });

        scorer::aggregate(&page.url, collect(results))
    }

    /// Analyzes on the blocking pool, every analyzer in parallel. Joins on all
    /// of them before aggregating; the result matches [`Pipeline::evaluate`].
    pub async fn evaluate_concurrent(
        &self,
        page: Arc<PageData>,
        params: Arc<AnalyzerParams>,
    ) -> OverallResult {
        let tasks = self
            .analyzers
            .iter()
            .filter(|analyzer| analyzer.applies(&page, &params))
            .map(|analyzer| {
                let analyzer = Arc::clone(analyzer);
                let page = Arc::clone(&page);
                let params = Arc::clone(&params);
                let category = analyzer.category();

                async move {
                    match tokio::task::spawn_blocking(move || analyzer.analyze(&page, &params)).await
                    {
                        Ok(result) => result,
                        Err(e) if e.is_panic() => {
                            degraded(category, &panic_message(e.into_panic().as_ref()))
                        }
                        Err(e) => degraded(category, &e.to_string()),
                    }
                }
            });

        let results = join_all(tasks).await;
        scorer::aggregate(&page.url, collect(results))
    }
}

fn collect(results: impl IntoIterator<Item = CategoryResult>) -> BTreeMap<Category, CategoryResult> {
    results
        .into_iter()
        .map(|result| (result.category, result))
        .collect()
}

/// Stand-in result for an analyzer that failed
pub fn degraded(category: Category, reason: &str) -> CategoryResult {
    tracing::warn!(category = %category, reason = %reason, "Analyzer failed, using degraded result");

    CategoryResult {
        category,
        score: 0,
        issues: vec![Issue {
            category,
            code: "analyzer_failed".to_string(),
            severity: Severity::High,
            message: format!("{} analysis failed: {}", category.label(), reason),
        }],
        facts: serde_json::json!({ "error": reason }),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "analyzer panicked".to_string()
    }
}
