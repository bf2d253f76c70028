use crate::analyzers::AnalyzerParams;
use crate::models::{CategoryDelta, ComparisonResult, OverallResult, PageData, Winner};
use crate::pipeline::Pipeline;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Runs both pages through the pipeline concurrently and compares them
pub async fn compare(
    pipeline: &Pipeline,
    your_page: Arc<PageData>,
    competitor_page: Arc<PageData>,
    params: Arc<AnalyzerParams>,
) -> ComparisonResult {
    let (yours, theirs) = tokio::join!(
        pipeline.evaluate_concurrent(your_page, Arc::clone(&params)),
        pipeline.evaluate_concurrent(competitor_page, params),
    );

    compare_results(yours, theirs)
}

/// Head-to-head from two finished analyses. Only categories scored on both
/// sides are compared; the winner is decided on exact overall scores.
pub fn compare_results(your_site: OverallResult, competitor: OverallResult) -> ComparisonResult {
    let winner = match your_site.overall_score.cmp(&competitor.overall_score) {
        Ordering::Greater => Winner::YourSite,
        Ordering::Less => Winner::Competitor,
        Ordering::Equal => Winner::Tie,
    };

    let categories: BTreeMap<_, _> = your_site
        .category_scores
        .iter()
        .filter_map(|(category, yours)| {
            competitor.category_scores.get(category).map(|theirs| {
                let delta = CategoryDelta {
                    yours: *yours,
                    theirs: *theirs,
                    delta: i32::from(*yours) - i32::from(*theirs),
                };
                (*category, delta)
            })
        })
        .collect();

    ComparisonResult {
        your_site,
        competitor,
        winner,
        categories,
    }
}
