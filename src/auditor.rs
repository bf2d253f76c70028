use crate::analyzers::AnalyzerParams;
use crate::comparator;
use crate::error::FetchError;
use crate::fetcher::PageSource;
use crate::models::{ComparisonResult, OverallResult};
use crate::pipeline::Pipeline;
use std::sync::Arc;

/// Fetches pages from a [`PageSource`] and runs them through the pipeline.
///
/// A fetch failure is terminal for that analysis: no partial result is
/// produced.
pub struct Auditor<S> {
    source: S,
    pipeline: Pipeline,
}

impl<S: PageSource> Auditor<S> {
    pub fn new(source: S) -> Self {
        Self::with_pipeline(source, Pipeline::new())
    }

    pub fn with_pipeline(source: S, pipeline: Pipeline) -> Self {
        Self { source, pipeline }
    }

    pub async fn analyze(
        &self,
        url: &str,
        keyword: Option<&str>,
    ) -> Result<OverallResult, FetchError> {
        let page = self.source.fetch(url).await?;
        let result = self
            .pipeline
            .evaluate_concurrent(Arc::new(page), Arc::new(params(keyword)))
            .await;

        tracing::info!(
            url = %result.url,
            score = result.overall_score,
            grade = %result.grade,
            "Analysis complete"
        );
        Ok(result)
    }

    /// Fetches both pages concurrently, then compares them
    pub async fn compare(
        &self,
        your_url: &str,
        competitor_url: &str,
        keyword: Option<&str>,
    ) -> Result<ComparisonResult, FetchError> {
        let (yours, theirs) = tokio::try_join!(
            self.source.fetch(your_url),
            self.source.fetch(competitor_url)
        )?;

        Ok(comparator::compare(
            &self.pipeline,
            Arc::new(yours),
            Arc::new(theirs),
            Arc::new(params(keyword)),
        )
        .await)
    }
}

fn params(keyword: Option<&str>) -> AnalyzerParams {
    keyword
        .map(AnalyzerParams::with_keyword)
        .unwrap_or_default()
}
