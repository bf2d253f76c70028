//! Structural Core Web Vitals estimates. Nothing here is measured; the
//! numbers are derived from page structure and server response time only.

use super::rules::{Rule, evaluate, flag};
use super::{Analyzer, AnalyzerParams, finish};
use crate::models::{Category, CategoryResult, PageData, Severity};
use serde::Serialize;

const DEFAULT_RESPONSE_MS: u64 = 500;
const LCP_POOR_MS: u64 = 4000;
const LCP_GOOD_MS: u64 = 2500;
const CLS_POOR: f64 = 0.25;
const CLS_GOOD: f64 = 0.1;
const INP_POOR_MS: u64 = 500;
const INP_GOOD_MS: u64 = 200;
const LARGE_INLINE_SCRIPT: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Good,
    NeedsImprovement,
    Poor,
}

impl Rating {
    fn score(self) -> f64 {
        match self {
            Rating::Good => 100.0,
            Rating::NeedsImprovement => 60.0,
            Rating::Poor => 20.0,
        }
    }
}

fn rate<T: PartialOrd>(value: T, good: T, poor: T) -> Rating {
    if value > poor {
        Rating::Poor
    } else if value > good {
        Rating::NeedsImprovement
    } else {
        Rating::Good
    }
}

/// Estimated vitals for one page
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VitalsEstimate {
    pub lcp_ms: u64,
    pub cls: f64,
    pub inp_ms: u64,
    pub lcp_rating: Rating,
    pub cls_rating: Rating,
    pub inp_rating: Rating,
    /// 0.4 LCP + 0.3 CLS + 0.3 INP over the per-metric rating scores
    pub estimated_score: u8,
}

impl VitalsEstimate {
    pub fn from_page(page: &PageData) -> Self {
        let blocking_scripts = page.scripts.iter().filter(|s| s.is_blocking).count() as u64;
        let hero_unsized = page
            .images
            .iter()
            .filter(|image| {
                !image
                    .loading
                    .as_deref()
                    .is_some_and(|loading| loading.eq_ignore_ascii_case("lazy"))
            })
            .take(3)
            .any(|image| !image.has_dimensions());

        // Deserialized snapshots may carry arbitrary response times
        let lcp_ms = page
            .response_time_ms
            .unwrap_or(DEFAULT_RESPONSE_MS)
            .saturating_add((page.stylesheets.len() as u64).saturating_mul(100))
            .saturating_add(blocking_scripts.saturating_mul(150))
            .saturating_add(if hero_unsized { 300 } else { 0 });

        let unsized_images = page.images.iter().filter(|i| !i.has_dimensions()).count();
        let unsized_iframes = page
            .iframes
            .iter()
            .filter(|f| f.width.is_none() || f.height.is_none())
            .count();
        let cls = ((unsized_images as f64 * 0.02
            + unsized_iframes as f64 * 0.05
            + page.ad_slots as f64 * 0.03)
            * 1000.0)
            .round()
            / 1000.0;

        let external_scripts = page.scripts.iter().filter(|s| s.src.is_some()).count() as u64;
        let large_inline = page
            .scripts
            .iter()
            .filter(|s| s.src.is_none() && s.inline_length > LARGE_INLINE_SCRIPT)
            .count() as u64;
        let inp_ms = external_scripts
            .saturating_mul(20)
            .saturating_add(large_inline.saturating_mul(30));

        let lcp_rating = rate(lcp_ms, LCP_GOOD_MS, LCP_POOR_MS);
        let cls_rating = rate(cls, CLS_GOOD, CLS_POOR);
        let inp_rating = rate(inp_ms, INP_GOOD_MS, INP_POOR_MS);
        let weighted =
            lcp_rating.score() * 0.4 + cls_rating.score() * 0.3 + inp_rating.score() * 0.3;

        Self {
            lcp_ms,
            cls,
            inp_ms,
            lcp_rating,
            cls_rating,
            inp_rating,
            estimated_score: weighted.round().clamp(0.0, 100.0) as u8,
        }
    }
}

fn lcp_poor(facts: &VitalsEstimate) -> Option<String> {
    flag(facts.lcp_rating == Rating::Poor, || {
        format!("Estimated LCP is {} ms (poor, over {} ms)", facts.lcp_ms, LCP_POOR_MS)
    })
}

fn lcp_needs_improvement(facts: &VitalsEstimate) -> Option<String> {
    flag(facts.lcp_rating == Rating::NeedsImprovement, || {
        format!("Estimated LCP is {} ms (target {} ms)", facts.lcp_ms, LCP_GOOD_MS)
    })
}

fn cls_poor(facts: &VitalsEstimate) -> Option<String> {
    flag(facts.cls_rating == Rating::Poor, || {
        format!("Estimated CLS is {:.3} (poor, over {})", facts.cls, CLS_POOR)
    })
}

fn cls_needs_improvement(facts: &VitalsEstimate) -> Option<String> {
    flag(facts.cls_rating == Rating::NeedsImprovement, || {
        format!("Estimated CLS is {:.3} (target {})", facts.cls, CLS_GOOD)
    })
}

fn inp_poor(facts: &VitalsEstimate) -> Option<String> {
    flag(facts.inp_rating == Rating::Poor, || {
        format!("Estimated INP is {} ms (poor, over {} ms)", facts.inp_ms, INP_POOR_MS)
    })
}

fn inp_needs_improvement(facts: &VitalsEstimate) -> Option<String> {
    flag(facts.inp_rating == Rating::NeedsImprovement, || {
        format!("Estimated INP is {} ms (target {} ms)", facts.inp_ms, INP_GOOD_MS)
    })
}

const RULES: &[Rule<VitalsEstimate>] = &[
    Rule::once("lcp_poor", Severity::High, 40, lcp_poor),
    Rule::once("lcp_needs_improvement", Severity::Medium, 20, lcp_needs_improvement),
    Rule::once("cls_poor", Severity::High, 30, cls_poor),
    Rule::once("cls_needs_improvement", Severity::Medium, 15, cls_needs_improvement),
    Rule::once("inp_poor", Severity::High, 30, inp_poor),
    Rule::once("inp_needs_improvement", Severity::Medium, 15, inp_needs_improvement),
];

pub struct VitalsAnalyzer;

impl Analyzer for VitalsAnalyzer {
    fn category(&self) -> Category {
        Category::Vitals
    }

    fn analyze(&self, page: &PageData, _params: &AnalyzerParams) -> CategoryResult {
        let estimate = VitalsEstimate::from_page(page);
        let outcome = evaluate(Category::Vitals, &estimate, RULES);
        finish(Category::Vitals, outcome, &estimate)
    }
}
