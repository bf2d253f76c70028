use crate::models::{
    Category, CategoryResult, Grade, Issue, OverallResult, PriorityIssues, Severity, Summary,
};
use crate::recommendations;
use std::collections::BTreeMap;

/// Fixed category weights. The eight core categories carry more weight than
/// the extended ones; only categories present in a run contribute.
pub fn weight(category: Category) -> u32 {
    match category {
        Category::Title => 15,
        Category::MetaDescription => 12,
        Category::UrlStructure => 10,
        Category::Headings => 13,
        Category::Content => 18,
        Category::Images => 10,
        Category::Links => 12,
        Category::Performance => 10,
        Category::Keyword => 6,
        Category::Social => 4,
        Category::Mobile => 6,
        Category::Schema => 4,
        Category::LinkHealth => 6,
        Category::Security => 6,
        Category::Sitemap => 4,
        Category::Readability => 4,
        Category::I18n => 3,
        Category::Vitals => 5,
    }
}

pub fn grade(score: u8) -> Grade {
    match score {
        90..=u8::MAX => Grade::A,
        80..=89 => Grade::B,
        60..=79 => Grade::C,
        40..=59 => Grade::D,
        _ => Grade::F,
    }
}

/// Weighted mean of category scores, rounded half-up and clamped to 0..=100
pub fn overall_score(scores: &BTreeMap<Category, u8>) -> u8 {
    let (weighted, total_weight) = scores
        .iter()
        .fold((0u32, 0u32), |(sum, weights), (category, score)| {
            let w = weight(*category);
            (sum + u32::from((*score).min(100)) * w, weights + w)
        });

    if total_weight == 0 {
        return 0;
    }

    ((weighted * 2 + total_weight) / (total_weight * 2)).min(100) as u8
}

/// Splits issues by severity, keeping category order and, within a
/// category, the order the analyzer emitted them.
pub fn partition(results: &BTreeMap<Category, CategoryResult>) -> PriorityIssues {
    let mut buckets = PriorityIssues::default();
    for issue in results.values().flat_map(|result| result.issues.iter()) {
        let bucket = match issue.severity {
            Severity::High => &mut buckets.high,
            Severity::Medium => &mut buckets.medium,
            Severity::Low => &mut buckets.low,
        };
        bucket.push(issue.clone());
    }
    buckets
}

pub fn aggregate(url: &str, results: BTreeMap<Category, CategoryResult>) -> OverallResult {
    let category_scores: BTreeMap<Category, u8> = results
        .iter()
        .map(|(category, result)| (*category, result.score.min(100)))
        .collect();

    let overall_score = overall_score(&category_scores);
    let priority_issues = partition(&results);

    let issues: Vec<&Issue> = results.values().flat_map(|r| r.issues.iter()).collect();
    let recommendations = recommendations::rank(issues);

    let summary = Summary {
        high_priority: priority_issues.high.len(),
        medium_priority: priority_issues.medium.len(),
        low_priority: priority_issues.low.len(),
        total_issues: priority_issues.high.len()
            + priority_issues.medium.len()
            + priority_issues.low.len(),
        categories_analyzed: results.len(),
    };

    OverallResult {
        url: url.to_string(),
        overall_score,
        grade: grade(overall_score),
        category_scores,
        priority_issues,
        recommendations,
        summary,
        categories: results.into_values().collect(),
    }
}

/// Terminal colour band for a score
pub fn score_band(score: u8) -> &'static str {
    match score {
        80..=u8::MAX => "good",
        60..=79 => "fair",
        _ => "poor",
    }
}
