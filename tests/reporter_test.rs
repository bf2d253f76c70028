mod fixtures;

use fixtures::{good_page, page};
use seo_audit::analyzers::AnalyzerParams;
use seo_audit::comparator::compare_results;
use seo_audit::models::{ComparisonResult, OverallResult, Winner};
use seo_audit::pipeline::Pipeline;
use seo_audit::reporter::Reporter;
use std::fs;
use tempfile::TempDir;

fn analyze(page: &seo_audit::models::PageData) -> OverallResult {
    Pipeline::new().evaluate(page, &AnalyzerParams::with_keyword("rust"))
}

#[test]
fn test_print_text_report_with_issues() {
    let result = analyze(&page("http://example.com/My_Page"));
    assert!(!result.recommendations.is_empty());

    // Should not panic
    Reporter::print_text_report(&result, 5);
}

#[test]
fn test_print_text_report_no_issues() {
    let result = analyze(&good_page());

    Reporter::print_text_report(&result, 10);
}

#[test]
fn test_print_text_report_with_zero_recommendations_shown() {
    let result = analyze(&page("http://example.com/"));

    Reporter::print_text_report(&result, 0);
}

#[test]
fn test_print_comparison_report() {
    let comparison = compare_results(
        analyze(&good_page()),
        analyze(&page("http://example.com/My_Page")),
    );
    assert_eq!(comparison.winner, Winner::YourSite);

    Reporter::print_comparison_report(&comparison);
}

#[test]
fn test_save_json_report() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("report.json");
    let filename = path.to_str().expect("Temp path should be UTF-8");

    let result = analyze(&good_page());
    Reporter::save_json_report(&result, filename).expect("Failed to save report");

    let json_content = fs::read_to_string(&path).expect("Failed to read file");
    let value: serde_json::Value = serde_json::from_str(&json_content).expect("Invalid JSON");

    let timestamp = value["timestamp"].as_str().expect("timestamp should be a string");
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    assert_eq!(value["url"], "https://example.com/rust-guide");
    assert_eq!(value["overall_score"], result.overall_score);
    assert_eq!(value["grade"], "A");
    assert_eq!(value["category_scores"]["title"], 100);

    // The saved report reads back as the result it came from
    let deserialized: OverallResult =
        serde_json::from_str(&json_content).expect("Failed to deserialize");
    assert_eq!(deserialized.category_scores, result.category_scores);
    assert_eq!(deserialized.recommendations, result.recommendations);
}

#[test]
fn test_save_comparison_report() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("comparison.json");
    let filename = path.to_str().expect("Temp path should be UTF-8");

    let comparison = compare_results(analyze(&good_page()), analyze(&good_page()));
    Reporter::save_json_report(&comparison, filename).expect("Failed to save report");

    let json_content = fs::read_to_string(&path).expect("Failed to read file");
    let deserialized: ComparisonResult =
        serde_json::from_str(&json_content).expect("Failed to deserialize");

    assert_eq!(deserialized.winner, Winner::Tie);
    assert_eq!(deserialized.categories, comparison.categories);
}

#[test]
fn test_save_json_report_to_missing_directory_fails() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("no-such-dir").join("report.json");

    let result = Reporter::save_json_report(
        &analyze(&good_page()),
        path.to_str().expect("Temp path should be UTF-8"),
    );

    assert!(result.is_err());
}
