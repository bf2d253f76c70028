mod fixtures;

use chrono::{DateTime, Duration, TimeZone, Utc};
use fixtures::{good_page, page};
use seo_audit::analyzers::AnalyzerParams;
use seo_audit::history::{HistoryEntry, HistoryRecorder, JsonlHistory};
use seo_audit::models::{Grade, OverallResult};
use seo_audit::pipeline::Pipeline;
use std::fs::{self, OpenOptions};
use std::io::Write;
use tempfile::TempDir;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

fn result_for(url: &str, score: u8) -> OverallResult {
    let mut result = Pipeline::new().evaluate(&page(url), &AnalyzerParams::default());
    result.overall_score = score;
    result
}

fn history_in(dir: &TempDir) -> JsonlHistory {
    JsonlHistory::new(dir.path().join("history").join("scores.jsonl"))
}

#[test]
fn test_record_creates_file_and_reads_back() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let history = history_in(&dir);

    let result = Pipeline::new().evaluate(&good_page(), &AnalyzerParams::default());
    history
        .record(&HistoryEntry::new(&result, start()))
        .expect("Failed to record");

    assert!(history.path().exists());

    let entries = history.entries(None, 10).expect("Failed to read history");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].url, "https://example.com/rust-guide");
    assert_eq!(entries[0].timestamp, start());
    assert_eq!(entries[0].overall_score, result.overall_score);
    assert_eq!(entries[0].grade, Grade::A);
    assert_eq!(entries[0].category_scores, result.category_scores);
}

#[test]
fn test_entries_are_newest_first_and_filtered() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let history = history_in(&dir);

    let records = [
        ("https://a.example/", 50, 0),
        ("https://b.example/", 60, 1),
        ("https://a.example/", 70, 2),
        ("https://a.example/", 65, 3),
    ];
    for (url, score, hours) in records {
        history
            .record(&HistoryEntry::new(
                &result_for(url, score),
                start() + Duration::hours(hours),
            ))
            .expect("Failed to record");
    }

    let all = history.entries(None, 10).expect("Failed to read history");
    let scores: Vec<u8> = all.iter().map(|e| e.overall_score).collect();
    assert_eq!(scores, [65, 70, 60, 50]);

    let only_a = history
        .entries(Some("https://a.example/"), 2)
        .expect("Failed to read history");
    let scores: Vec<u8> = only_a.iter().map(|e| e.overall_score).collect();
    assert_eq!(scores, [65, 70]);
}

#[test]
fn test_trend_is_oldest_first() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let history = history_in(&dir);

    for (hours, score) in [(0, 40), (1, 55), (2, 72), (3, 81)] {
        history
            .record(&HistoryEntry::new(
                &result_for("https://a.example/", score),
                start() + Duration::hours(hours),
            ))
            .expect("Failed to record");
    }

    let trend = history
        .trend("https://a.example/", 3)
        .expect("Failed to read trend");
    let scores: Vec<u8> = trend.iter().map(|p| p.overall_score).collect();

    assert_eq!(scores, [55, 72, 81]);
    assert!(trend.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
}

#[test]
fn test_unreadable_lines_are_skipped() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let history = history_in(&dir);

    history
        .record(&HistoryEntry::new(&result_for("https://a.example/", 50), start()))
        .expect("Failed to record");

    let mut file = OpenOptions::new()
        .append(true)
        .open(history.path())
        .expect("Failed to open history");
    writeln!(file, "{{not json").expect("Failed to write");
    writeln!(file).expect("Failed to write");
    drop(file);

    history
        .record(&HistoryEntry::new(
            &result_for("https://a.example/", 60),
            start() + Duration::hours(1),
        ))
        .expect("Failed to record");

    let entries = history.entries(None, 10).expect("Failed to read history");
    assert_eq!(entries.len(), 2);
}

#[test]
fn test_missing_file_is_empty_history() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let history = history_in(&dir);

    assert!(history.entries(None, 10).expect("Failed to read").is_empty());
    assert!(history.trend("https://a.example/", 10).expect("Failed to read").is_empty());
    history.clear().expect("Clearing nothing should succeed");
}

#[test]
fn test_clear_removes_everything() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let history = history_in(&dir);

    history
        .record(&HistoryEntry::new(&result_for("https://a.example/", 50), start()))
        .expect("Failed to record");
    history.clear().expect("Failed to clear");

    assert!(!history.path().exists());
    assert!(history.entries(None, 10).expect("Failed to read").is_empty());
    assert!(fs::read_dir(dir.path().join("history")).is_ok());
}
