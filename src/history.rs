use crate::models::{Category, Grade, OverallResult};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// One persisted analysis, keyed by URL and timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub url: String,
    pub timestamp: DateTime<Utc>,
    pub overall_score: u8,
    pub grade: Grade,
    pub category_scores: BTreeMap<Category, u8>,
    pub result: OverallResult,
}

impl HistoryEntry {
    pub fn new(result: &OverallResult, timestamp: DateTime<Utc>) -> Self {
        Self {
            url: result.url.clone(),
            timestamp,
            overall_score: result.overall_score,
            grade: result.grade,
            category_scores: result.category_scores.clone(),
            result: result.clone(),
        }
    }
}

/// A point on a URL's score trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub timestamp: DateTime<Utc>,
    pub overall_score: u8,
}

/// Append-only sink for finished analyses
pub trait HistoryRecorder {
    fn record(&self, entry: &HistoryEntry) -> Result<()>;
}

/// History kept as one JSON document per line
pub struct JsonlHistory {
    path: PathBuf,
}

impl JsonlHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored entries, newest first, optionally for one URL only
    pub fn entries(&self, url: Option<&str>, limit: usize) -> Result<Vec<HistoryEntry>> {
        let mut entries: Vec<HistoryEntry> = self
            .load()?
            .into_iter()
            .filter(|entry| url.is_none_or(|url| entry.url == url))
            .collect();

        // Stable, so same-timestamp entries keep reverse append order
        entries.reverse();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries.truncate(limit);
        Ok(entries)
    }

    /// The latest `limit` scores for a URL, oldest first
    pub fn trend(&self, url: &str, limit: usize) -> Result<Vec<TrendPoint>> {
        let mut points: Vec<TrendPoint> = self
            .entries(Some(url), limit)?
            .into_iter()
            .map(|entry| TrendPoint {
                timestamp: entry.timestamp,
                overall_score: entry.overall_score,
            })
            .collect();
        points.reverse();
        Ok(points)
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to clear history file: {}", self.path.display()))?;
        }
        Ok(())
    }

    fn load(&self) -> Result<Vec<HistoryEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = fs::File::open(&self.path)
            .with_context(|| format!("Failed to open history file: {}", self.path.display()))?;

        let mut entries = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.with_context(|| {
                format!("Failed to read history file: {}", self.path.display())
            })?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!(
                    path = %self.path.display(),
                    line = index + 1,
                    error = %e,
                    "Skipping unreadable history entry"
                ),
            }
        }

        Ok(entries)
    }
}

impl HistoryRecorder for JsonlHistory {
    fn record(&self, entry: &HistoryEntry) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let line = serde_json::to_string(entry).context("Failed to serialize history entry")?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open history file: {}", self.path.display()))?;
        writeln!(file, "{}", line)
            .with_context(|| format!("Failed to write history file: {}", self.path.display()))?;

        tracing::debug!(url = %entry.url, path = %self.path.display(), "Recorded history entry");
        Ok(())
    }
}
