use crate::models::{ComparisonResult, OverallResult, Severity, Winner};
use crate::scorer::score_band;
use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use std::fs::File;
use std::io::Write;

/// A report as written to disk: the payload plus when it was produced
#[derive(Debug, Serialize)]
pub struct SavedReport<'a, T: Serialize> {
    pub timestamp: String,
    #[serde(flatten)]
    pub report: &'a T,
}

pub struct Reporter;

impl Reporter {
    fn colorize_score(score: u8) -> ColoredString {
        let text = score.to_string();
        match score_band(score) {
            "good" => text.bright_green(),
            "fair" => text.yellow(),
            _ => text.bright_red(),
        }
    }

    fn severity_label(severity: Severity) -> ColoredString {
        match severity {
            Severity::High => "HIGH".bright_red(),
            Severity::Medium => "MED ".yellow(),
            Severity::Low => "LOW ".bright_cyan(),
        }
    }

    pub fn print_text_report(result: &OverallResult, top: usize) {
        println!("\n{}", "=".repeat(80).bright_blue());
        println!("{}", "SEO Audit Report".bright_cyan().bold());
        println!("{}", "=".repeat(80).bright_blue());
        println!();

        println!("{}: {}", "URL".bright_white().bold(), result.url);
        println!(
            "{}: {}/100 (grade {})",
            "Overall Score".bright_white().bold(),
            Self::colorize_score(result.overall_score).bold(),
            result.grade.to_string().bold()
        );
        println!();

        // Summary
        println!("{}", "Summary".bright_yellow().bold().underline());
        println!(
            "  Categories Analyzed: {}",
            result.summary.categories_analyzed.to_string().bright_green()
        );
        println!(
            "  Total Issues:        {}",
            result.summary.total_issues.to_string().bright_white()
        );
        println!(
            "  High Priority:       {}",
            if result.summary.high_priority > 0 {
                result.summary.high_priority.to_string().bright_red()
            } else {
                result.summary.high_priority.to_string().bright_green()
            }
        );
        println!(
            "  Medium Priority:     {}",
            if result.summary.medium_priority > 0 {
                result.summary.medium_priority.to_string().yellow()
            } else {
                result.summary.medium_priority.to_string().bright_green()
            }
        );
        println!(
            "  Low Priority:        {}",
            result.summary.low_priority.to_string().bright_cyan()
        );
        println!();

        println!("{}", "Category Scores".bright_yellow().bold().underline());
        for category in &result.categories {
            println!(
                "  {:<22} {:>3}  ({} issues)",
                category.category.label(),
                Self::colorize_score(category.score),
                category.issues.len()
            );
        }
        println!();

        if !result.recommendations.is_empty() && top > 0 {
            println!("{}", "Top Recommendations".bright_yellow().bold().underline());
            for recommendation in result.recommendations.iter().take(top) {
                println!(
                    "  [{}] {}: {}",
                    Self::severity_label(recommendation.derived_from.severity),
                    recommendation.category.label().bright_white(),
                    recommendation.recommendation
                );
                println!("         {}", recommendation.derived_from.message.dimmed());
            }

            let remaining = result.recommendations.len().saturating_sub(top);
            if remaining > 0 {
                println!("  ... and {} more", remaining);
            }
        }

        println!();
        println!("{}", "=".repeat(80).bright_blue());
    }

    pub fn print_comparison_report(comparison: &ComparisonResult) {
        println!("\n{}", "=".repeat(80).bright_blue());
        println!("{}", "SEO Comparison Report".bright_cyan().bold());
        println!("{}", "=".repeat(80).bright_blue());
        println!();

        println!(
            "{}: {} ({}/100, grade {})",
            "Your Site".bright_white().bold(),
            comparison.your_site.url,
            Self::colorize_score(comparison.your_site.overall_score),
            comparison.your_site.grade
        );
        println!(
            "{}: {} ({}/100, grade {})",
            "Competitor".bright_white().bold(),
            comparison.competitor.url,
            Self::colorize_score(comparison.competitor.overall_score),
            comparison.competitor.grade
        );

        let winner = match comparison.winner {
            Winner::YourSite => "Your site".bright_green(),
            Winner::Competitor => "Competitor".bright_red(),
            Winner::Tie => "Tie".yellow(),
        };
        println!("{}: {}", "Winner".bright_white().bold(), winner.bold());
        println!();

        println!("{}", "Category Breakdown".bright_yellow().bold().underline());
        println!("  {:<22} {:>5} {:>7} {:>7}", "Category", "Yours", "Theirs", "Delta");
        for (category, delta) in &comparison.categories {
            let delta_text = format!("{:+}", delta.delta);
            let delta_text = if delta.delta > 0 {
                delta_text.bright_green()
            } else if delta.delta < 0 {
                delta_text.bright_red()
            } else {
                delta_text.normal()
            };
            println!(
                "  {:<22} {:>5} {:>7} {:>7}",
                category.label(),
                delta.yours,
                delta.theirs,
                delta_text
            );
        }

        println!();
        println!("{}", "=".repeat(80).bright_blue());
    }

    /// Writes any report as pretty JSON with a generation timestamp
    pub fn save_json_report<T: Serialize>(report: &T, filename: &str) -> Result<()> {
        let saved = SavedReport {
            timestamp: chrono::Utc::now().to_rfc3339(),
            report,
        };
        let json = serde_json::to_string_pretty(&saved).context("Failed to serialize report")?;
        let mut file = File::create(filename)
            .with_context(|| format!("Failed to create report file: {}", filename))?;
        file.write_all(json.as_bytes())
            .with_context(|| format!("Failed to write report file: {}", filename))?;
        eprintln!("Report saved to: {}", filename.bright_green());
        Ok(())
    }
}
