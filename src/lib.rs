pub mod analyzers;
pub mod auditor;
pub mod cli;
pub mod comparator;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod history;
pub mod http_client;
pub mod link_checker;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod recommendations;
pub mod reporter;
pub mod robots;
pub mod scorer;

use anyhow::Result;
use auditor::Auditor;
use cli::Cli;
use colored::*;
use config::Config;
use fetcher::{FetchOptions, HttpFetcher};
use history::{HistoryEntry, HistoryRecorder, JsonlHistory};
use reporter::Reporter;
use std::time::Duration;

pub async fn run(args: Cli) -> Result<()> {
    let args = match Config::load(&args)? {
        Some(config) => config.merge_with_cli(&args),
        None => args,
    };

    let json_output = match args.output.as_str() {
        "json" => true,
        "text" => false,
        other => anyhow::bail!("Unsupported output format '{}': use text or json", other),
    };

    if !json_output {
        println!("{}", "SEO Audit".bright_cyan().bold());
        println!("{}", "=".repeat(50).bright_blue());
        println!();
        println!("{} {}", "Analyzing:".bright_white().bold(), args.url);
        if let Some(competitor) = &args.compare {
            println!("{} {}", "Comparing with:".bright_white().bold(), competitor);
        }
        if let Some(keyword) = &args.keyword {
            println!("{} {}", "Keyword:".bright_white().bold(), keyword);
        }
        println!();
    }

    let fetcher = HttpFetcher::new(FetchOptions {
        timeout: Duration::from_secs(args.timeout),
        probe_timeout: Duration::from_millis(args.probe_timeout),
        max_links: args.max_links,
        concurrency: args.concurrency,
        rate_limit: args.rate_limit,
        check_links: args.check_links,
        check_sitemap: args.check_sitemap,
        // Keep stdout clean for JSON consumers
        show_progress: !json_output,
    })?;
    let auditor = Auditor::new(fetcher);
    let keyword = args.keyword.as_deref();

    let (result, comparison) = match &args.compare {
        Some(competitor) => {
            let comparison = auditor.compare(&args.url, competitor, keyword).await?;
            (comparison.your_site.clone(), Some(comparison))
        }
        None => (auditor.analyze(&args.url, keyword).await?, None),
    };

    match (&comparison, json_output) {
        (Some(comparison), true) => println!("{}", serde_json::to_string_pretty(comparison)?),
        (None, true) => println!("{}", serde_json::to_string_pretty(&result)?),
        (Some(comparison), false) => {
            Reporter::print_text_report(&result, args.top);
            Reporter::print_comparison_report(comparison);
        }
        (None, false) => Reporter::print_text_report(&result, args.top),
    }

    // Save to file if requested
    if let Some(filename) = &args.save {
        match &comparison {
            Some(comparison) => Reporter::save_json_report(comparison, filename)?,
            None => Reporter::save_json_report(&result, filename)?,
        }
    }

    if let Some(path) = &args.history {
        let history = JsonlHistory::new(path);
        let now = chrono::Utc::now();
        history.record(&HistoryEntry::new(&result, now))?;
        if let Some(comparison) = &comparison {
            history.record(&HistoryEntry::new(&comparison.competitor, now))?;
        }
    }

    Ok(())
}
