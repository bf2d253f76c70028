use anyhow::Result;
use clap::Parser;
use colored::*;
use seo_audit::cli::Cli;
use seo_audit::run;
use tracing_subscriber::EnvFilter;

/// Logs go to stderr so JSON output on stdout stays parseable
fn init_logging(verbose: bool) {
    let default_directive = if verbose { "seo_audit=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args).await {
        eprintln!("{} {:#}", "Error:".bright_red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
