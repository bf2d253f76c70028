use clap::Parser;

pub const DEFAULT_OUTPUT: &str = "text";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_MAX_LINKS: usize = 50;
pub const DEFAULT_CONCURRENCY: usize = 10;
pub const DEFAULT_TOP: usize = 10;

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "seo-audit")]
#[command(about = "Scores a web page against SEO heuristics", long_about = None)]
pub struct Cli {
    /// The URL of the page to analyze
    #[arg(value_name = "URL")]
    pub url: String,

    /// Target keyword for density and placement checks
    #[arg(short, long)]
    pub keyword: Option<String>,

    /// Competitor URL to compare against
    #[arg(long, value_name = "URL")]
    pub compare: Option<String>,

    /// Output format: text or json
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: String,

    /// Save JSON report to file
    #[arg(short, long)]
    pub save: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Page fetch timeout in seconds (default: 15)
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Per-link probe timeout in milliseconds (default: 5000)
    #[arg(long, default_value_t = DEFAULT_PROBE_TIMEOUT_MS)]
    pub probe_timeout: u64,

    /// Maximum number of linked resources to probe (default: 50)
    #[arg(long, default_value_t = DEFAULT_MAX_LINKS)]
    pub max_links: usize,

    /// Number of concurrent link probes (default: 10)
    #[arg(short = 'c', long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Rate limit for link probes per second (optional, e.g., 5.0 for 5 req/s)
    #[arg(short = 'r', long)]
    pub rate_limit: Option<f64>,

    /// Probe linked resources for broken links (default: true)
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub check_links: bool,

    /// Probe robots.txt and the XML sitemap (default: true)
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub check_sitemap: bool,

    /// Number of recommendations shown in the text report (default: 10)
    #[arg(long, default_value_t = DEFAULT_TOP)]
    pub top: usize,

    /// Append results to this JSON-lines history file
    #[arg(long, value_name = "FILE")]
    pub history: Option<String>,

    /// Path to configuration file (JSON, TOML, or YAML)
    #[arg(long)]
    pub config: Option<String>,
}
