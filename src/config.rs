use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::{
    Cli, DEFAULT_CONCURRENCY, DEFAULT_MAX_LINKS, DEFAULT_OUTPUT, DEFAULT_PROBE_TIMEOUT_MS,
    DEFAULT_TIMEOUT_SECS, DEFAULT_TOP,
};

/// Configuration file structure that mirrors CLI arguments
/// All fields are optional to allow partial configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Target keyword for density and placement checks
    pub keyword: Option<String>,

    /// Competitor URL to compare against
    pub compare: Option<String>,

    /// Output format: text or json
    pub output: Option<String>,

    /// Save JSON report to file
    pub save: Option<String>,

    /// Verbose output
    pub verbose: Option<bool>,

    /// Page fetch timeout in seconds
    pub timeout: Option<u64>,

    /// Per-link probe timeout in milliseconds
    pub probe_timeout: Option<u64>,

    /// Maximum number of linked resources to probe
    pub max_links: Option<usize>,

    /// Number of concurrent link probes
    pub concurrency: Option<usize>,

    /// Rate limit for link probes per second
    pub rate_limit: Option<f64>,

    /// Probe linked resources for broken links
    pub check_links: Option<bool>,

    /// Probe robots.txt and the XML sitemap
    pub check_sitemap: Option<bool>,

    /// Number of recommendations shown in the text report
    pub top: Option<usize>,

    /// JSON-lines history file
    pub history: Option<String>,
}

/// Configuration file format based on file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                "toml" => Some(ConfigFormat::Toml),
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                _ => None,
            })
    }

    /// Get file extensions for this format
    pub fn extensions(&self) -> &[&str] {
        match self {
            ConfigFormat::Json => &["json"],
            ConfigFormat::Toml => &["toml"],
            ConfigFormat::Yaml => &["yaml", "yml"],
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let format = ConfigFormat::from_path(path)
            .with_context(|| format!("Unsupported config file format: {}", path.display()))?;

        let config = match format {
            ConfigFormat::Json => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?,
            ConfigFormat::Toml => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?,
            ConfigFormat::Yaml => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?,
        };

        Ok(config)
    }

    /// Get the default configuration file paths to check (in order of priority)
    /// Returns paths in order: current directory, user config directory
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // Check current directory first (highest priority)
        for format in &[ConfigFormat::Json, ConfigFormat::Toml, ConfigFormat::Yaml] {
            for ext in format.extensions() {
                paths.push(PathBuf::from(format!("seo-audit.{}", ext)));
            }
        }

        // Check user config directory (~/.config/seo-audit)
        // Use XDG_CONFIG_HOME if set, otherwise fall back to ~/.config
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .and_then(|p| {
                if p.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(p))
                }
            })
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")));

        if let Some(config_home) = config_home {
            let app_config_dir = config_home.join("seo-audit");
            for format in &[ConfigFormat::Json, ConfigFormat::Toml, ConfigFormat::Yaml] {
                for ext in format.extensions() {
                    paths.push(app_config_dir.join(format!("config.{}", ext)));
                }
            }
        }

        paths
    }

    /// Try to load configuration from default paths
    /// Returns the first configuration file found, or None if no config exists
    pub fn from_default_paths() -> Result<Option<Self>> {
        for path in Self::default_paths() {
            if path.exists() {
                return Ok(Some(Self::from_file(&path)?));
            }
        }
        Ok(None)
    }

    /// Merge this configuration with CLI arguments
    /// CLI arguments take precedence over config file values
    pub fn merge_with_cli(&self, cli: &Cli) -> Cli {
        Cli {
            url: cli.url.clone(),
            keyword: cli.keyword.clone().or_else(|| self.keyword.clone()),
            compare: cli.compare.clone().or_else(|| self.compare.clone()),
            output: if cli.output != DEFAULT_OUTPUT {
                cli.output.clone()
            } else {
                self.output.clone().unwrap_or_else(|| cli.output.clone())
            },
            save: cli.save.clone().or_else(|| self.save.clone()),
            verbose: if cli.verbose {
                cli.verbose
            } else {
                self.verbose.unwrap_or(cli.verbose)
            },
            timeout: if cli.timeout != DEFAULT_TIMEOUT_SECS {
                cli.timeout
            } else {
                self.timeout.unwrap_or(cli.timeout)
            },
            probe_timeout: if cli.probe_timeout != DEFAULT_PROBE_TIMEOUT_MS {
                cli.probe_timeout
            } else {
                self.probe_timeout.unwrap_or(cli.probe_timeout)
            },
            max_links: if cli.max_links != DEFAULT_MAX_LINKS {
                cli.max_links
            } else {
                self.max_links.unwrap_or(cli.max_links)
            },
            concurrency: if cli.concurrency != DEFAULT_CONCURRENCY {
                cli.concurrency
            } else {
                self.concurrency.unwrap_or(cli.concurrency)
            },
            rate_limit: cli.rate_limit.or(self.rate_limit),
            check_links: if !cli.check_links {
                cli.check_links
            } else {
                self.check_links.unwrap_or(cli.check_links)
            },
            check_sitemap: if !cli.check_sitemap {
                cli.check_sitemap
            } else {
                self.check_sitemap.unwrap_or(cli.check_sitemap)
            },
            top: if cli.top != DEFAULT_TOP {
                cli.top
            } else {
                self.top.unwrap_or(cli.top)
            },
            history: cli.history.clone().or_else(|| self.history.clone()),
            config: cli.config.clone(),
        }
    }

    /// Loads the config named by `--config`, or the first one found in the
    /// default locations
    pub fn load(cli: &Cli) -> Result<Option<Self>> {
        match &cli.config {
            Some(path) => Self::from_file(Path::new(path)).map(Some),
            None => Self::from_default_paths(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serial_test::serial;
    use std::env;
    use tempfile::{NamedTempFile, tempdir};

    fn write_temp_config(extension: &str, contents: &str) -> PathBuf {
        let temp_file = NamedTempFile::new().unwrap();
        let temp_path = temp_file.path().with_extension(extension);
        fs::write(&temp_path, contents).unwrap();
        temp_path
    }

    #[test]
    fn test_config_format_from_path() {
        let cases = [
            ("config.json", Some(ConfigFormat::Json)),
            ("config.toml", Some(ConfigFormat::Toml)),
            ("config.yaml", Some(ConfigFormat::Yaml)),
            ("config.YML", Some(ConfigFormat::Yaml)),
            ("config.txt", None),
            ("config", None),
        ];

        for (path, expected) in cases {
            assert_eq!(ConfigFormat::from_path(Path::new(path)), expected, "path: {}", path);
        }
    }

    #[test]
    fn test_load_each_format() {
        let json = r#"
{
    "keyword": "rust seo",
    "output": "json",
    "timeout": 30,
    "max_links": 20,
    "check_links": false,
    "rate_limit": 2.5
}
        "#;
        let toml = r#"
keyword = "rust seo"
output = "json"
timeout = 30
max_links = 20
check_links = false
rate_limit = 2.5
        "#;
        let yaml = r#"
keyword: "rust seo"
output: "json"
timeout: 30
max_links: 20
check_links: false
rate_limit: 2.5
        "#;

        for (extension, contents) in [("json", json), ("toml", toml), ("yaml", yaml)] {
            let path = write_temp_config(extension, contents);
            let config = Config::from_file(&path).unwrap();

            assert_eq!(config.keyword.as_deref(), Some("rust seo"), "{}", extension);
            assert_eq!(config.output.as_deref(), Some("json"), "{}", extension);
            assert_eq!(config.timeout, Some(30), "{}", extension);
            assert_eq!(config.max_links, Some(20), "{}", extension);
            assert_eq!(config.check_links, Some(false), "{}", extension);
            assert_eq!(config.rate_limit, Some(2.5), "{}", extension);
            assert_eq!(config.compare, None, "{}", extension);

            fs::remove_file(path).ok();
        }
    }

    #[test]
    fn test_invalid_configs_are_errors() {
        let cases = [
            ("json", r#"{ invalid json }"#),
            ("toml", r#"[[[ invalid toml"#),
            ("yaml", "keyword: \"unterminated\n    top: invalid\n"),
            ("txt", "keyword = rust"),
        ];

        for (extension, contents) in cases {
            let path = write_temp_config(extension, contents);
            assert!(Config::from_file(&path).is_err(), "{} should fail", extension);
            fs::remove_file(path).ok();
        }
    }

    #[test]
    fn test_merge_with_cli_defaults() {
        let config = Config {
            keyword: Some("rust".to_string()),
            output: Some("json".to_string()),
            timeout: Some(30),
            concurrency: Some(4),
            check_sitemap: Some(false),
            top: Some(3),
            history: Some("history.jsonl".to_string()),
            ..Default::default()
        };

        let cli = Cli::parse_from(["seo-audit", "https://example.com"]);

        let merged = config.merge_with_cli(&cli);
        assert_eq!(merged.url, "https://example.com");
        assert_eq!(merged.keyword.as_deref(), Some("rust")); // from config
        assert_eq!(merged.output, "json"); // from config
        assert_eq!(merged.timeout, 30); // from config
        assert_eq!(merged.concurrency, 4); // from config
        assert!(!merged.check_sitemap); // from config
        assert!(merged.check_links); // default
        assert_eq!(merged.top, 3); // from config
        assert_eq!(merged.history.as_deref(), Some("history.jsonl"));
    }

    #[test]
    fn test_merge_with_cli_overrides() {
        let config = Config {
            keyword: Some("rust".to_string()),
            output: Some("json".to_string()),
            max_links: Some(5),
            check_links: Some(true),
            rate_limit: Some(1.0),
            ..Default::default()
        };

        let cli = Cli::parse_from([
            "seo-audit",
            "https://example.com",
            "--keyword",
            "tokio",
            "--output",
            "text",
            "--max-links",
            "80",
            "--check-links",
            "false",
            "--rate-limit",
            "3",
        ]);

        let merged = config.merge_with_cli(&cli);
        assert_eq!(merged.keyword.as_deref(), Some("tokio")); // CLI override
        // "text" is the default, so the config value wins
        assert_eq!(merged.output, "json");
        assert_eq!(merged.max_links, 80); // CLI override
        assert!(!merged.check_links); // CLI override
        assert_eq!(merged.rate_limit, Some(3.0)); // CLI override
    }

    #[test]
    fn test_load_prefers_explicit_path() {
        let path = write_temp_config("toml", "top = 7\n");
        let cli = Cli::parse_from([
            "seo-audit",
            "https://example.com",
            "--config",
            path.to_str().unwrap(),
        ]);

        let config = Config::load(&cli).unwrap().unwrap();
        assert_eq!(config.top, Some(7));

        fs::remove_file(path).ok();
    }

    #[test]
    #[serial]
    fn test_default_paths_with_xdg_config_home() {
        unsafe {
            env::set_var("XDG_CONFIG_HOME", "/custom/config/path");
        }

        let paths = Config::default_paths();

        assert!(
            paths
                .iter()
                .any(|p| p.to_string_lossy().contains("seo-audit.json"))
        );
        assert!(
            paths
                .iter()
                .any(|p| p.to_string_lossy().contains("/custom/config/path/seo-audit"))
        );

        unsafe {
            env::remove_var("XDG_CONFIG_HOME");
        }
    }

    #[test]
    #[serial]
    fn test_default_paths_with_empty_xdg_config_home() {
        // Empty XDG_CONFIG_HOME falls back to ~/.config
        unsafe {
            env::set_var("XDG_CONFIG_HOME", "");
        }

        let paths = Config::default_paths();
        if let Some(home) = dirs::home_dir() {
            let fallback = home.join(".config").join("seo-audit").join("config.json");
            assert!(paths.contains(&fallback));
        }

        unsafe {
            env::remove_var("XDG_CONFIG_HOME");
        }
    }

    #[test]
    #[serial]
    fn test_from_default_paths_priority_order() {
        let temp_dir = tempdir().unwrap();
        let original_dir = env::current_dir().unwrap();
        env::set_current_dir(temp_dir.path()).unwrap();

        let temp_config_dir = tempdir().unwrap();
        let app_dir = temp_config_dir.path().join("seo-audit");
        fs::create_dir_all(&app_dir).unwrap();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", temp_config_dir.path());
        }

        // Only the config directory has a file
        fs::write(app_dir.join("config.toml"), "top = 20").unwrap();
        let config = Config::from_default_paths().unwrap().unwrap();
        assert_eq!(config.top, Some(20));

        // The current directory wins once it has one too
        fs::write(temp_dir.path().join("seo-audit.yaml"), "top: 5").unwrap();
        let config = Config::from_default_paths().unwrap().unwrap();
        assert_eq!(config.top, Some(5));

        env::set_current_dir(&original_dir).ok();
        unsafe {
            env::remove_var("XDG_CONFIG_HOME");
        }
    }

    #[test]
    #[serial]
    fn test_from_default_paths_returns_none_when_no_config_exists() {
        let temp_dir = tempdir().unwrap();
        let original_dir = env::current_dir().unwrap();
        env::set_current_dir(temp_dir.path()).unwrap();

        let temp_config_dir = tempdir().unwrap();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", temp_config_dir.path());
        }

        let result = Config::from_default_paths();
        assert!(result.unwrap().is_none());

        env::set_current_dir(&original_dir).ok();
        unsafe {
            env::remove_var("XDG_CONFIG_HOME");
        }
    }

    #[test]
    #[serial]
    fn test_from_default_paths_returns_error_on_invalid_config() {
        let temp_dir = tempdir().unwrap();
        let original_dir = env::current_dir().unwrap();
        env::set_current_dir(temp_dir.path()).unwrap();

        fs::write(temp_dir.path().join("seo-audit.json"), "{ invalid json syntax }").unwrap();
        assert!(Config::from_default_paths().is_err());

        env::set_current_dir(&original_dir).ok();
    }
}
