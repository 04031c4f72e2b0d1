use std::path::Path;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::browser::webdriver::WebDriverConfig;
use crate::locator::wait::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS, WaitOptions};
use crate::search::pages::DEFAULT_BASE_URL;

pub const DEFAULT_CONFIG_FILE: &str = "page-scenarios.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "page-scenarios",
    version,
    about = "Page-object browser scenarios driven by Gherkin features"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: page-scenarios.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run feature files against a browser
    Run(RunArgs),

    /// Parse feature files and match every step, without a browser
    Check {
        /// Feature file or directory
        #[arg(long)]
        features: Option<String>,

        /// Tag expression, e.g. "@smoke and not @slow"
        #[arg(long)]
        tags: Option<String>,
    },

    /// List the registered step patterns
    Steps,
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Feature file or directory of .feature / .yaml files
    #[arg(long)]
    pub features: Option<String>,

    /// Tag expression, e.g. "@smoke and not @slow"
    #[arg(long)]
    pub tags: Option<String>,

    /// Output format: console, html, junit
    #[arg(long)]
    pub format: Option<String>,

    /// Output file path (default: stdout for console, report.html / report.xml for others)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Scenarios to run in parallel, each with its own browser session
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Run against the built-in scripted search engine instead of WebDriver
    #[arg(long)]
    pub mock: bool,

    /// WebDriver server URL
    #[arg(long)]
    pub webdriver: Option<String>,

    /// Base URL of the search engine under test
    #[arg(long)]
    pub base_url: Option<String>,

    /// Append step events to this JSONL file
    #[arg(long)]
    pub trace: Option<String>,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `page-scenarios.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub webdriver: WebDriverConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_features")]
    pub features: String,

    pub tags: Option<String>,

    #[serde(default = "default_console")]
    pub format: String,

    pub output: Option<String>,

    #[serde(default = "default_one")]
    pub concurrency: usize,

    pub trace: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            features: default_features(),
            tags: None,
            format: default_console(),
            output: None,
            concurrency: 1,
            trace: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_element_wait")]
    pub element_wait_ms: u64,

    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Whole-scenario budget; unlimited when absent
    pub scenario_ms: Option<u64>,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            element_wait_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            scenario_ms: None,
        }
    }
}

impl TimeoutConfig {
    pub fn wait_options(&self) -> WaitOptions {
        WaitOptions::new(self.element_wait_ms, self.poll_interval_ms)
    }

    pub fn scenario_timeout(&self) -> Option<Duration> {
        self.scenario_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

// Serde default helpers
fn default_features() -> String { "features".to_string() }
fn default_console() -> String { "console".to_string() }
fn default_one() -> usize { 1 }
fn default_element_wait() -> u64 { DEFAULT_WAIT_TIMEOUT_MS }
fn default_poll_interval() -> u64 { DEFAULT_POLL_INTERVAL_MS }
fn default_base_url() -> String { DEFAULT_BASE_URL.to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if the file is missing or malformed.
///
/// A missing default file is silent; a missing explicit file or a malformed
/// one is logged as a warning.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_FILE);
    let content = match std::fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            if path.is_some() || Path::new(config_path).exists() {
                tracing::warn!(path = config_path, error = %e, "could not read config file, using defaults");
            }
            return AppConfig::default();
        }
    };

    match serde_yaml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = config_path, error = %e, "malformed config file, using defaults");
            AppConfig::default()
        }
    }
}

// ============================================================================
// Settings resolution (CLI > config file > defaults)
// ============================================================================

/// Fully resolved settings for one `run`.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub features: String,
    pub tags: Option<String>,
    pub format: String,
    pub output: Option<String>,
    pub concurrency: usize,
    pub mock: bool,
    pub webdriver: WebDriverConfig,
    pub base_url: String,
    pub trace: Option<String>,
    pub wait: WaitOptions,
    pub scenario_timeout: Option<Duration>,
}

pub fn resolve_run_settings(args: &RunArgs, config: &AppConfig) -> RunSettings {
    let mut webdriver = config.webdriver.clone();
    if let Some(url) = &args.webdriver {
        webdriver.url = url.clone();
    }

    RunSettings {
        features: args.features.clone().unwrap_or_else(|| config.run.features.clone()),
        tags: args.tags.clone().or_else(|| config.run.tags.clone()),
        format: args.format.clone().unwrap_or_else(|| config.run.format.clone()),
        output: args.output.clone().or_else(|| config.run.output.clone()),
        concurrency: args.concurrency.unwrap_or(config.run.concurrency).max(1),
        mock: args.mock,
        webdriver,
        base_url: args.base_url.clone().unwrap_or_else(|| config.search.base_url.clone()),
        trace: args.trace.clone().or_else(|| config.run.trace.clone()),
        wait: config.timeouts.wait_options(),
        scenario_timeout: config.timeouts.scenario_timeout(),
    }
}
