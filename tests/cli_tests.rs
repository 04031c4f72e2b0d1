use std::time::Duration;

use clap::Parser;
use page_scenarios::cli::commands::{cmd_check, output_path, select_features};
use page_scenarios::cli::config::{AppConfig, Cli, Commands, RunArgs, load_config, resolve_run_settings};
use page_scenarios::cli::logging::level_for_verbosity;
use page_scenarios::locator::wait::WaitOptions;

// ============================================================================
// CLI Argument Parsing Tests
// ============================================================================

#[test]
fn cli_parse_run_minimal() {
    let cli = Cli::parse_from(["page-scenarios", "run"]);
    assert_eq!(cli.verbose, 0);
    assert!(cli.config.is_none());
    match cli.command {
        Commands::Run(args) => {
            assert!(args.features.is_none());
            assert!(args.format.is_none());
            assert!(args.concurrency.is_none());
            assert!(!args.mock);
        }
        _ => panic!("Expected Run command"),
    }
}

#[test]
fn cli_parse_run_all_args() {
    let cli = Cli::parse_from([
        "page-scenarios",
        "-vv",
        "--config",
        "custom.yaml",
        "run",
        "--features",
        "specs/search.feature",
        "--tags",
        "@smoke and not @slow",
        "--format",
        "junit",
        "-o",
        "out.xml",
        "--concurrency",
        "4",
        "--mock",
        "--webdriver",
        "http://grid:4444",
        "--base-url",
        "https://search.test",
        "--trace",
        "trace.jsonl",
    ]);
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.config.as_deref(), Some("custom.yaml"));
    match cli.command {
        Commands::Run(args) => {
            assert_eq!(args.features.as_deref(), Some("specs/search.feature"));
            assert_eq!(args.tags.as_deref(), Some("@smoke and not @slow"));
            assert_eq!(args.format.as_deref(), Some("junit"));
            assert_eq!(args.output.as_deref(), Some("out.xml"));
            assert_eq!(args.concurrency, Some(4));
            assert!(args.mock);
            assert_eq!(args.webdriver.as_deref(), Some("http://grid:4444"));
            assert_eq!(args.base_url.as_deref(), Some("https://search.test"));
            assert_eq!(args.trace.as_deref(), Some("trace.jsonl"));
        }
        _ => panic!("Expected Run command"),
    }
}

#[test]
fn cli_parse_check_and_steps() {
    let cli = Cli::parse_from(["page-scenarios", "check", "--features", "features", "--tags", "@smoke"]);
    match cli.command {
        Commands::Check { features, tags } => {
            assert_eq!(features.as_deref(), Some("features"));
            assert_eq!(tags.as_deref(), Some("@smoke"));
        }
        _ => panic!("Expected Check command"),
    }

    let cli = Cli::parse_from(["page-scenarios", "steps", "-v"]);
    assert!(matches!(cli.command, Commands::Steps));
    assert_eq!(cli.verbose, 1);
}

#[test]
fn cli_rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["page-scenarios", "explore"]).is_err());
}

// ============================================================================
// Config File Tests
// ============================================================================

#[test]
fn config_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.run.features, "features");
    assert_eq!(config.run.format, "console");
    assert_eq!(config.run.concurrency, 1);
    assert_eq!(config.webdriver.url, "http://localhost:4444");
    assert_eq!(config.webdriver.browser, "chrome");
    assert!(config.webdriver.headless);
    assert_eq!(config.search.base_url, "https://www.google.com");
    assert_eq!(config.timeouts.wait_options(), WaitOptions::default());
    assert_eq!(config.timeouts.scenario_timeout(), None);
}

#[test]
fn config_load_from_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("page-scenarios.yaml");
    std::fs::write(
        &path,
        r#"
webdriver:
  url: "http://grid:4444"
  browser: firefox
  headless: false
run:
  tags: "@smoke"
  concurrency: 3
timeouts:
  element_wait_ms: 2000
  scenario_ms: 60000
search:
  base_url: "https://search.test"
"#,
    )
    .unwrap();

    let config = load_config(path.to_str());
    assert_eq!(config.webdriver.url, "http://grid:4444");
    assert_eq!(config.webdriver.browser, "firefox");
    assert!(!config.webdriver.headless);
    assert_eq!(config.run.tags.as_deref(), Some("@smoke"));
    assert_eq!(config.run.concurrency, 3);
    assert_eq!(config.run.format, "console");
    assert_eq!(config.timeouts.wait_options(), WaitOptions::new(2000, 100));
    assert_eq!(config.timeouts.scenario_timeout(), Some(Duration::from_secs(60)));
    assert_eq!(config.search.base_url, "https://search.test");
}

#[test]
fn config_missing_file_returns_defaults() {
    let config = load_config(Some("/nonexistent/page-scenarios.yaml"));
    assert_eq!(config.run.features, "features");
}

#[test]
fn config_malformed_file_returns_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.yaml");
    std::fs::write(&path, "run: [not, a, map").unwrap();
    let config = load_config(path.to_str());
    assert_eq!(config.run.concurrency, 1);
}

// ============================================================================
// Settings resolution
// ============================================================================

#[test]
fn run_settings_cli_overrides_config() {
    let mut config = AppConfig::default();
    config.run.features = "from-config".into();
    config.run.format = "html".into();
    config.run.tags = Some("@config".into());
    config.search.base_url = "https://config.test".into();

    let args = RunArgs {
        features: Some("from-cli".into()),
        format: Some("junit".into()),
        concurrency: Some(0),
        webdriver: Some("http://cli:9515".into()),
        mock: true,
        ..Default::default()
    };
    let settings = resolve_run_settings(&args, &config);

    assert_eq!(settings.features, "from-cli");
    assert_eq!(settings.format, "junit");
    assert_eq!(settings.tags.as_deref(), Some("@config"));
    assert_eq!(settings.concurrency, 1);
    assert_eq!(settings.webdriver.url, "http://cli:9515");
    assert_eq!(settings.webdriver.browser, "chrome");
    assert_eq!(settings.base_url, "https://config.test");
    assert!(settings.mock);
}

#[test]
fn run_settings_fall_back_to_config() {
    let settings = resolve_run_settings(&RunArgs::default(), &AppConfig::default());
    assert_eq!(settings.features, "features");
    assert_eq!(settings.format, "console");
    assert!(settings.output.is_none());
    assert!(settings.trace.is_none());
    assert!(!settings.mock);
}

#[test]
fn report_output_paths() {
    assert_eq!(output_path("console", None), None);
    assert_eq!(output_path("html", None), Some("report.html"));
    assert_eq!(output_path("junit", None), Some("report.xml"));
    assert_eq!(output_path("console", Some("out.txt")), Some("out.txt"));
}

#[test]
fn verbosity_levels() {
    assert_eq!(level_for_verbosity(0), "warn");
    assert_eq!(level_for_verbosity(1), "info");
    assert_eq!(level_for_verbosity(2), "debug");
    assert_eq!(level_for_verbosity(7), "trace");
}

// ============================================================================
// Commands
// ============================================================================

#[test]
fn bundled_features_all_resolve() {
    let features = concat!(env!("CARGO_MANIFEST_DIR"), "/features");
    assert!(cmd_check(Some(features), None, &AppConfig::default()).unwrap());
}

#[test]
fn check_reports_undefined_steps() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.feature");
    std::fs::write(&path, "Feature: Bad\n  Scenario: s\n    Given I am on the Google homepage\n    Then the moon is full\n").unwrap();
    assert!(!cmd_check(path.to_str(), None, &AppConfig::default()).unwrap());
}

#[test]
fn select_features_applies_tags() {
    let features = concat!(env!("CARGO_MANIFEST_DIR"), "/features");
    let selected = select_features(features, Some("@smoke")).unwrap();
    let names: Vec<_> = selected
        .iter()
        .flat_map(|f| f.scenarios.iter().map(|s| s.name.as_str()))
        .collect();
    assert_eq!(names, vec!["Search for cats"]);

    assert!(select_features(features, Some("@smoke and")).is_err());
}
