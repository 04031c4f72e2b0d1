use std::path::Path;

use crate::browser::session::Session;
use crate::browser::webdriver::WebDriverBrowser;
use crate::cli::config::{AppConfig, RunSettings};
use crate::feature::feature_model::Feature;
use crate::feature::loader::load_features;
use crate::feature::tags::TagFilter;
use crate::report::console::format_console_report;
use crate::report::html::generate_html_report;
use crate::report::junit::generate_junit_xml;
use crate::report::report_model::SuiteReport;
use crate::search::definitions::{search_context, search_registry};
use crate::search::mock_site::mock_search_engine;
use crate::steps::context::ScenarioContext;
use crate::steps::error::StepError;
use crate::suite::suite_runner::SuiteRunner;
use crate::trace::logger::TraceLogger;

// ============================================================================
// run subcommand
// ============================================================================

/// Run the selected scenarios and return whether all passed.
pub fn cmd_run(settings: &RunSettings) -> Result<bool, Box<dyn std::error::Error>> {
    let render = renderer(&settings.format)?;
    let features = select_features(&settings.features, settings.tags.as_deref())?;
    let scenario_count: usize = features.iter().map(Feature::scenario_count).sum();

    if scenario_count == 0 {
        eprintln!("No scenarios found at: {}", settings.features);
        return Ok(true);
    }

    tracing::info!(
        scenarios = scenario_count,
        concurrency = settings.concurrency,
        mock = settings.mock,
        "starting run"
    );

    let registry = search_registry()?;
    let trace = match &settings.trace {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };

    let start = std::time::Instant::now();
    let results = SuiteRunner::new(&registry)
        .with_concurrency(settings.concurrency)
        .with_scenario_timeout(settings.scenario_timeout)
        .with_trace(&trace)
        .run(&features, || open_context(settings));
    let duration = start.elapsed().as_millis();

    let report = SuiteReport::from_results(&settings.features, results).with_duration(duration);
    let all_passed = report.all_passed();

    let output_content = render(&report);
    match output_path(&settings.format, settings.output.as_deref()) {
        Some(path) => {
            std::fs::write(path, &output_content)?;
            eprintln!("Report written to {}", path);
        }
        None => print!("{}", output_content),
    }

    Ok(all_passed)
}

/// A fresh browser session and search context for one scenario.
pub fn open_context(settings: &RunSettings) -> Result<ScenarioContext, StepError> {
    let session = if settings.mock {
        Session::new(Box::new(mock_search_engine(&settings.base_url)), settings.wait)
    } else {
        let browser = WebDriverBrowser::connect(&settings.webdriver)?;
        Session::new(Box::new(browser), settings.wait)
    };
    Ok(search_context(session, &settings.base_url))
}

type Renderer = fn(&SuiteReport) -> String;

fn renderer(format: &str) -> Result<Renderer, Box<dyn std::error::Error>> {
    match format {
        "console" => Ok(format_console_report as Renderer),
        "html" => Ok(generate_html_report as Renderer),
        "junit" => Ok(generate_junit_xml as Renderer),
        other => Err(format!("unknown report format '{}' (expected console, html or junit)", other).into()),
    }
}

/// Where to write the report; `None` means stdout.
pub fn output_path<'a>(format: &str, output: Option<&'a str>) -> Option<&'a str> {
    match (output, format) {
        (Some(path), _) => Some(path),
        (None, "html") => Some("report.html"),
        (None, "junit") => Some("report.xml"),
        (None, _) => None,
    }
}

// ============================================================================
// check subcommand
// ============================================================================

/// Parse features and match every step without a browser.
///
/// Returns whether every step resolved to exactly one binding with valid
/// arguments.
pub fn cmd_check(features: Option<&str>, tags: Option<&str>, config: &AppConfig) -> Result<bool, Box<dyn std::error::Error>> {
    let path = features.unwrap_or(&config.run.features);
    let tags = tags.or(config.run.tags.as_deref());
    let features = select_features(path, tags)?;
    let registry = search_registry()?;

    let mut steps = 0;
    let mut problems = 0;
    for feature in &features {
        let source = feature.path.as_deref().unwrap_or(&feature.name);
        for scenario in &feature.scenarios {
            for step in &scenario.steps {
                steps += 1;
                if let Err(e) = registry.resolve(&step.text) {
                    problems += 1;
                    println!("{}:{}: {} {}\n    {}", source, step.line, step.keyword, step.text, e);
                }
            }
        }
    }

    let scenarios: usize = features.iter().map(Feature::scenario_count).sum();
    println!(
        "Checked {} features, {} scenarios, {} steps: {} problem(s)",
        features.len(),
        scenarios,
        steps,
        problems
    );
    Ok(problems == 0)
}

// ============================================================================
// steps subcommand
// ============================================================================

pub fn cmd_steps() -> Result<(), Box<dyn std::error::Error>> {
    let registry = search_registry()?;
    for pattern in registry.patterns() {
        println!("{}", pattern);
    }
    Ok(())
}

/// Load features from `path` and apply the tag filter.
pub fn select_features(path: &str, tags: Option<&str>) -> Result<Vec<Feature>, Box<dyn std::error::Error>> {
    let filter = TagFilter::parse(tags)?;
    let features = load_features(Path::new(path))?;
    Ok(filter.apply(features))
}
