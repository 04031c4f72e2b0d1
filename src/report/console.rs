use crate::report::report_model::{SuiteReport, status_label};
use crate::steps::outcome::{ScenarioResult, ScenarioStatus, StepOutcome};

// ============================================================================
// Console reporter: formatted terminal output
// ============================================================================

/// Format a suite report for terminal output.
///
/// Produces output like:
/// ```text
/// === Suite: features ===
///
/// ✓ PASS   Web search > Search for cats (3 steps)
/// ✗ FAIL   Web search > Search for dogs (3 steps)
///     ✓ Given I am on the Google homepage
///     ✗ Then I should see search results containing "dogs"
///         search results.results does not contain the expected text
///     - And I should see at least one result
///
/// === Results: 1 passed, 1 failed, 0 errored (2 total, 1 steps skipped) ===
/// ```
pub fn format_console_report(report: &SuiteReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Suite: {} ===\n\n", report.suite_name));

    for result in &report.scenarios {
        out.push_str(&format!(
            "{} {:<5}  {} > {} ({} steps)\n",
            status_marker(result.status),
            status_label(result.status),
            result.feature,
            result.scenario,
            result.steps.len()
        ));

        if !result.passed() {
            format_steps(result, &mut out);
        }
    }

    out.push_str(&format!(
        "\n=== Results: {} passed, {} failed, {} errored ({} total",
        report.passed, report.failed, report.errored, report.total
    ));
    match report.skipped_steps() {
        0 => out.push(')'),
        n => out.push_str(&format!(", {} steps skipped)", n)),
    }

    if let Some(ms) = report.duration_ms {
        let secs = ms as f64 / 1000.0;
        out.push_str(&format!(" in {:.1}s", secs));
    }

    out.push_str(" ===\n");

    out
}

fn format_steps(result: &ScenarioResult, out: &mut String) {
    // A scenario that never ran has only its reason to show.
    if result.first_problem().is_none() {
        if let Some(error) = &result.error {
            out.push_str(&format!("    [ERROR] {}\n", error));
        }
    }

    for step in &result.steps {
        out.push_str(&format!("    {} {} {}\n", step_marker(step.outcome), step.keyword, step.text));
        if let Some(message) = &step.message {
            for line in message.lines() {
                out.push_str(&format!("        {}\n", line));
            }
        }
    }
}

fn status_marker(status: ScenarioStatus) -> &'static str {
    match status {
        ScenarioStatus::Passed => "\u{2713}",
        ScenarioStatus::Failed => "\u{2717}",
        _ => "!",
    }
}

fn step_marker(outcome: StepOutcome) -> &'static str {
    match outcome {
        StepOutcome::Passed => "\u{2713}",
        StepOutcome::Failed => "\u{2717}",
        StepOutcome::Errored => "!",
        StepOutcome::Skipped => "-",
    }
}
