use crate::report::report_model::SuiteReport;
use crate::steps::outcome::{ScenarioResult, ScenarioStatus, StepOutcome};

const CLASSNAME_FALLBACK: &str = "page-scenarios";

// ============================================================================
// JUnit XML reporter: CI integration format
// ============================================================================

/// Generate a JUnit XML report for CI systems.
///
/// Failed scenarios get a `<failure>`, errored ones an `<error>`. Steps that
/// were skipped after the first problem go to `<system-out>`; `skipped`
/// counts test cases, and every scenario ends passed, failed or errored.
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <testsuite name="..." tests="3" failures="1" errors="1" skipped="0" time="1.234">
///   <testcase name="Search for cats" classname="Web search" />
///   <testcase name="Search for dogs" classname="Web search">
///     <failure message="..." type="AssertionFailure">Step 3: ...</failure>
///     <system-out>1 step(s) skipped</system-out>
///   </testcase>
/// </testsuite>
/// ```
pub fn generate_junit_xml(report: &SuiteReport) -> String {
    let time_attr = report
        .duration_ms
        .map(|ms| format!(" time=\"{:.3}\"", ms as f64 / 1000.0))
        .unwrap_or_default();

    let mut cases = String::new();
    for result in &report.scenarios {
        let classname = if result.feature.is_empty() {
            CLASSNAME_FALLBACK
        } else {
            &result.feature
        };
        let attrs = format!(
            "name=\"{}\" classname=\"{}\" time=\"{:.3}\"",
            escape_xml(&result.scenario),
            escape_xml(classname),
            result.duration_ms as f64 / 1000.0
        );

        match result.status {
            ScenarioStatus::Passed => cases.push_str(&format!("  <testcase {} />\n", attrs)),
            ScenarioStatus::Failed => cases.push_str(&format!(
                "  <testcase {attrs}>\n    <failure message=\"{message}\" type=\"AssertionFailure\">{body}</failure>\n{skipped}  </testcase>\n",
                attrs = attrs,
                message = escape_xml(&summary(result)),
                body = escape_xml(&detail(result)),
                skipped = skipped_output(result),
            )),
            _ => cases.push_str(&format!(
                "  <testcase {attrs}>\n    <error message=\"{message}\" type=\"ScenarioError\">{body}</error>\n{skipped}  </testcase>\n",
                attrs = attrs,
                message = escape_xml(&summary(result)),
                body = escape_xml(&detail(result)),
                skipped = skipped_output(result),
            )),
        }
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<testsuite name=\"{name}\" tests=\"{tests}\" failures=\"{failures}\" errors=\"{errors}\" skipped=\"{skipped}\"{time}>\n{cases}</testsuite>\n",
        name = escape_xml(&report.suite_name),
        tests = report.total,
        failures = report.failed,
        errors = report.errored,
        skipped = 0,
        time = time_attr,
        cases = cases,
    )
}

/// First line of the scenario's error message.
fn summary(result: &ScenarioResult) -> String {
    result
        .error
        .as_deref()
        .and_then(|e| e.lines().next())
        .unwrap_or("scenario did not pass")
        .to_string()
}

fn detail(result: &ScenarioResult) -> String {
    match result.first_problem() {
        Some(step) => format!(
            "Step {}: {} {}\n{}",
            step.index + 1,
            step.keyword,
            step.text,
            step.message.as_deref().unwrap_or_default()
        ),
        None => result.error.clone().unwrap_or_default(),
    }
}

fn skipped_output(result: &ScenarioResult) -> String {
    match result.count(StepOutcome::Skipped) {
        0 => String::new(),
        n => format!("    <system-out>{} step(s) skipped</system-out>\n", n),
    }
}

/// Escape XML special characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
