use crate::report::report_model::{SuiteReport, status_label};
use crate::steps::outcome::{ScenarioStatus, StepOutcome};

// ============================================================================
// HTML reporter: self-contained HTML report
// ============================================================================

/// Generate a self-contained HTML report.
///
/// Features:
/// - Green/red header based on overall result
/// - Summary bar with passed/failed/errored/total counts
/// - Each scenario in its own section with its step outcomes
/// - Inline CSS (no external dependencies)
pub fn generate_html_report(report: &SuiteReport) -> String {
    let header_color = if report.all_passed() {
        "#4CAF50"
    } else {
        "#f44336"
    };

    let status_text = if report.all_passed() {
        "ALL SCENARIOS PASSED"
    } else {
        "SOME SCENARIOS DID NOT PASS"
    };

    let duration_text = report
        .duration_ms
        .map(|ms| format!(" in {:.1}s", ms as f64 / 1000.0))
        .unwrap_or_default();

    let mut scenarios = String::new();
    for result in &report.scenarios {
        let case_class = match result.status {
            ScenarioStatus::Passed => "pass",
            ScenarioStatus::Failed => "fail",
            _ => "error",
        };

        scenarios.push_str(&format!(
            r#"<div class="scenario {class}">
<h3>{label} {feature} &gt; {name}</h3>
<p>{duration} ms</p>
"#,
            class = case_class,
            label = status_label(result.status),
            feature = escape_html(&result.feature),
            name = escape_html(&result.scenario),
            duration = result.duration_ms,
        ));

        if result.first_problem().is_none() {
            if let Some(ref error) = result.error {
                scenarios.push_str(&format!("<p class=\"error\">Error: {}</p>\n", escape_html(error)));
            }
        }

        scenarios.push_str("<ol class=\"steps\">\n");
        for step in &result.steps {
            scenarios.push_str(&format!(
                "<li class=\"{outcome}\"><b>{keyword}</b> {text}",
                outcome = step.outcome.as_str(),
                keyword = escape_html(&step.keyword),
                text = escape_html(&step.text),
            ));
            if let Some(message) = &step.message {
                scenarios.push_str(&format!("<pre>{}</pre>", escape_html(message)));
            }
            if step.outcome == StepOutcome::Skipped {
                scenarios.push_str(" <i>(skipped)</i>");
            }
            scenarios.push_str("</li>\n");
        }
        scenarios.push_str("</ol>\n</div>\n");
    }

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{suite_name} - Scenario Report</title>
<style>
body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; margin: 0; padding: 0; background: #f5f5f5; }}
.header {{ background: {header_color}; color: white; padding: 20px 30px; }}
.header h1 {{ margin: 0 0 8px 0; font-size: 24px; }}
.header p {{ margin: 0; font-size: 16px; opacity: 0.9; }}
.content {{ max-width: 900px; margin: 20px auto; padding: 0 20px; }}
.scenario {{ background: white; border-radius: 6px; padding: 16px 20px; margin-bottom: 12px; border-left: 4px solid #ccc; }}
.scenario.pass {{ border-left-color: #4CAF50; }}
.scenario.fail {{ border-left-color: #f44336; }}
.scenario.error {{ border-left-color: #FF9800; }}
.scenario h3 {{ margin: 0 0 8px 0; font-size: 16px; }}
.scenario p {{ margin: 4px 0; color: #666; font-size: 14px; }}
.scenario .error {{ color: #f44336; font-weight: bold; }}
.steps {{ margin: 8px 0 0 0; padding-left: 20px; font-size: 13px; }}
.steps .failed {{ color: #c62828; }}
.steps .errored {{ color: #e65100; }}
.steps .skipped {{ color: #999; }}
.steps pre {{ margin: 4px 0; white-space: pre-wrap; }}
</style>
</head>
<body>
<div class="header">
<h1>{status_text}</h1>
<p>{suite_name}: {passed} passed, {failed} failed, {errored} errored ({total} total){duration}</p>
</div>
<div class="content">
{scenarios}
</div>
</body>
</html>"##,
        suite_name = escape_html(&report.suite_name),
        header_color = header_color,
        status_text = status_text,
        passed = report.passed,
        failed = report.failed,
        errored = report.errored,
        total = report.total,
        duration = duration_text,
        scenarios = scenarios,
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
