use std::path::Path;

use gherkin::{GherkinEnv, ParseFileError};

use crate::feature::error::FeatureError;
use crate::feature::feature_model::{Feature, Scenario, ScenarioStep, merge_tags};

const INLINE_SOURCE: &str = "<inline>";

/// Parse Gherkin source text into a runnable feature.
///
/// Backgrounds are prepended to every scenario, rules are flattened into
/// the feature, and each `Examples` row of a scenario outline becomes its
/// own scenario. Data tables and doc strings on steps are rejected.
pub fn parse_feature(source: &str, path: Option<&str>) -> Result<Feature, FeatureError> {
    let label = path.unwrap_or(INLINE_SOURCE);
    let parsed = gherkin::Feature::parse(source, GherkinEnv::default()).map_err(|e| FeatureError::Gherkin {
        path: label.to_string(),
        message: e.to_string(),
    })?;
    lower(parsed, label, path.map(str::to_string))
}

/// Read and parse one `.feature` file.
pub fn parse_feature_file(path: &Path) -> Result<Feature, FeatureError> {
    let label = path.display().to_string();
    let parsed = gherkin::Feature::parse_path(path, GherkinEnv::default()).map_err(|e| match e {
        ParseFileError::Reading { source, .. } => FeatureError::Io {
            path: label.clone(),
            source,
        },
        other => FeatureError::Gherkin {
            path: label.clone(),
            message: other.to_string(),
        },
    })?;
    lower(parsed, &label, Some(label.clone()))
}

fn lower(parsed: gherkin::Feature, label: &str, path: Option<String>) -> Result<Feature, FeatureError> {
    let feature_tags = tagged(&parsed.tags);
    let background = match &parsed.background {
        Some(background) => steps(label, &background.steps)?,
        None => Vec::new(),
    };

    let mut scenarios = Vec::new();
    for scenario in &parsed.scenarios {
        expand(label, scenario, &feature_tags, &background, &mut scenarios)?;
    }
    for rule in &parsed.rules {
        let rule_tags = merge_tags(&feature_tags, &tagged(&rule.tags));
        let mut rule_background = background.clone();
        if let Some(extra) = &rule.background {
            rule_background.extend(steps(label, &extra.steps)?);
        }
        for scenario in &rule.scenarios {
            expand(label, scenario, &rule_tags, &rule_background, &mut scenarios)?;
        }
    }

    tracing::debug!(path = label, feature = %parsed.name, scenarios = scenarios.len(), "parsed feature");

    Ok(Feature {
        name: parsed.name.trim().to_string(),
        description: parsed.description.as_deref().map(str::trim).unwrap_or_default().to_string(),
        tags: feature_tags,
        scenarios,
        path,
    })
}

/// Push `scenario`, or one scenario per Examples row for an outline.
fn expand(
    label: &str,
    scenario: &gherkin::Scenario,
    inherited: &[String],
    background: &[ScenarioStep],
    out: &mut Vec<Scenario>,
) -> Result<(), FeatureError> {
    let line = scenario.position.line;
    let tags = merge_tags(inherited, &tagged(&scenario.tags));
    let mut own = background.to_vec();
    own.extend(steps(label, &scenario.steps)?);

    let is_outline = scenario.keyword.contains("Outline") || scenario.keyword.contains("Template");
    if !is_outline && scenario.examples.is_empty() {
        out.push(Scenario {
            name: scenario.name.trim().to_string(),
            tags,
            steps: own,
            line,
        });
        return Ok(());
    }

    let mut number = 0;
    for examples in &scenario.examples {
        let Some(table) = &examples.table else {
            continue;
        };
        let Some((header, rows)) = table.rows.split_first() else {
            continue;
        };
        let row_tags = merge_tags(&tags, &tagged(&examples.tags));

        for (offset, row) in rows.iter().enumerate() {
            if row.len() != header.len() {
                return Err(FeatureError::Parse {
                    path: label.to_string(),
                    line: table.position.line + offset + 1,
                    message: format!("Examples row has {} cells, header has {}", row.len(), header.len()),
                });
            }
            number += 1;
            let fill = |text: &str| {
                header
                    .iter()
                    .zip(row)
                    .fold(text.to_string(), |acc, (key, value)| {
                        acc.replace(&format!("<{}>", key.trim()), value.trim())
                    })
            };
            out.push(Scenario {
                name: format!("{} (example {})", fill(scenario.name.trim()), number),
                tags: row_tags.clone(),
                steps: own
                    .iter()
                    .map(|step| ScenarioStep {
                        keyword: step.keyword.clone(),
                        text: fill(&step.text),
                        line: step.line,
                    })
                    .collect(),
                line,
            });
        }
    }

    if number == 0 {
        return Err(FeatureError::Parse {
            path: label.to_string(),
            line,
            message: format!("Scenario Outline '{}' has no Examples", scenario.name.trim()),
        });
    }
    Ok(())
}

fn steps(label: &str, steps: &[gherkin::Step]) -> Result<Vec<ScenarioStep>, FeatureError> {
    steps
        .iter()
        .map(|step| {
            let line = step.position.line;
            let unsupported = if step.table.is_some() {
                Some("data tables are not supported")
            } else if step.docstring.is_some() {
                Some("doc strings are not supported")
            } else {
                None
            };
            if let Some(message) = unsupported {
                return Err(FeatureError::Parse {
                    path: label.to_string(),
                    line,
                    message: message.to_string(),
                });
            }
            Ok(ScenarioStep {
                keyword: step.keyword.trim().to_string(),
                text: step.value.trim().to_string(),
                line,
            })
        })
        .collect()
}

/// Tags as written in feature files, with their `@`.
fn tagged(tags: &[String]) -> Vec<String> {
    tags.iter()
        .map(|tag| format!("@{}", tag.trim_start_matches('@')))
        .collect()
}
