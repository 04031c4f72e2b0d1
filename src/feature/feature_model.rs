use serde::{Deserialize, Serialize};

/// Step keywords recognised at the start of a step line.
pub const STEP_KEYWORDS: &[&str] = &["Given", "When", "Then", "And", "But", "*"];

/// A parsed feature: a named group of scenarios.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feature {
    pub name: String,

    /// Free text between the `Feature:` line and the first section
    #[serde(default)]
    pub description: String,

    /// Tags on the feature; already merged into each scenario's tags
    #[serde(default)]
    pub tags: Vec<String>,

    pub scenarios: Vec<Scenario>,

    /// File this feature was read from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// One test case: an ordered list of step phrases.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub name: String,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Background steps first, then the scenario's own
    pub steps: Vec<ScenarioStep>,

    /// 1-based source line of the scenario header (0 when built in code)
    #[serde(default)]
    pub line: usize,
}

/// A single Given/When/Then phrase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioStep {
    pub keyword: String,
    pub text: String,
    #[serde(default)]
    pub line: usize,
}

impl ScenarioStep {
    pub fn new(keyword: &str, text: &str) -> Self {
        ScenarioStep {
            keyword: keyword.to_string(),
            text: text.to_string(),
            line: 0,
        }
    }

    /// Split a leading step keyword off `phrase`, defaulting to `*`.
    pub fn from_phrase(phrase: &str) -> Self {
        let trimmed = phrase.trim();
        match split_keyword(trimmed) {
            Some((keyword, text)) => ScenarioStep::new(keyword, text),
            None => ScenarioStep::new("*", trimmed),
        }
    }
}

/// `("Given", "I am here")` for `"Given I am here"`.
pub fn split_keyword(line: &str) -> Option<(&'static str, &str)> {
    STEP_KEYWORDS.iter().find_map(|keyword| {
        let rest = line.strip_prefix(keyword)?;
        if rest.starts_with(char::is_whitespace) {
            Some((*keyword, rest.trim()))
        } else {
            None
        }
    })
}

impl Scenario {
    /// Build a scenario from plain phrases, keywords optional.
    pub fn from_phrases(name: &str, phrases: &[&str]) -> Self {
        Scenario {
            name: name.to_string(),
            tags: Vec::new(),
            steps: phrases.iter().map(|p| ScenarioStep::from_phrase(p)).collect(),
            line: 0,
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }
}

impl Feature {
    pub fn new(name: &str, scenarios: Vec<Scenario>) -> Self {
        Feature {
            name: name.to_string(),
            description: String::new(),
            tags: Vec::new(),
            scenarios,
            path: None,
        }
    }

    pub fn scenario_count(&self) -> usize {
        self.scenarios.len()
    }
}

// ============================================================================
// YAML scenario files
// ============================================================================

/// On-disk YAML form of a feature.
///
/// ```yaml
/// name: Web search
/// tags: ["@search"]
/// background:
///   - Given I am on the Google homepage
/// scenarios:
///   - name: Search for cats
///     steps:
///       - When I search for "cats"
///       - Then I should see search results containing "cats"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YamlFeature {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub background: Vec<String>,
    pub scenarios: Vec<YamlScenario>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YamlScenario {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub steps: Vec<String>,
}

impl YamlFeature {
    pub fn into_feature(self, path: Option<String>) -> Feature {
        let background: Vec<ScenarioStep> = self.background.iter().map(|p| ScenarioStep::from_phrase(p)).collect();
        let feature_tags = self.tags.clone();

        let scenarios = self
            .scenarios
            .into_iter()
            .map(|s| {
                let mut steps = background.clone();
                steps.extend(s.steps.iter().map(|p| ScenarioStep::from_phrase(p)));
                Scenario {
                    name: s.name,
                    tags: merge_tags(&feature_tags, &s.tags),
                    steps,
                    line: 0,
                }
            })
            .collect();

        Feature {
            name: self.name,
            description: self.description,
            tags: self.tags,
            scenarios,
            path,
        }
    }
}

/// Feature tags followed by the scenario's own, without duplicates.
pub fn merge_tags(inherited: &[String], own: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(inherited.len() + own.len());
    for tag in inherited.iter().chain(own) {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    tags
}
