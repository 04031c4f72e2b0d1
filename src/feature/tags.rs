use std::fmt;

use gherkin::tagexpr::TagOperation;

use crate::feature::error::FeatureError;
use crate::feature::feature_model::Feature;

/// Scenario selector built from a tag expression such as
/// `@smoke and not @slow`. An empty filter selects everything.
#[derive(Default)]
pub struct TagFilter {
    expr: Option<(String, TagOperation)>,
}

impl TagFilter {
    pub fn parse(expression: Option<&str>) -> Result<Self, FeatureError> {
        let expr = match expression.map(str::trim) {
            None | Some("") => None,
            Some(text) => {
                let op = text.parse::<TagOperation>().map_err(|e| FeatureError::TagExpression {
                    expression: text.to_string(),
                    reason: e.to_string(),
                })?;
                Some((text.to_string(), op))
            }
        };
        Ok(TagFilter { expr })
    }

    /// `tags` carry their `@`, as written in feature files.
    pub fn matches(&self, tags: &[String]) -> bool {
        let Some((_, op)) = &self.expr else {
            return true;
        };
        let bare: Vec<&str> = tags.iter().map(|t| t.trim_start_matches('@')).collect();
        op.eval(bare.iter())
    }

    /// Keep only selected scenarios; drop features left empty.
    pub fn apply(&self, features: Vec<Feature>) -> Vec<Feature> {
        if self.expr.is_none() {
            return features;
        }
        features
            .into_iter()
            .filter_map(|mut feature| {
                feature.scenarios.retain(|s| self.matches(&s.tags));
                (!feature.scenarios.is_empty()).then_some(feature)
            })
            .collect()
    }
}

impl fmt::Debug for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let expression = self.expr.as_ref().map(|(text, _)| text.as_str());
        f.debug_struct("TagFilter").field("expression", &expression).finish()
    }
}
