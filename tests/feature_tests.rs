use std::fs;

use page_scenarios::feature::{
    error::FeatureError,
    loader::{load_features, parse_yaml_feature},
    parser::parse_feature,
    tags::TagFilter,
};

const SEARCH_FEATURE: &str = r#"
# Web search feature
@search
Feature: Web search
  Searching from the home page.

  Background:
    Given I am on the Google homepage

  @smoke
  Scenario: Search for cats
    When I search for "cats"
    Then I should see search results containing "cats"

  @outline
  Scenario Outline: Search for <animal>
    When I search for "<animal>"
    * I should see search results containing "<animal>"

    Examples:
      | animal |
      | dogs   |

    @slow
    Examples:
      | animal  |
      | ferrets |
"#;

// =========================================================================
// Gherkin
// =========================================================================

#[test]
fn parses_feature_header_and_description() {
    let feature = parse_feature(SEARCH_FEATURE, Some("search.feature")).unwrap();
    assert_eq!(feature.name, "Web search");
    assert_eq!(feature.description, "Searching from the home page.");
    assert_eq!(feature.tags, vec!["@search"]);
    assert_eq!(feature.path.as_deref(), Some("search.feature"));
    assert_eq!(feature.scenario_count(), 3);
}

#[test]
fn background_steps_are_prepended() {
    let feature = parse_feature(SEARCH_FEATURE, None).unwrap();
    let cats = &feature.scenarios[0];
    assert_eq!(cats.name, "Search for cats");
    let texts: Vec<_> = cats.steps.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "I am on the Google homepage",
            "I search for \"cats\"",
            "I should see search results containing \"cats\"",
        ]
    );
    assert_eq!(cats.steps[0].keyword, "Given");
    assert_eq!(cats.steps[0].line, 8);
}

#[test]
fn feature_tags_are_inherited() {
    let feature = parse_feature(SEARCH_FEATURE, None).unwrap();
    assert_eq!(feature.scenarios[0].tags, vec!["@search", "@smoke"]);
}

#[test]
fn outline_rows_expand_into_scenarios() {
    let feature = parse_feature(SEARCH_FEATURE, None).unwrap();
    let dogs = &feature.scenarios[1];
    let ferrets = &feature.scenarios[2];

    assert_eq!(dogs.name, "Search for dogs (example 1)");
    assert_eq!(ferrets.name, "Search for ferrets (example 2)");
    assert_eq!(dogs.steps[1].text, "I search for \"dogs\"");
    assert_eq!(dogs.steps[2].keyword, "*");
    assert_eq!(dogs.tags, vec!["@search", "@outline"]);
    assert_eq!(ferrets.tags, vec!["@search", "@outline", "@slow"]);
}

#[test]
fn parse_errors_carry_path_and_line() {
    let source = "Feature: Broken\n  Scenario: one\n    Given a step\n      | a | b |\n";
    match parse_feature(source, Some("broken.feature")).unwrap_err() {
        FeatureError::Parse { path, line, message } => {
            assert_eq!(path, "broken.feature");
            assert_eq!(line, 3);
            assert!(message.contains("data tables"));
        }
        other => panic!("expected Parse, got {other:?}"),
    }
}

#[test]
fn rejects_doc_strings_and_malformed_gherkin() {
    let doc = "Feature: F\n  Scenario: s\n    Given text\n      \"\"\"\n      body\n      \"\"\"\n";
    match parse_feature(doc, None).unwrap_err() {
        FeatureError::Parse { path, line, message } => {
            assert_eq!(path, "<inline>");
            assert_eq!(line, 3);
            assert!(message.contains("doc strings"));
        }
        other => panic!("expected Parse, got {other:?}"),
    }

    let missing = "Scenario: s\n  Given x\n";
    match parse_feature(missing, Some("missing.feature")).unwrap_err() {
        FeatureError::Gherkin { path, .. } => assert_eq!(path, "missing.feature"),
        other => panic!("expected Gherkin, got {other:?}"),
    }
}

#[test]
fn rules_are_flattened_with_their_tags_and_background() {
    let source = "@web\nFeature: F\n  Background:\n    Given home\n\n  @checkout\n  Rule: paying\n    Background:\n      Given a cart\n\n    Scenario: pay\n      When I pay\n";
    let feature = parse_feature(source, None).unwrap();
    assert_eq!(feature.scenario_count(), 1);
    let pay = &feature.scenarios[0];
    assert_eq!(pay.name, "pay");
    assert_eq!(pay.tags, vec!["@web", "@checkout"]);
    let texts: Vec<_> = pay.steps.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["home", "a cart", "I pay"]);
    assert_eq!(pay.line, 11);
}

#[test]
fn outline_without_examples_is_an_error() {
    let source = "Feature: F\n  Scenario Outline: o\n    Given <x>\n";
    let err = parse_feature(source, None).unwrap_err();
    assert!(err.to_string().contains("has no Examples"), "{err}");
}

#[test]
fn example_row_width_must_match_header() {
    let source = "Feature: F\n  Scenario Outline: o\n    Given <x>\n    Examples:\n      | x |\n      | 1 | 2 |\n";
    assert!(parse_feature(source, None).is_err());
}

// =========================================================================
// YAML
// =========================================================================

#[test]
fn yaml_feature_with_background_and_tags() {
    let yaml = r#"
name: Short forms
tags: ["@short"]
background:
  - open homepage
scenarios:
  - name: cats
    tags: ["@smoke"]
    steps:
      - search for 'cats'
      - Then expect results containing 'cats'
"#;
    let feature = parse_yaml_feature(yaml, Some("short.yaml")).unwrap();
    let scenario = &feature.scenarios[0];
    assert_eq!(scenario.tags, vec!["@short", "@smoke"]);
    assert_eq!(scenario.steps.len(), 3);
    assert_eq!(scenario.steps[0].keyword, "*");
    assert_eq!(scenario.steps[2].keyword, "Then");
    assert_eq!(scenario.steps[2].text, "expect results containing 'cats'");
}

#[test]
fn malformed_yaml_is_a_yaml_error() {
    let err = parse_yaml_feature("name: [unterminated", Some("bad.yaml")).unwrap_err();
    assert!(matches!(err, FeatureError::Yaml { .. }), "got {err:?}");
}

// =========================================================================
// Loader
// =========================================================================

#[test]
fn loads_directory_recursively_in_path_order() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("b.feature"), "Feature: B\n  Scenario: b\n    Given x\n").unwrap();
    fs::write(
        dir.path().join("nested").join("c.yml"),
        "name: C\nscenarios:\n  - name: c\n    steps: [x]\n",
    )
    .unwrap();
    fs::write(dir.path().join("a.yaml"), "name: A\nscenarios:\n  - name: a\n    steps: [x]\n").unwrap();
    fs::write(dir.path().join("notes.txt"), "not a feature").unwrap();

    let features = load_features(dir.path()).unwrap();
    let names: Vec<_> = features.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
}

#[test]
fn loads_single_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("one.feature");
    fs::write(&path, SEARCH_FEATURE).unwrap();
    let features = load_features(&path).unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0].scenario_count(), 3);
}

#[test]
fn missing_path_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_features(&dir.path().join("absent")).unwrap_err();
    assert!(matches!(err, FeatureError::Io { .. }), "got {err:?}");
}

// =========================================================================
// Tag expressions
// =========================================================================

fn tags(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| t.to_string()).collect()
}

#[test]
fn tag_expression_precedence() {
    let expr = TagFilter::parse(Some("@a or @b and not @c")).unwrap();
    assert!(expr.matches(&tags(&["@a", "@c"])));
    assert!(expr.matches(&tags(&["@b"])));
    assert!(!expr.matches(&tags(&["@b", "@c"])));

    let grouped = TagFilter::parse(Some("(@a or @b) and not @c")).unwrap();
    assert!(!grouped.matches(&tags(&["@a", "@c"])));
    assert!(grouped.matches(&tags(&["@a"])));
}

#[test]
fn invalid_tag_expressions_are_rejected() {
    for bad in ["@a and", "(@a", "@a @b", "not"] {
        let err = TagFilter::parse(Some(bad)).unwrap_err();
        assert!(matches!(err, FeatureError::TagExpression { .. }), "{bad}: {err:?}");
    }
}

#[test]
fn tag_filter_selects_scenarios_and_drops_empty_features() {
    let feature = parse_feature(SEARCH_FEATURE, None).unwrap();
    let other = parse_feature("Feature: Other\n  Scenario: o\n    Given x\n", None).unwrap();

    let filter = TagFilter::parse(Some("@smoke or @slow")).unwrap();
    let selected = filter.apply(vec![feature.clone(), other.clone()]);
    assert_eq!(selected.len(), 1);
    let names: Vec<_> = selected[0].scenarios.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Search for cats", "Search for ferrets (example 2)"]);

    let everything = TagFilter::parse(Some("  ")).unwrap().apply(vec![feature, other]);
    assert_eq!(everything.len(), 2);
}

#[test]
fn tag_filter_on_scenarios_built_in_code() {
    use page_scenarios::feature::feature_model::{Feature, Scenario};

    let feature = Feature::new(
        "Built",
        vec![
            Scenario::from_phrases("fast", &["open homepage"]).with_tags(&["@fast"]),
            Scenario::from_phrases("slow", &["open homepage"]).with_tags(&["@fast", "@slow"]),
        ],
    );
    let selected = TagFilter::parse(Some("@fast and not @slow")).unwrap().apply(vec![feature]);
    assert_eq!(selected[0].scenarios.len(), 1);
    assert_eq!(selected[0].scenarios[0].name, "fast");
}
