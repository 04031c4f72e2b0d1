use std::fs;
use std::path::{Path, PathBuf};

use crate::feature::error::FeatureError;
use crate::feature::feature_model::{Feature, YamlFeature};
use crate::feature::parser::parse_feature_file;

const FEATURE_EXTENSIONS: &[&str] = &["feature", "yaml", "yml"];

/// Load a feature file, or every feature file under a directory.
///
/// Directories are walked recursively and features come back sorted by path.
pub fn load_features(path: &Path) -> Result<Vec<Feature>, FeatureError> {
    if path.is_file() {
        return Ok(vec![load_feature_file(path)?]);
    }

    let mut files = Vec::new();
    collect_feature_files(path, &mut files)?;
    files.sort();

    tracing::debug!(root = %path.display(), files = files.len(), "loading features");
    files.iter().map(|file| load_feature_file(file)).collect()
}

/// Load one `.feature`, `.yaml` or `.yml` file.
pub fn load_feature_file(path: &Path) -> Result<Feature, FeatureError> {
    if !matches!(extension(path).as_deref(), Some("yaml") | Some("yml")) {
        return parse_feature_file(path);
    }

    let label = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|source| FeatureError::Io {
        path: label.clone(),
        source,
    })?;
    parse_yaml_feature(&content, Some(&label))
}

/// Parse a YAML scenario file.
pub fn parse_yaml_feature(content: &str, path: Option<&str>) -> Result<Feature, FeatureError> {
    let label = path.unwrap_or("<inline>").to_string();
    let yaml: YamlFeature = serde_yaml::from_str(content).map_err(|source| FeatureError::Yaml {
        path: label,
        source,
    })?;
    Ok(yaml.into_feature(path.map(str::to_string)))
}

fn collect_feature_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), FeatureError> {
    let io_error = |source| FeatureError::Io {
        path: dir.display().to_string(),
        source,
    };

    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_dir() {
            collect_feature_files(&path, files)?;
        } else if extension(&path).is_some_and(|ext| FEATURE_EXTENSIONS.contains(&ext.as_str())) {
            files.push(path);
        }
    }
    Ok(())
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}
