use thiserror::Error;

/// Errors from loading feature files and tag expressions.
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {message}")]
    Gherkin { path: String, message: String },

    #[error("{path}:{line}: {message}")]
    Parse { path: String, line: usize, message: String },

    #[error("invalid YAML feature {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid tag expression '{expression}': {reason}")]
    TagExpression { expression: String, reason: String },
}
