//! YAML tree error types

use thiserror::Error;

/// Errors raised while parsing or rendering the yaml tree
#[derive(Debug, Error)]
pub enum YamlTreeError {
    #[error("Unable to parse yaml: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Unsupported mapping key at {path}: only scalar keys are allowed")]
    UnsupportedKey { path: String },
}

/// Result alias for yaml tree operations
pub type YamlTreeResult<T> = Result<T, YamlTreeError>;
