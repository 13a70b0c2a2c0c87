use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("circular reference detected at {pointer} (resolution path: {chain})")]
    CircularReference { pointer: String, chain: String },

    #[error("reference {pointer} exceeds the maximum resolution depth of {depth}")]
    ReferenceDepthExceeded { pointer: String, depth: usize },

    #[error("invalid reference format: {0}")]
    InvalidReference(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("cannot derive a name from an empty identifier")]
    InvalidIdentifier,
}

/// Fatal conversion failures. Recoverable problems never surface here; they
/// are collected into `IrOpenApiFile::errors`.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("name error: {0}")]
    Name(#[from] NameError),

    #[error("document has no `info` section")]
    MissingInfo,

    #[error("document has no `info.title`")]
    MissingTitle,

    #[error("request body at {location} still declares both JSON and multipart content")]
    UnresolvedContentConflict { location: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml_ng::Error,
    },
}

#[derive(Debug, Error)]
pub enum GeneratorConfigError {
    #[error("generator {0} uses an output mode this version does not support")]
    UnsupportedOutputMode(String),
}
