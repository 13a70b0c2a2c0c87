pub mod components;
pub mod document;
pub mod media_type;
pub mod operation;
pub mod parameter;
pub mod request_body;
pub mod response;
pub mod schema;
pub mod security;
pub mod server;

use crate::error::ParseError;
use document::OpenApiDocument;

/// Parse an OpenAPI document from YAML.
pub fn from_yaml(input: &str) -> Result<OpenApiDocument, ParseError> {
    let document: OpenApiDocument = serde_yaml_ng::from_str(input)?;
    validate_version(&document)?;
    Ok(document)
}

/// Parse an OpenAPI document from JSON.
pub fn from_json(input: &str) -> Result<OpenApiDocument, ParseError> {
    let document: OpenApiDocument = serde_json::from_str(input)?;
    validate_version(&document)?;
    Ok(document)
}

/// Build a typed document from an already-decoded JSON tree.
pub fn from_value(value: serde_json::Value) -> Result<OpenApiDocument, ParseError> {
    let document: OpenApiDocument = serde_json::from_value(value)?;
    validate_version(&document)?;
    Ok(document)
}

fn validate_version(document: &OpenApiDocument) -> Result<(), ParseError> {
    if !document.openapi.starts_with("3.") {
        return Err(ParseError::UnsupportedVersion(document.openapi.clone()));
    }
    Ok(())
}
