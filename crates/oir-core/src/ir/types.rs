use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::operations::{IrEndpoint, IrWebhook};
use super::schemas::{IrPrimitiveSchema, IrSchema};
use super::security::IrSecurityScheme;

/// The intermediate representation of one OpenAPI document: every schema,
/// endpoint, webhook and auth scheme, with names in all casings and
/// references kept as ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrOpenApiFile {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub servers: Vec<IrServer>,
    pub tags: IndexMap<String, IrTag>,
    pub endpoints: Vec<IrEndpoint>,
    pub webhooks: Vec<IrWebhook>,
    pub schemas: IndexMap<String, IrSchema>,
    pub security_schemes: IndexMap<String, IrSecurityScheme>,
    pub has_endpoints_marked_internal: bool,
    pub errors: Vec<ConversionError>,
    pub non_request_referenced_schemas: Vec<String>,
    pub dependencies: Vec<String>,
    pub variables: IndexMap<String, IrPrimitiveSchema>,
}

/// A server URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrServer {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Taken from `x-fern-server-name`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrTag {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A name with every casing variant pre-computed, plus the string used on
/// the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameAndWireValue {
    pub original_value: String,
    pub wire_value: String,
    pub camel_case: String,
    pub pascal_case: String,
    pub snake_case: String,
    pub screaming_snake_case: String,
}

impl fmt::Display for NameAndWireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original_value)
    }
}

/// Category of a recoverable conversion problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionErrorKind {
    DanglingReference,
    UnsupportedReference,
    DuplicateEnumValue,
    InvalidIdentifier,
    MissingDiscriminantValue,
    UnsupportedSecurityScheme,
    UnsupportedContentType,
    UnknownExtension,
    MalformedNode,
    ContentConflict,
    DuplicateEndpoint,
}

/// A recoverable problem found while converting. `breadcrumbs` is the path
/// of document keys leading to the offending node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionError {
    pub kind: ConversionErrorKind,
    pub breadcrumbs: Vec<String>,
    pub message: String,
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.breadcrumbs.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.breadcrumbs.join(" > "), self.message)
        }
    }
}
