use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A server URL definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    /// Required by OpenAPI; a server without one is skipped by the converter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub extensions: IndexMap<String, serde_json::Value>,
}
