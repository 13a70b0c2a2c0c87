use serde::{Deserialize, Serialize};

use super::types::NameAndWireValue;

/// An authentication scheme supported by downstream generators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum IrSecurityScheme {
    Basic {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    Bearer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Header {
        /// Declared `name` of the apiKey scheme; the header sent on the wire.
        header_name: String,
        /// SDK parameter name from `x-fern-header.name`. Its wire value is
        /// `header_name`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<NameAndWireValue>,
        /// Value prefix such as `Token`, from `x-fern-header.prefix`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prefix: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    Oauth {
        scopes: Vec<IrOAuthScope>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl IrSecurityScheme {
    /// The header this scheme carries its credential in.
    pub fn header_name(&self) -> &str {
        match self {
            IrSecurityScheme::Header { header_name, .. } => header_name,
            _ => "Authorization",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrOAuthScope {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
