use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::schemas::IrSchema;
use super::types::NameAndWireValue;

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    Trace,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Trace => "TRACE",
        }
    }
}

/// A converted API operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrEndpoint {
    pub method: HttpMethod,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    pub name: NameAndWireValue,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sdk_group_name: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audiences: Vec<String>,
    pub path_parameters: Vec<IrParameter>,
    pub query_parameters: Vec<IrParameter>,
    pub headers: Vec<IrParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<IrRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<IrResponse>,
    pub error_responses: Vec<IrErrorResponse>,
    pub authed: bool,
    pub security: Vec<IndexMap<String, Vec<String>>>,
    pub internal: bool,
    pub deprecated: bool,
}

/// An operation that the API calls on the consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrWebhook {
    pub method: HttpMethod,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    pub name: NameAndWireValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub headers: Vec<IrParameter>,
    pub payload: IrSchema,
}

/// A path, query or header parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrParameter {
    pub name: NameAndWireValue,
    pub schema: IrSchema,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Name of the SDK variable bound to this path parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum IrRequest {
    #[serde(rename_all = "camelCase")]
    Json {
        content_type: String,
        schema: IrSchema,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        required: bool,
    },
    #[serde(rename_all = "camelCase")]
    Multipart {
        content_type: String,
        properties: Vec<IrMultipartProperty>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        required: bool,
    },
    #[serde(rename_all = "camelCase")]
    Bytes {
        content_type: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        required: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrMultipartProperty {
    pub key: String,
    pub name: NameAndWireValue,
    pub kind: IrMultipartPropertyKind,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum IrMultipartPropertyKind {
    #[serde(rename_all = "camelCase")]
    File {
        is_array: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content_type: Option<String>,
    },
    Field {
        schema: IrSchema,
    },
}

/// The success response of an endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum IrResponse {
    #[serde(rename_all = "camelCase")]
    Json {
        status_code: u16,
        schema: IrSchema,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    File {
        status_code: u16,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Text {
        status_code: u16,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    /// `text/event-stream`; `schema` describes one event.
    #[serde(rename_all = "camelCase")]
    Streaming {
        status_code: u16,
        schema: IrSchema,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrErrorResponse {
    pub status_code: u16,
    pub name: NameAndWireValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<IrSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
