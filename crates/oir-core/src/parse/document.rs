use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::components::Components;
use super::operation::PathItem;
use super::parameter::ParameterOrRef;
use super::request_body::RequestBodyOrRef;
use super::response::ResponseOrRef;
use super::security::SecurityRequirement;
use super::server::Server;
use super::schema::Schema;

/// Info object describing the API. Every field is optional at parse time so
/// that a missing title is reported by the converter rather than by serde.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Info {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(flatten)]
    pub extensions: IndexMap<String, serde_json::Value>,
}

/// Tag definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Top-level OpenAPI 3.x document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiDocument {
    pub openapi: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<Info>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub paths: IndexMap<String, Option<PathItem>>,

    /// OpenAPI 3.1 top-level webhooks, keyed by webhook name.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub webhooks: IndexMap<String, Option<PathItem>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,

    #[serde(flatten)]
    pub extensions: IndexMap<String, serde_json::Value>,
}

impl OpenApiDocument {
    pub fn extension(&self, key: &str) -> Option<&serde_json::Value> {
        self.extensions.get(key)
    }

    /// Visit every inline schema reachable from the document without
    /// following `$ref` pointers.
    pub fn visit_schemas<F: FnMut(&Schema)>(&self, f: &mut F) {
        let path_items = self
            .paths
            .values()
            .chain(self.webhooks.values())
            .flatten();
        for item in path_items {
            visit_parameters(&item.parameters, f);
            for (_, op) in item.operations() {
                visit_parameters(&op.parameters, f);
                if let Some(RequestBodyOrRef::RequestBody(body)) = &op.request_body {
                    for media in body.content.values() {
                        media.schema.iter().for_each(|s| s.visit(f));
                    }
                }
                for response in op.responses.values() {
                    visit_response(response, f);
                }
            }
        }

        let Some(components) = &self.components else {
            return;
        };
        for schema in components.schemas.values() {
            schema.visit(f);
        }
        visit_parameters(components.parameters.values(), f);
        for body in components.request_bodies.values() {
            if let RequestBodyOrRef::RequestBody(body) = body {
                for media in body.content.values() {
                    media.schema.iter().for_each(|s| s.visit(f));
                }
            }
        }
        for response in components.responses.values() {
            visit_response(response, f);
        }
    }
}

fn visit_parameters<'a, F: FnMut(&Schema)>(
    parameters: impl IntoIterator<Item = &'a ParameterOrRef>,
    f: &mut F,
) {
    for param in parameters {
        if let ParameterOrRef::Parameter(p) = param {
            p.schema.iter().for_each(|s| s.visit(f));
        }
    }
}

fn visit_response<F: FnMut(&Schema)>(response: &ResponseOrRef, f: &mut F) {
    if let ResponseOrRef::Response(r) = response {
        for media in r.content.values() {
            media.schema.iter().for_each(|s| s.visit(f));
        }
    }
}
