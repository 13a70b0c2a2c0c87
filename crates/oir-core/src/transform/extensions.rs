use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::ir::{ConversionErrorKind, IrPrimitiveSchema, IrSchema};
use crate::parse::document::OpenApiDocument;
use crate::parse::schema::SchemaOrRef;

use super::context::ParserContext;
use super::schema_converter::convert_schema;

pub const IGNORE: &str = "x-fern-ignore";
pub const WEBHOOK: &str = "x-fern-webhook";
pub const INTERNAL: &str = "x-internal";
pub const SDK_METHOD_NAME: &str = "x-fern-sdk-method-name";
pub const SDK_GROUP_NAME: &str = "x-fern-sdk-group-name";
pub const AUDIENCES: &str = "x-fern-audiences";
pub const TYPE_NAME: &str = "x-fern-type-name";
pub const PROPERTY_NAME: &str = "x-fern-property-name";
pub const PARAMETER_NAME: &str = "x-fern-parameter-name";
pub const ENUM: &str = "x-fern-enum";
pub const SDK_VARIABLES: &str = "x-fern-sdk-variables";
pub const SDK_VARIABLE: &str = "x-fern-sdk-variable";
pub const SERVER_NAME: &str = "x-fern-server-name";
pub const HEADER: &str = "x-fern-header";

const KNOWN: &[&str] = &[
    IGNORE,
    WEBHOOK,
    SDK_METHOD_NAME,
    SDK_GROUP_NAME,
    AUDIENCES,
    TYPE_NAME,
    PROPERTY_NAME,
    PARAMETER_NAME,
    ENUM,
    SDK_VARIABLES,
    SDK_VARIABLE,
    SERVER_NAME,
    HEADER,
];

type Extensions = IndexMap<String, Value>;

/// `true` only for an explicit boolean `true`.
pub fn flag(extensions: &Extensions, key: &str) -> bool {
    matches!(extensions.get(key), Some(Value::Bool(true)))
}

pub fn string<'e>(extensions: &'e Extensions, key: &str) -> Option<&'e str> {
    extensions.get(key).and_then(Value::as_str)
}

/// A string or a list of strings.
pub fn string_list(extensions: &Extensions, key: &str) -> Vec<String> {
    match extensions.get(key) {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// Record an `UnknownExtension` for each `x-fern-*` key this converter
/// does not understand.
pub fn check_unknown(extensions: &Extensions, ctx: &mut ParserContext<'_>, breadcrumbs: &[String]) {
    for key in extensions.keys() {
        if key.starts_with("x-fern-") && !KNOWN.contains(&key.as_str()) {
            ctx.record(
                ConversionErrorKind::UnknownExtension,
                breadcrumbs,
                format!("unknown extension {key}"),
            );
        }
    }
}

/// Per-value overrides from `x-fern-enum`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EnumValueOverride {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

pub fn enum_overrides(
    extensions: &Extensions,
    ctx: &mut ParserContext<'_>,
    breadcrumbs: &[String],
) -> IndexMap<String, EnumValueOverride> {
    let Some(value) = extensions.get(ENUM) else {
        return IndexMap::new();
    };
    match serde_json::from_value(value.clone()) {
        Ok(overrides) => overrides,
        Err(e) => {
            ctx.record(
                ConversionErrorKind::MalformedNode,
                breadcrumbs,
                format!("invalid {ENUM}: {e}"),
            );
            IndexMap::new()
        }
    }
}

/// `x-fern-header` on a security scheme.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HeaderOverride {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub prefix: Option<String>,
}

pub fn header_override(extensions: &Extensions) -> HeaderOverride {
    extensions
        .get(HEADER)
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default()
}

/// Convert the document-level `x-fern-sdk-variables` map. Only primitive
/// variables are kept.
pub fn variable_definitions(
    document: &OpenApiDocument,
    ctx: &mut ParserContext<'_>,
) -> IndexMap<String, IrPrimitiveSchema> {
    let mut variables = IndexMap::new();
    let Some(Value::Object(raw)) = document.extension(SDK_VARIABLES) else {
        return variables;
    };
    for (name, value) in raw {
        let breadcrumbs = vec![SDK_VARIABLES.to_string(), name.clone()];
        let schema: SchemaOrRef = match serde_json::from_value(value.clone()) {
            Ok(schema) => schema,
            Err(_) => SchemaOrRef::Invalid(value.clone()),
        };
        match convert_schema(&schema, true, ctx, &breadcrumbs) {
            Ok(IrSchema::Primitive(primitive)) => {
                variables.insert(name.clone(), primitive);
            }
            _ => ctx.record(
                ConversionErrorKind::MalformedNode,
                &breadcrumbs,
                format!("variable {name} must be a primitive schema"),
            ),
        }
    }
    variables
}
