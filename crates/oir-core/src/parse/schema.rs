use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A JSON Schema type keyword value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
    #[serde(other)]
    Unsupported,
}

/// The `type` field can be a single type or an array of types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(SchemaType),
    Multiple(Vec<SchemaType>),
}

/// A reference, an inline schema, or a node that is not a valid schema.
///
/// Variants are tried in order, so any object carrying a `$ref` string is a
/// reference regardless of its sibling keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Schema(Box<Schema>),
    Invalid(serde_json::Value),
}

impl SchemaOrRef {
    /// Visit this node and every inline schema nested under it. References
    /// are not followed.
    pub fn visit<F: FnMut(&Schema)>(&self, f: &mut F) {
        if let SchemaOrRef::Schema(schema) = self {
            schema.visit(f);
        }
    }

    pub fn as_schema(&self) -> Option<&Schema> {
        match self {
            SchemaOrRef::Schema(schema) => Some(schema),
            _ => None,
        }
    }

    /// True for `{type: null}` and `{type: [null]}` members of a union.
    pub fn is_null_type(&self) -> bool {
        match self.as_schema().and_then(|s| s.schema_type.as_ref()) {
            Some(TypeSet::Single(SchemaType::Null)) => true,
            Some(TypeSet::Multiple(types)) => types.iter().all(|t| *t == SchemaType::Null),
            _ => false,
        }
    }
}

/// Discriminator for polymorphic schemas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discriminator {
    #[serde(rename = "propertyName")]
    pub property_name: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub mapping: IndexMap<String, String>,
}

/// A JSON Schema object (OpenAPI 3.1 dialect). Keywords the converter does
/// not read, including vendor extensions, are kept in `extensions`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<TypeSet>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, SchemaOrRef>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<AdditionalProperties>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaOrRef>>,

    #[serde(rename = "allOf", default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<SchemaOrRef>,

    #[serde(rename = "oneOf", default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<SchemaOrRef>,

    #[serde(rename = "anyOf", default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<SchemaOrRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,

    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub const_value: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    #[serde(rename = "minLength", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(flatten)]
    pub extensions: IndexMap<String, serde_json::Value>,
}

impl Schema {
    pub fn visit<F: FnMut(&Schema)>(&self, f: &mut F) {
        f(self);
        for prop in self.properties.values() {
            prop.visit(f);
        }
        if let Some(items) = &self.items {
            items.visit(f);
        }
        if let Some(AdditionalProperties::Schema(inner)) = &self.additional_properties {
            inner.visit(f);
        }
        for member in self.all_of.iter().chain(&self.one_of).chain(&self.any_of) {
            member.visit(f);
        }
    }

    /// Whether a multi-valued `type` lists `null`.
    pub fn type_includes_null(&self) -> bool {
        matches!(&self.schema_type, Some(TypeSet::Multiple(types)) if types.contains(&SchemaType::Null))
    }

    /// Whether this schema describes an object (explicitly or through its keywords).
    pub fn is_object_like(&self) -> bool {
        match &self.schema_type {
            Some(TypeSet::Single(SchemaType::Object)) => true,
            Some(TypeSet::Multiple(types)) => types.contains(&SchemaType::Object),
            Some(_) => false,
            None => !self.properties.is_empty() || self.additional_properties.is_some(),
        }
    }

    /// A schema that only annotates (`description`, `title`, `nullable`,
    /// `type: null`) and declares no shape of its own.
    pub fn is_annotation_only(&self) -> bool {
        let null_or_untyped = match &self.schema_type {
            None | Some(TypeSet::Single(SchemaType::Null)) => true,
            Some(TypeSet::Multiple(types)) => types.iter().all(|t| *t == SchemaType::Null),
            Some(TypeSet::Single(_)) => false,
        };
        null_or_untyped
            && self.format.is_none()
            && self.properties.is_empty()
            && self.required.is_empty()
            && self.additional_properties.is_none()
            && self.items.is_none()
            && self.all_of.is_empty()
            && self.one_of.is_empty()
            && self.any_of.is_empty()
            && self.discriminator.is_none()
            && self.enum_values.is_empty()
            && self.const_value.is_none()
    }

    /// True for `type: null` on its own.
    pub fn is_null_only(&self) -> bool {
        match &self.schema_type {
            Some(TypeSet::Single(SchemaType::Null)) => true,
            Some(TypeSet::Multiple(types)) => {
                !types.is_empty() && types.iter().all(|t| *t == SchemaType::Null)
            }
            _ => false,
        }
    }

    pub fn extension(&self, key: &str) -> Option<&serde_json::Value> {
        self.extensions.get(key)
    }
}

/// `additionalProperties` can be a boolean or a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<SchemaOrRef>),
}
