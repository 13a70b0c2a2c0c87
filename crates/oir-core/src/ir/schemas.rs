use serde::{Deserialize, Serialize};

use super::types::NameAndWireValue;

/// Metadata shared by every schema variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
}

/// A converted schema. Cycles only ever appear through `Reference`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum IrSchema {
    Object(IrObjectSchema),
    Union(IrUnionSchema),
    Enum(IrEnumSchema),
    Primitive(IrPrimitiveSchema),
    Array(IrArraySchema),
    Map(IrMapSchema),
    Reference(IrReferenceSchema),
    Unknown(IrUnknownSchema),
}

impl IrSchema {
    pub fn unknown(meta: SchemaMeta) -> Self {
        IrSchema::Unknown(IrUnknownSchema { meta })
    }

    pub fn reference(schema_id: impl Into<String>) -> Self {
        IrSchema::Reference(IrReferenceSchema {
            meta: SchemaMeta::default(),
            schema_id: schema_id.into(),
        })
    }

    pub fn meta(&self) -> &SchemaMeta {
        match self {
            IrSchema::Object(s) => &s.meta,
            IrSchema::Union(s) => &s.meta,
            IrSchema::Enum(s) => &s.meta,
            IrSchema::Primitive(s) => &s.meta,
            IrSchema::Array(s) => &s.meta,
            IrSchema::Map(s) => &s.meta,
            IrSchema::Reference(s) => &s.meta,
            IrSchema::Unknown(s) => &s.meta,
        }
    }

    pub fn meta_mut(&mut self) -> &mut SchemaMeta {
        match self {
            IrSchema::Object(s) => &mut s.meta,
            IrSchema::Union(s) => &mut s.meta,
            IrSchema::Enum(s) => &mut s.meta,
            IrSchema::Primitive(s) => &mut s.meta,
            IrSchema::Array(s) => &mut s.meta,
            IrSchema::Map(s) => &mut s.meta,
            IrSchema::Reference(s) => &mut s.meta,
            IrSchema::Unknown(s) => &mut s.meta,
        }
    }

    /// The declared name, for variants that carry one.
    pub fn name(&self) -> Option<&NameAndWireValue> {
        match self {
            IrSchema::Object(s) => s.name.as_ref(),
            IrSchema::Union(s) => s.name.as_ref(),
            IrSchema::Enum(s) => s.name.as_ref(),
            _ => None,
        }
    }

    pub fn set_name(&mut self, name: NameAndWireValue) {
        match self {
            IrSchema::Object(s) => s.name = Some(name),
            IrSchema::Union(s) => s.name = Some(name),
            IrSchema::Enum(s) => s.name = Some(name),
            _ => {}
        }
    }

    /// Structural equality, ignoring descriptions, names and the
    /// `optional` flag.
    pub fn same_shape(&self, other: &IrSchema) -> bool {
        self.without_docs() == other.without_docs()
    }

    fn without_docs(&self) -> IrSchema {
        let mut schema = self.clone();
        schema.strip_docs();
        schema
    }

    fn strip_docs(&mut self) {
        let meta = self.meta_mut();
        meta.description = None;
        meta.optional = false;
        match self {
            IrSchema::Object(o) => {
                o.name = None;
                for property in &mut o.properties {
                    property.schema.strip_docs();
                }
                o.all_of_property_conflicts.clear();
            }
            IrSchema::Union(u) => {
                u.name = None;
                for property in &mut u.base_properties {
                    property.schema.strip_docs();
                }
                for variant in &mut u.variants {
                    variant.schema.strip_docs();
                }
            }
            IrSchema::Enum(e) => {
                e.name = None;
                for value in &mut e.values {
                    value.description = None;
                }
            }
            IrSchema::Array(a) => a.items.strip_docs(),
            IrSchema::Map(m) => m.value.strip_docs(),
            IrSchema::Primitive(_) | IrSchema::Reference(_) | IrSchema::Unknown(_) => {}
        }
    }
}

/// An object schema with ordered properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrObjectSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<NameAndWireValue>,
    #[serde(flatten)]
    pub meta: SchemaMeta,
    pub properties: Vec<IrObjectProperty>,
    /// Ids of the component schemas this object extends through `allOf`.
    pub extends: Vec<String>,
    pub all_of_property_conflicts: Vec<IrAllOfPropertyConflict>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub additional_properties: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrObjectProperty {
    /// Wire key.
    pub key: String,
    pub name: NameAndWireValue,
    pub schema: IrSchema,
    pub required: bool,
}

/// Two `allOf` members declared the same key with different shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrAllOfPropertyConflict {
    pub property_key: String,
    pub existing: IrSchema,
    pub conflicting: IrSchema,
}

/// A `oneOf`/`anyOf` union. `discriminant` is set for discriminated unions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrUnionSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<NameAndWireValue>,
    #[serde(flatten)]
    pub meta: SchemaMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminant: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub base_properties: Vec<IrObjectProperty>,
    pub variants: Vec<IrUnionVariant>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrUnionVariant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminant_value: Option<NameAndWireValue>,
    pub schema: IrSchema,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrEnumSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<NameAndWireValue>,
    #[serde(flatten)]
    pub meta: SchemaMeta,
    pub values: Vec<IrEnumValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrEnumValue {
    pub name: NameAndWireValue,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrPrimitiveSchema {
    #[serde(flatten)]
    pub meta: SchemaMeta,
    pub value: IrPrimitiveType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum IrPrimitiveType {
    String(StringConstraints),
    Int(NumberConstraints),
    Int64(NumberConstraints),
    Float(NumberConstraints),
    Double(NumberConstraints),
    Boolean,
    Date,
    DateTime,
    Base64,
    Binary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrArraySchema {
    #[serde(flatten)]
    pub meta: SchemaMeta,
    pub items: Box<IrSchema>,
}

/// `map<string, value>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrMapSchema {
    #[serde(flatten)]
    pub meta: SchemaMeta,
    pub value: Box<IrSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrReferenceSchema {
    #[serde(flatten)]
    pub meta: SchemaMeta,
    pub schema_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IrUnknownSchema {
    #[serde(flatten)]
    pub meta: SchemaMeta,
}
