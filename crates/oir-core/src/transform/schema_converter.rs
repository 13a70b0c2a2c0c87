use std::collections::{BTreeSet, HashSet};

use serde_json::Value;

use crate::error::ConvertError;
use crate::ir::{
    ConversionErrorKind, IrAllOfPropertyConflict, IrArraySchema, IrEnumSchema, IrEnumValue,
    IrMapSchema, IrObjectProperty, IrObjectSchema, IrPrimitiveSchema, IrPrimitiveType, IrSchema,
    IrUnionSchema, IrUnionVariant, NameAndWireValue, NumberConstraints, SchemaMeta,
    StringConstraints,
};
use crate::parse::schema::{
    AdditionalProperties, Discriminator, Schema, SchemaOrRef, SchemaType, TypeSet,
};

use super::context::{ParserContext, SchemaLookup, parse_ref_name, schema_pointer};
use super::discriminants::mapping_target;
use super::extensions;
use super::name_normalizer::derive_name_variants;

/// Extend a breadcrumb path.
pub(crate) fn crumbs(parent: &[String], keys: &[&str]) -> Vec<String> {
    let mut path = parent.to_vec();
    path.extend(keys.iter().map(|k| k.to_string()));
    path
}

/// Convert a schema node. `is_required = false` marks the result optional.
pub fn convert_schema(
    schema: &SchemaOrRef,
    is_required: bool,
    ctx: &mut ParserContext<'_>,
    breadcrumbs: &[String],
) -> Result<IrSchema, ConvertError> {
    let mut converted = match schema {
        SchemaOrRef::Ref { ref_path } => convert_reference(ref_path, ctx, breadcrumbs),
        SchemaOrRef::Schema(inline) => convert_inline(inline, ctx, breadcrumbs)?,
        SchemaOrRef::Invalid(value) => {
            ctx.record(
                ConversionErrorKind::MalformedNode,
                breadcrumbs,
                format!("expected a schema object, found {}", value_kind(value)),
            );
            IrSchema::unknown(SchemaMeta::default())
        }
    };
    if !is_required {
        converted.meta_mut().optional = true;
    }
    Ok(converted)
}

/// Convert a component schema and attach its name
/// (`x-fern-type-name` > `title` > id).
pub fn convert_named_schema(
    id: &str,
    schema: &SchemaOrRef,
    ctx: &mut ParserContext<'_>,
) -> Result<IrSchema, ConvertError> {
    let breadcrumbs = vec![id.to_string()];
    ctx.enter_reference(&schema_pointer(id))?;
    let result = convert_schema(schema, true, ctx, &breadcrumbs);
    ctx.exit_reference();
    let mut converted = result?;

    let raw_name = schema
        .as_schema()
        .and_then(|s| {
            extensions::string(&s.extensions, extensions::TYPE_NAME)
                .map(str::to_string)
                .or_else(|| s.title.clone())
        })
        .unwrap_or_else(|| id.to_string());
    match derive_name_variants(&raw_name, None) {
        Ok(name) => converted.set_name(name),
        Err(e) => ctx.record(ConversionErrorKind::InvalidIdentifier, &breadcrumbs, e.to_string()),
    }
    Ok(converted)
}

/// Follow `$ref`s to an inline schema without reporting anything. Used
/// where only the shape of a schema matters (multipart field detection).
pub fn dereference<'a>(schema: &'a SchemaOrRef, ctx: &ParserContext<'a>) -> Option<&'a Schema> {
    let mut current = schema;
    for _ in 0..ctx.options.max_reference_depth {
        match current {
            SchemaOrRef::Schema(inline) => return Some(inline),
            SchemaOrRef::Ref { ref_path } => match ctx.lookup_schema(ref_path) {
                SchemaLookup::Found { schema, .. } => current = schema,
                _ => return None,
            },
            SchemaOrRef::Invalid(_) => return None,
        }
    }
    None
}

fn convert_reference(ref_path: &str, ctx: &mut ParserContext<'_>, breadcrumbs: &[String]) -> IrSchema {
    match ctx.lookup_schema(ref_path) {
        SchemaLookup::Found { id, .. } => {
            ctx.mark_referenced(&id);
            IrSchema::reference(id)
        }
        SchemaLookup::Missing { id } => {
            ctx.record(
                ConversionErrorKind::DanglingReference,
                breadcrumbs,
                format!("reference {ref_path} points at missing schema {id}"),
            );
            IrSchema::unknown(SchemaMeta::default())
        }
        SchemaLookup::Unsupported => {
            ctx.record(
                ConversionErrorKind::UnsupportedReference,
                breadcrumbs,
                format!("reference {ref_path} does not point into components.schemas"),
            );
            IrSchema::unknown(SchemaMeta::default())
        }
    }
}

fn convert_inline(
    schema: &Schema,
    ctx: &mut ParserContext<'_>,
    breadcrumbs: &[String],
) -> Result<IrSchema, ConvertError> {
    extensions::check_unknown(&schema.extensions, ctx, breadcrumbs);
    let meta = SchemaMeta {
        description: schema.description.clone(),
        nullable: schema.nullable == Some(true) || schema.type_includes_null(),
        optional: false,
    };

    if !schema.all_of.is_empty() {
        return convert_all_of(schema, meta, ctx, breadcrumbs);
    }
    if !schema.one_of.is_empty() || !schema.any_of.is_empty() {
        return convert_union(schema, meta, ctx, breadcrumbs);
    }
    if !schema.enum_values.is_empty() {
        return Ok(convert_enum(schema, &schema.enum_values, meta, ctx, breadcrumbs));
    }
    if let Some(value @ Value::String(_)) = &schema.const_value {
        return Ok(convert_enum(
            schema,
            std::slice::from_ref(value),
            meta,
            ctx,
            breadcrumbs,
        ));
    }
    convert_by_type(schema, meta, ctx, breadcrumbs)
}

fn convert_by_type(
    schema: &Schema,
    meta: SchemaMeta,
    ctx: &mut ParserContext<'_>,
    breadcrumbs: &[String],
) -> Result<IrSchema, ConvertError> {
    match &schema.schema_type {
        Some(TypeSet::Single(t)) => convert_typed(schema, *t, meta, ctx, breadcrumbs),
        Some(TypeSet::Multiple(types)) => {
            let non_null: Vec<SchemaType> = types
                .iter()
                .copied()
                .filter(|t| *t != SchemaType::Null)
                .collect();
            match non_null.as_slice() {
                [] => Ok(IrSchema::unknown(meta)),
                [single] => convert_typed(schema, *single, meta, ctx, breadcrumbs),
                many => {
                    let mut variants = Vec::with_capacity(many.len());
                    for t in many {
                        let variant =
                            convert_typed(schema, *t, SchemaMeta::default(), ctx, breadcrumbs)?;
                        variants.push(IrUnionVariant {
                            discriminant_value: None,
                            schema: variant,
                        });
                    }
                    Ok(IrSchema::Union(IrUnionSchema {
                        name: None,
                        meta,
                        discriminant: None,
                        base_properties: Vec::new(),
                        variants,
                    }))
                }
            }
        }
        None if schema.is_object_like() => convert_object(schema, meta, ctx, breadcrumbs),
        None if schema.items.is_some() => {
            convert_typed(schema, SchemaType::Array, meta, ctx, breadcrumbs)
        }
        None => Ok(IrSchema::unknown(meta)),
    }
}

fn convert_typed(
    schema: &Schema,
    schema_type: SchemaType,
    mut meta: SchemaMeta,
    ctx: &mut ParserContext<'_>,
    breadcrumbs: &[String],
) -> Result<IrSchema, ConvertError> {
    let numbers = || NumberConstraints {
        minimum: schema.minimum,
        maximum: schema.maximum,
    };
    let primitive = match schema_type {
        SchemaType::String => match schema.format.as_deref() {
            Some("date-time") => IrPrimitiveType::DateTime,
            Some("date") => IrPrimitiveType::Date,
            Some("byte") => IrPrimitiveType::Base64,
            Some("binary") => IrPrimitiveType::Binary,
            _ => IrPrimitiveType::String(StringConstraints {
                format: schema.format.clone(),
                pattern: schema.pattern.clone(),
                min_length: schema.min_length,
                max_length: schema.max_length,
            }),
        },
        SchemaType::Integer => match schema.format.as_deref() {
            Some("int64") => IrPrimitiveType::Int64(numbers()),
            _ => IrPrimitiveType::Int(numbers()),
        },
        SchemaType::Number => match schema.format.as_deref() {
            Some("float") => IrPrimitiveType::Float(numbers()),
            _ => IrPrimitiveType::Double(numbers()),
        },
        SchemaType::Boolean => IrPrimitiveType::Boolean,
        SchemaType::Array => {
            let items = match &schema.items {
                Some(items) => convert_schema(items, true, ctx, &crumbs(breadcrumbs, &["items"]))?,
                None => IrSchema::unknown(SchemaMeta::default()),
            };
            return Ok(IrSchema::Array(IrArraySchema {
                meta,
                items: Box::new(items),
            }));
        }
        SchemaType::Object => return convert_object(schema, meta, ctx, breadcrumbs),
        SchemaType::Null => {
            meta.nullable = true;
            return Ok(IrSchema::unknown(meta));
        }
        SchemaType::Unsupported => {
            ctx.record(
                ConversionErrorKind::MalformedNode,
                breadcrumbs,
                "unsupported schema type",
            );
            return Ok(IrSchema::unknown(meta));
        }
    };
    Ok(IrSchema::Primitive(IrPrimitiveSchema {
        meta,
        value: primitive,
    }))
}

fn convert_object(
    schema: &Schema,
    meta: SchemaMeta,
    ctx: &mut ParserContext<'_>,
    breadcrumbs: &[String],
) -> Result<IrSchema, ConvertError> {
    if schema.properties.is_empty() {
        let value = match &schema.additional_properties {
            Some(AdditionalProperties::Bool(false)) => {
                return Ok(IrSchema::Object(IrObjectSchema {
                    name: None,
                    meta,
                    properties: Vec::new(),
                    extends: Vec::new(),
                    all_of_property_conflicts: Vec::new(),
                    additional_properties: false,
                }));
            }
            Some(AdditionalProperties::Schema(value)) => convert_schema(
                value,
                true,
                ctx,
                &crumbs(breadcrumbs, &["additionalProperties"]),
            )?,
            Some(AdditionalProperties::Bool(true)) | None => {
                IrSchema::unknown(SchemaMeta::default())
            }
        };
        return Ok(IrSchema::Map(IrMapSchema {
            meta,
            value: Box::new(value),
        }));
    }

    Ok(IrSchema::Object(IrObjectSchema {
        name: None,
        meta,
        properties: convert_properties(schema, None, ctx, breadcrumbs)?,
        extends: Vec::new(),
        all_of_property_conflicts: Vec::new(),
        additional_properties: allows_additional(schema),
    }))
}

fn allows_additional(schema: &Schema) -> bool {
    matches!(
        schema.additional_properties,
        Some(AdditionalProperties::Bool(true)) | Some(AdditionalProperties::Schema(_))
    )
}

/// Convert `properties` in declaration order, skipping `exclude`.
fn convert_properties(
    schema: &Schema,
    exclude: Option<&str>,
    ctx: &mut ParserContext<'_>,
    breadcrumbs: &[String],
) -> Result<Vec<IrObjectProperty>, ConvertError> {
    let mut properties = Vec::with_capacity(schema.properties.len());
    for (key, property) in &schema.properties {
        if exclude == Some(key.as_str()) {
            continue;
        }
        let path = crumbs(breadcrumbs, &[key.as_str()]);
        let Some(name) = property_name(key, property, ctx, &path) else {
            continue;
        };
        let required = schema.required.contains(key);
        properties.push(IrObjectProperty {
            key: key.clone(),
            name,
            schema: convert_schema(property, required, ctx, &path)?,
            required,
        });
    }
    Ok(properties)
}

fn property_name(
    key: &str,
    property: &SchemaOrRef,
    ctx: &mut ParserContext<'_>,
    breadcrumbs: &[String],
) -> Option<NameAndWireValue> {
    let raw = property
        .as_schema()
        .and_then(|s| extensions::string(&s.extensions, extensions::PROPERTY_NAME))
        .unwrap_or(key);
    match derive_name_variants(raw, Some(key)) {
        Ok(name) => Some(name),
        Err(_) => {
            ctx.record(
                ConversionErrorKind::InvalidIdentifier,
                breadcrumbs,
                "property key is empty",
            );
            None
        }
    }
}

fn convert_all_of(
    schema: &Schema,
    meta: SchemaMeta,
    ctx: &mut ParserContext<'_>,
    breadcrumbs: &[String],
) -> Result<IrSchema, ConvertError> {
    if schema.properties.is_empty()
        && let Some(index) = sole_shaped_member(&schema.all_of)
    {
        let mut description = meta.description;
        let mut nullable = meta.nullable;
        for annotation in schema
            .all_of
            .iter()
            .filter_map(SchemaOrRef::as_schema)
            .filter(|s| s.is_annotation_only())
        {
            if description.is_none() {
                description = annotation.description.clone();
            }
            nullable |= annotation.nullable == Some(true) || annotation.is_null_only();
        }

        let position = index.to_string();
        let member = &schema.all_of[index];
        let path = crumbs(breadcrumbs, &["allOf", position.as_str()]);
        let mut inner = convert_schema(member, true, ctx, &path)?;
        let inner_meta = inner.meta_mut();
        if description.is_some() {
            inner_meta.description = description;
        }
        inner_meta.nullable |= nullable;
        return Ok(inner);
    }

    let mut merger = AllOfMerger::default();
    for (i, member) in schema.all_of.iter().enumerate() {
        let index = i.to_string();
        merger.absorb(member, true, ctx, &crumbs(breadcrumbs, &["allOf", index.as_str()]))?;
    }
    merger.absorb_properties(schema, ctx, breadcrumbs)?;
    Ok(merger.finish(meta))
}

/// The member an `allOf` reduces to: its only member, or the only one that
/// is more than annotations.
fn sole_shaped_member(members: &[SchemaOrRef]) -> Option<usize> {
    if members.len() == 1 {
        return Some(0);
    }
    let mut shaped = members
        .iter()
        .enumerate()
        .filter(|(_, m)| !m.as_schema().is_some_and(Schema::is_annotation_only))
        .map(|(i, _)| i);
    match (shaped.next(), shaped.next()) {
        (Some(index), None) => Some(index),
        _ => None,
    }
}

/// What an `allOf` member declares besides object structure, if anything.
fn non_object_shape(schema: &Schema) -> Option<&'static str> {
    if !schema.enum_values.is_empty() || schema.const_value.is_some() {
        return Some("an enum");
    }
    if !schema.one_of.is_empty() || !schema.any_of.is_empty() {
        return Some("a union");
    }
    if schema.items.is_some() {
        return Some("an array");
    }
    let types: &[SchemaType] = match &schema.schema_type {
        Some(TypeSet::Single(t)) => std::slice::from_ref(t),
        Some(TypeSet::Multiple(types)) => types,
        None => &[],
    };
    match types
        .iter()
        .find(|t| !matches!(t, SchemaType::Object | SchemaType::Null))
    {
        Some(SchemaType::Array) => Some("an array"),
        Some(_) => Some("a primitive"),
        None => None,
    }
}

/// Flattens `allOf` members into a single object.
#[derive(Default)]
struct AllOfMerger {
    properties: Vec<IrObjectProperty>,
    required: BTreeSet<String>,
    extends: Vec<String>,
    conflicts: Vec<IrAllOfPropertyConflict>,
    additional_properties: bool,
}

impl AllOfMerger {
    fn absorb(
        &mut self,
        member: &SchemaOrRef,
        direct: bool,
        ctx: &mut ParserContext<'_>,
        breadcrumbs: &[String],
    ) -> Result<(), ConvertError> {
        match member {
            SchemaOrRef::Ref { ref_path } => match ctx.lookup_schema(ref_path) {
                SchemaLookup::Found { id, schema } => {
                    ctx.mark_referenced(&id);
                    if direct && !self.extends.contains(&id) {
                        self.extends.push(id.clone());
                    }
                    ctx.enter_reference(&schema_pointer(&id))?;
                    let result = self.absorb(schema, false, ctx, breadcrumbs);
                    ctx.exit_reference();
                    result
                }
                SchemaLookup::Missing { id } => {
                    ctx.record(
                        ConversionErrorKind::DanglingReference,
                        breadcrumbs,
                        format!("allOf member {ref_path} points at missing schema {id}"),
                    );
                    Ok(())
                }
                SchemaLookup::Unsupported => {
                    ctx.record(
                        ConversionErrorKind::UnsupportedReference,
                        breadcrumbs,
                        format!("allOf member {ref_path} does not point into components.schemas"),
                    );
                    Ok(())
                }
            },
            SchemaOrRef::Schema(inline) => {
                if let Some(shape) = non_object_shape(inline) {
                    ctx.record(
                        ConversionErrorKind::MalformedNode,
                        breadcrumbs,
                        format!("allOf member is {shape}; only its object properties are merged"),
                    );
                }
                for (i, nested) in inline.all_of.iter().enumerate() {
                    let index = i.to_string();
                    self.absorb(nested, false, ctx, &crumbs(breadcrumbs, &["allOf", index.as_str()]))?;
                }
                self.absorb_properties(inline, ctx, breadcrumbs)
            }
            SchemaOrRef::Invalid(value) => {
                ctx.record(
                    ConversionErrorKind::MalformedNode,
                    breadcrumbs,
                    format!("allOf member is {}, not a schema", value_kind(value)),
                );
                Ok(())
            }
        }
    }

    fn absorb_properties(
        &mut self,
        schema: &Schema,
        ctx: &mut ParserContext<'_>,
        breadcrumbs: &[String],
    ) -> Result<(), ConvertError> {
        self.required.extend(schema.required.iter().cloned());
        self.additional_properties |= allows_additional(schema);

        for (key, property) in &schema.properties {
            let path = crumbs(breadcrumbs, &[key.as_str()]);
            let Some(name) = property_name(key, property, ctx, &path) else {
                continue;
            };
            let converted = convert_schema(property, true, ctx, &path)?;
            match self.properties.iter().find(|p| &p.key == key) {
                Some(existing) if existing.schema.same_shape(&converted) => {}
                Some(existing) => self.conflicts.push(IrAllOfPropertyConflict {
                    property_key: key.clone(),
                    existing: existing.schema.clone(),
                    conflicting: converted,
                }),
                None => self.properties.push(IrObjectProperty {
                    key: key.clone(),
                    name,
                    schema: converted,
                    required: false,
                }),
            }
        }
        Ok(())
    }

    /// Required flags are only known once every member has been seen.
    fn finish(mut self, meta: SchemaMeta) -> IrSchema {
        for property in &mut self.properties {
            property.required = self.required.contains(&property.key);
            property.schema.meta_mut().optional = !property.required;
        }
        IrSchema::Object(IrObjectSchema {
            name: None,
            meta,
            properties: self.properties,
            extends: self.extends,
            all_of_property_conflicts: self.conflicts,
            additional_properties: self.additional_properties,
        })
    }
}

fn convert_union(
    schema: &Schema,
    mut meta: SchemaMeta,
    ctx: &mut ParserContext<'_>,
    breadcrumbs: &[String],
) -> Result<IrSchema, ConvertError> {
    let (keyword, members) = if schema.one_of.is_empty() {
        ("anyOf", &schema.any_of)
    } else {
        ("oneOf", &schema.one_of)
    };

    if let Some(discriminator) = &schema.discriminator {
        return convert_discriminated_union(
            schema,
            discriminator,
            keyword,
            members,
            meta,
            ctx,
            breadcrumbs,
        );
    }

    meta.nullable |= members.iter().any(SchemaOrRef::is_null_type);
    let non_null: Vec<(usize, &SchemaOrRef)> = members
        .iter()
        .enumerate()
        .filter(|(_, m)| !m.is_null_type())
        .collect();

    if let [(i, only)] = non_null.as_slice()
        && schema.properties.is_empty()
    {
        let index = i.to_string();
        let mut inner = convert_schema(only, true, ctx, &crumbs(breadcrumbs, &[keyword, index.as_str()]))?;
        let inner_meta = inner.meta_mut();
        if meta.description.is_some() {
            inner_meta.description = meta.description;
        }
        inner_meta.nullable |= meta.nullable;
        return Ok(inner);
    }

    let mut variants = Vec::with_capacity(non_null.len());
    for (i, member) in non_null {
        let index = i.to_string();
        variants.push(IrUnionVariant {
            discriminant_value: None,
            schema: convert_schema(member, true, ctx, &crumbs(breadcrumbs, &[keyword, index.as_str()]))?,
        });
    }
    Ok(IrSchema::Union(IrUnionSchema {
        name: None,
        meta,
        discriminant: None,
        base_properties: convert_properties(schema, None, ctx, breadcrumbs)?,
        variants,
    }))
}

fn convert_discriminated_union(
    schema: &Schema,
    discriminator: &Discriminator,
    keyword: &str,
    members: &[SchemaOrRef],
    meta: SchemaMeta,
    ctx: &mut ParserContext<'_>,
    breadcrumbs: &[String],
) -> Result<IrSchema, ConvertError> {
    let property = discriminator.property_name.as_str();
    let mapping: Vec<(&String, String)> = discriminator
        .mapping
        .iter()
        .map(|(value, target)| (value, mapping_target(target)))
        .collect();

    let mut covered: HashSet<String> = HashSet::new();
    let mut variants = Vec::with_capacity(members.len());
    for (i, member) in members.iter().enumerate() {
        let index = i.to_string();
        let path = crumbs(breadcrumbs, &[keyword, index.as_str()]);
        let value = match member {
            SchemaOrRef::Ref { ref_path } => {
                covered.insert(ref_path.clone());
                mapping
                    .iter()
                    .find(|(_, target)| target == ref_path)
                    .map(|(value, _)| value.to_string())
                    .or_else(|| parse_ref_name(ref_path, "schemas").ok())
            }
            SchemaOrRef::Schema(inline) => inline
                .title
                .clone()
                .or_else(|| discriminant_literal(inline, property)),
            SchemaOrRef::Invalid(_) => None,
        };
        let Some(value) = value else {
            ctx.record(
                ConversionErrorKind::MissingDiscriminantValue,
                &path,
                format!("union member has no value for discriminant {property}"),
            );
            continue;
        };
        let Some(name) = discriminant_name(&value, ctx, &path) else {
            continue;
        };
        variants.push(IrUnionVariant {
            discriminant_value: Some(name),
            schema: convert_schema(member, true, ctx, &path)?,
        });
    }

    for (value, target) in &mapping {
        if !covered.insert(target.clone()) {
            continue;
        }
        let path = crumbs(breadcrumbs, &["discriminator", "mapping", value.as_str()]);
        let Some(name) = discriminant_name(value, ctx, &path) else {
            continue;
        };
        variants.push(IrUnionVariant {
            discriminant_value: Some(name),
            schema: convert_reference(target, ctx, &path),
        });
    }

    Ok(IrSchema::Union(IrUnionSchema {
        name: None,
        meta,
        discriminant: Some(property.to_string()),
        base_properties: convert_properties(schema, Some(property), ctx, breadcrumbs)?,
        variants,
    }))
}

fn discriminant_name(
    value: &str,
    ctx: &mut ParserContext<'_>,
    breadcrumbs: &[String],
) -> Option<NameAndWireValue> {
    match derive_name_variants(value, None) {
        Ok(name) => Some(name),
        Err(_) => {
            ctx.record(
                ConversionErrorKind::InvalidIdentifier,
                breadcrumbs,
                "discriminant value is empty",
            );
            None
        }
    }
}

/// A `const` or single-valued `enum` on the discriminant property.
fn discriminant_literal(schema: &Schema, property: &str) -> Option<String> {
    let target = schema.properties.get(property)?.as_schema()?;
    if let Some(Value::String(value)) = &target.const_value {
        return Some(value.clone());
    }
    match target.enum_values.as_slice() {
        [Value::String(value)] => Some(value.clone()),
        _ => None,
    }
}

fn convert_enum(
    schema: &Schema,
    values: &[Value],
    mut meta: SchemaMeta,
    ctx: &mut ParserContext<'_>,
    breadcrumbs: &[String],
) -> IrSchema {
    let overrides = extensions::enum_overrides(&schema.extensions, ctx, breadcrumbs);
    let mut seen: HashSet<String> = HashSet::new();
    let mut members = Vec::with_capacity(values.len());

    for value in values {
        let wire = match value {
            Value::Null => {
                meta.nullable = true;
                continue;
            }
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => {
                ctx.record(
                    ConversionErrorKind::MalformedNode,
                    breadcrumbs,
                    format!("enum value is {}", value_kind(other)),
                );
                continue;
            }
        };
        let override_ = overrides.get(&wire);
        let raw = override_
            .and_then(|o| o.name.as_deref())
            .unwrap_or(&wire);
        let name = match derive_name_variants(raw, Some(&wire)) {
            Ok(name) => name,
            Err(_) => {
                ctx.record(
                    ConversionErrorKind::InvalidIdentifier,
                    breadcrumbs,
                    "enum value is empty",
                );
                continue;
            }
        };
        if !seen.insert(name.screaming_snake_case.clone()) {
            ctx.record(
                ConversionErrorKind::DuplicateEnumValue,
                breadcrumbs,
                format!(
                    "enum value {wire:?} collides with an earlier value as {}",
                    name.screaming_snake_case
                ),
            );
            continue;
        }
        members.push(IrEnumValue {
            name,
            value: wire,
            description: override_.and_then(|o| o.description.clone()),
        });
    }

    IrSchema::Enum(IrEnumSchema {
        name: None,
        meta,
        values: members,
    })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConvertOptions;
    use crate::error::ResolveError;
    use crate::parse::{self, document::OpenApiDocument};

    fn doc(components: &str) -> OpenApiDocument {
        let yaml = format!("openapi: 3.1.0\ninfo: {{title: t}}\ncomponents:\n  schemas:\n{components}");
        parse::from_yaml(&yaml).unwrap()
    }

    fn convert(document: &OpenApiDocument, id: &str) -> (IrSchema, Vec<ConversionErrorKind>) {
        let options = ConvertOptions::default();
        let mut ctx = ParserContext::new(document, &options, []);
        let schema = &document.components.as_ref().unwrap().schemas[id];
        let converted = convert_named_schema(id, schema, &mut ctx).unwrap();
        let kinds = ctx.errors().iter().map(|e| e.kind).collect();
        (converted, kinds)
    }

    #[test]
    fn test_object_properties_and_optional() {
        let document = doc(r#"
    Pet:
      type: object
      required: [id]
      properties:
        id: {type: integer, format: int64}
        display_name:
          type: string
          x-fern-property-name: label
"#);
        let (schema, errors) = convert(&document, "Pet");
        assert!(errors.is_empty());
        let IrSchema::Object(object) = schema else {
            panic!("expected object");
        };
        assert_eq!(object.name.unwrap().pascal_case, "Pet");
        assert_eq!(object.properties.len(), 2);
        assert!(object.properties[0].required);
        assert!(matches!(
            &object.properties[0].schema,
            IrSchema::Primitive(IrPrimitiveSchema { value: IrPrimitiveType::Int64(_), .. })
        ));
        let label = &object.properties[1];
        assert!(!label.required);
        assert!(label.schema.meta().optional);
        assert_eq!(label.name.camel_case, "label");
        assert_eq!(label.name.wire_value, "display_name");
    }

    #[test]
    fn test_dangling_reference() {
        let document = doc(r#"
    Owner:
      type: object
      properties:
        pet: {$ref: '#/components/schemas/Missing'}
"#);
        let (schema, errors) = convert(&document, "Owner");
        assert_eq!(errors, vec![ConversionErrorKind::DanglingReference]);
        let IrSchema::Object(object) = schema else {
            panic!("expected object");
        };
        assert!(matches!(object.properties[0].schema, IrSchema::Unknown(_)));
    }

    #[test]
    fn test_all_of_conflict_keeps_first() {
        let document = doc(r#"
    Base:
      type: object
      required: [id]
      properties:
        id: {type: string}
        size: {type: integer}
    Derived:
      allOf:
        - $ref: '#/components/schemas/Base'
        - type: object
          required: [size]
          properties:
            id: {type: string, description: same shape}
            size: {type: string}
            extra: {type: boolean}
"#);
        let (schema, errors) = convert(&document, "Derived");
        assert!(errors.is_empty());
        let IrSchema::Object(object) = schema else {
            panic!("expected object");
        };
        assert_eq!(object.extends, vec!["Base"]);
        let keys: Vec<_> = object.properties.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["id", "size", "extra"]);
        assert!(object.properties[0].required);
        assert!(object.properties[1].required);
        assert!(!object.properties[2].required);
        assert_eq!(object.all_of_property_conflicts.len(), 1);
        let conflict = &object.all_of_property_conflicts[0];
        assert_eq!(conflict.property_key, "size");
        assert!(matches!(
            conflict.existing,
            IrSchema::Primitive(IrPrimitiveSchema { value: IrPrimitiveType::Int(_), .. })
        ));
    }

    #[test]
    fn test_all_of_cycle_is_fatal() {
        let document = doc(r#"
    A:
      allOf:
        - $ref: '#/components/schemas/B'
        - type: object
          properties:
            a: {type: string}
    B:
      allOf:
        - $ref: '#/components/schemas/A'
        - type: object
          properties:
            b: {type: string}
"#);
        let options = ConvertOptions::default();
        let mut ctx = ParserContext::new(&document, &options, []);
        let schema = &document.components.as_ref().unwrap().schemas["A"];
        let err = convert_named_schema("A", schema, &mut ctx).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Resolve(ResolveError::CircularReference { .. })
        ));
    }

    #[test]
    fn test_all_of_with_annotations_reduces_to_member() {
        let document = doc(r#"
    Status:
      type: string
      enum: [open, closed]
    Wrapped:
      allOf:
        - $ref: '#/components/schemas/Status'
        - description: the status
        - nullable: true
"#);
        let (wrapped, kinds) = convert(&document, "Wrapped");
        assert!(kinds.is_empty(), "unexpected errors: {kinds:?}");
        let IrSchema::Reference(reference) = &wrapped else {
            panic!("expected a reference, got {wrapped:?}");
        };
        assert_eq!(reference.schema_id, "Status");
        assert_eq!(reference.meta.description.as_deref(), Some("the status"));
        assert!(reference.meta.nullable);
    }

    #[test]
    fn test_all_of_non_object_member_is_reported() {
        let document = doc(r#"
    Status:
      type: string
      enum: [open, closed]
    Tagged:
      allOf:
        - $ref: '#/components/schemas/Status'
        - type: object
          properties:
            label: {type: string}
"#);
        let (tagged, kinds) = convert(&document, "Tagged");
        assert_eq!(kinds, vec![ConversionErrorKind::MalformedNode]);
        let IrSchema::Object(object) = &tagged else {
            panic!("expected an object");
        };
        assert_eq!(object.extends, vec!["Status"]);
        assert_eq!(object.properties.len(), 1);
    }

    #[test]
    fn test_discriminated_union_values() {
        let document = doc(r#"
    Pet:
      oneOf:
        - $ref: '#/components/schemas/Cat'
        - $ref: '#/components/schemas/Dog'
        - type: object
          properties:
            petType: {const: lizard}
        - type: object
      discriminator:
        propertyName: petType
        mapping:
          kitty: '#/components/schemas/Cat'
          bird: Bird
    Cat: {type: object}
    Dog: {type: object}
    Bird: {type: object}
"#);
        let (schema, errors) = convert(&document, "Pet");
        assert_eq!(errors, vec![ConversionErrorKind::MissingDiscriminantValue]);
        let IrSchema::Union(union) = schema else {
            panic!("expected union");
        };
        assert_eq!(union.discriminant.as_deref(), Some("petType"));
        let values: Vec<_> = union
            .variants
            .iter()
            .map(|v| v.discriminant_value.as_ref().unwrap().wire_value.as_str())
            .collect();
        assert_eq!(values, vec!["kitty", "Dog", "lizard", "bird"]);
        assert_eq!(union.variants[3].schema, IrSchema::reference("Bird"));
    }

    #[test]
    fn test_nullable_one_of_collapses() {
        let document = doc(r#"
    MaybeName:
      description: optional name
      oneOf:
        - type: string
        - type: 'null'
"#);
        let (schema, _) = convert(&document, "MaybeName");
        assert!(matches!(schema, IrSchema::Primitive(_)));
        assert!(schema.meta().nullable);
        assert_eq!(schema.meta().description.as_deref(), Some("optional name"));
    }

    #[test]
    fn test_enum_duplicates_and_overrides() {
        let document = doc(r#"
    Status:
      type: string
      enum: [active, ACTIVE, in-review, '', null]
      x-fern-enum:
        in-review:
          name: Reviewing
          description: Waiting on a reviewer
"#);
        let (schema, errors) = convert(&document, "Status");
        assert_eq!(
            errors,
            vec![
                ConversionErrorKind::DuplicateEnumValue,
                ConversionErrorKind::InvalidIdentifier
            ]
        );
        let IrSchema::Enum(e) = schema else {
            panic!("expected enum");
        };
        assert!(e.meta.nullable);
        assert_eq!(e.values.len(), 2);
        assert_eq!(e.values[1].name.pascal_case, "Reviewing");
        assert_eq!(e.values[1].name.wire_value, "in-review");
        assert_eq!(
            e.values[1].description.as_deref(),
            Some("Waiting on a reviewer")
        );
    }

    #[test]
    fn test_maps_and_arrays() {
        let document = doc(r#"
    Labels:
      type: object
      additionalProperties: {type: string}
    Anything: {type: object}
    Closed:
      type: object
      additionalProperties: false
    Tags:
      type: array
      items: {type: string, format: date-time}
"#);
        assert!(matches!(convert(&document, "Labels").0, IrSchema::Map(_)));
        let IrSchema::Map(anything) = convert(&document, "Anything").0 else {
            panic!("expected map");
        };
        assert!(matches!(*anything.value, IrSchema::Unknown(_)));
        let IrSchema::Object(closed) = convert(&document, "Closed").0 else {
            panic!("expected object");
        };
        assert!(closed.properties.is_empty());
        let IrSchema::Array(tags) = convert(&document, "Tags").0 else {
            panic!("expected array");
        };
        assert!(matches!(
            *tags.items,
            IrSchema::Primitive(IrPrimitiveSchema { value: IrPrimitiveType::DateTime, .. })
        ));
    }

    #[test]
    fn test_unknown_extension_and_malformed_type() {
        let document = doc(r#"
    Weird:
      type: tuple
      x-fern-made-up: 1
"#);
        let (schema, errors) = convert(&document, "Weird");
        assert!(matches!(schema, IrSchema::Unknown(_)));
        assert_eq!(
            errors,
            vec![
                ConversionErrorKind::UnknownExtension,
                ConversionErrorKind::MalformedNode
            ]
        );
    }

    #[test]
    fn test_type_name_extension() {
        let document = doc(r#"
    pet_v2:
      title: Pet Two
      type: object
      x-fern-type-name: PetV2
      properties:
        id: {type: string}
"#);
        let (schema, _) = convert(&document, "pet_v2");
        assert_eq!(schema.name().unwrap().original_value, "PetV2");
    }
}
