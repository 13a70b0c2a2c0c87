use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;

use crate::ir::IrSchema;
use crate::parse::document::OpenApiDocument;
use crate::parse::schema::{Schema, SchemaOrRef};

use super::context::schema_pointer;

/// The discriminant keys of every discriminated union a schema belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscriminatedUnionReference {
    pub discriminants: BTreeSet<String>,
}

/// Normalize a discriminator mapping value. Values may be full pointers or
/// bare schema names.
pub fn mapping_target(value: &str) -> String {
    if value.starts_with('#') || value.contains('/') || value.contains('.') {
        value.to_string()
    } else {
        schema_pointer(value)
    }
}

/// Walk every schema in the document once and record, per member pointer,
/// the discriminant keys of the unions it participates in.
pub fn collect_discriminated_unions(
    document: &OpenApiDocument,
) -> HashMap<String, DiscriminatedUnionReference> {
    let mut unions: HashMap<String, DiscriminatedUnionReference> = HashMap::new();
    document.visit_schemas(&mut |schema: &Schema| {
        let Some(discriminator) = &schema.discriminator else {
            return;
        };
        let members = schema.one_of.iter().chain(&schema.any_of);
        let member_refs = members.filter_map(|m| match m {
            SchemaOrRef::Ref { ref_path } => Some(ref_path.clone()),
            _ => None,
        });
        let mapped = discriminator.mapping.values().map(|v| mapping_target(v));
        for pointer in member_refs.chain(mapped) {
            unions
                .entry(pointer)
                .or_default()
                .discriminants
                .insert(discriminator.property_name.clone());
        }
    });
    unions
}

/// Remove discriminant keys from the properties of objects that are members
/// of a discriminated union.
pub fn strip_discriminants(
    schemas: IndexMap<String, IrSchema>,
    unions: &HashMap<String, DiscriminatedUnionReference>,
) -> IndexMap<String, IrSchema> {
    schemas
        .into_iter()
        .map(|(id, schema)| match schema {
            IrSchema::Object(mut object) => {
                if let Some(union) = unions.get(&schema_pointer(&id)) {
                    object
                        .properties
                        .retain(|p| !union.discriminants.contains(&p.key));
                    object
                        .all_of_property_conflicts
                        .retain(|c| !union.discriminants.contains(&c.property_key));
                }
                (id, IrSchema::Object(object))
            }
            other => (id, other),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn test_collects_members_and_mapping() {
        let document = parse::from_yaml(
            r#"
openapi: 3.1.0
info: {title: t}
components:
  schemas:
    Pet:
      oneOf:
        - $ref: '#/components/schemas/Cat'
      discriminator:
        propertyName: petType
        mapping:
          dog: Dog
    Shape:
      anyOf:
        - $ref: '#/components/schemas/Cat'
      discriminator:
        propertyName: kind
    Cat: {type: object}
    Dog: {type: object}
"#,
        )
        .unwrap();
        let unions = collect_discriminated_unions(&document);
        let cat = &unions["#/components/schemas/Cat"];
        assert_eq!(
            cat.discriminants.iter().collect::<Vec<_>>(),
            vec!["kind", "petType"]
        );
        assert!(unions.contains_key("#/components/schemas/Dog"));
        assert!(!unions.contains_key("#/components/schemas/Pet"));
    }

    #[test]
    fn test_mapping_target() {
        assert_eq!(mapping_target("Dog"), "#/components/schemas/Dog");
        assert_eq!(
            mapping_target("#/components/schemas/Dog"),
            "#/components/schemas/Dog"
        );
    }
}
