use std::collections::BTreeMap;

use serde_json::Value;

use crate::config::ContentConflictPolicy;
use crate::error::ParseError;
use crate::parse::document::OpenApiDocument;

use super::content_conflicts::eliminate_content_conflicts;

/// `$ref` pointer → number of places it occurs.
pub type ReferenceOccurrences = BTreeMap<String, usize>;

/// Count `$ref` pointers in a JSON tree. An object with a string `$ref` is
/// counted and not descended into.
pub fn count_reference_occurrences(tree: &Value) -> ReferenceOccurrences {
    let mut occurrences = ReferenceOccurrences::new();
    count_into(tree, &mut occurrences);
    occurrences
}

fn count_into(node: &Value, occurrences: &mut ReferenceOccurrences) {
    match node {
        Value::Array(items) => {
            for item in items {
                count_into(item, occurrences);
            }
        }
        Value::Object(map) => {
            if let Some(Value::String(pointer)) = map.get("$ref") {
                *occurrences.entry(pointer.clone()).or_default() += 1;
                return;
            }
            for value in map.values() {
                count_into(value, occurrences);
            }
        }
        _ => {}
    }
}

/// Count references in `document` after JSON/multipart conflicts have been
/// eliminated, so discarded representations do not contribute.
pub fn get_reference_occurrences(
    document: &OpenApiDocument,
    policy: ContentConflictPolicy,
) -> Result<ReferenceOccurrences, ParseError> {
    let resolved = eliminate_content_conflicts(document, policy).document;
    let tree = serde_json::to_value(&resolved)?;
    Ok(count_reference_occurrences(&tree))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ref_is_leaf() {
        let tree = json!({
            "a": {"$ref": "#/x", "properties": {"b": {"$ref": "#/y"}}},
            "list": [{"$ref": "#/x"}, {"nested": {"$ref": "#/x"}}],
            "notRef": {"$ref": 3}
        });
        let counts = count_reference_occurrences(&tree);
        assert_eq!(counts.get("#/x"), Some(&3));
        assert_eq!(counts.get("#/y"), None);
        assert_eq!(counts.len(), 1);
    }

    #[test]
    fn test_scalars() {
        assert!(count_reference_occurrences(&json!("#/x")).is_empty());
        assert!(count_reference_occurrences(&Value::Null).is_empty());
    }
}
