use std::collections::{BTreeSet, HashMap};

use crate::config::ConvertOptions;
use crate::error::ResolveError;
use crate::ir::{ConversionError, ConversionErrorKind};
use crate::parse::document::OpenApiDocument;
use crate::parse::parameter::{Parameter, ParameterOrRef};
use crate::parse::request_body::{RequestBody, RequestBodyOrRef};
use crate::parse::response::{Response, ResponseOrRef};
use crate::parse::schema::SchemaOrRef;

use super::discriminants::{DiscriminatedUnionReference, collect_discriminated_unions};

const SCHEMA_POINTER_PREFIX: &str = "#/components/schemas/";

/// Pointer to a component schema.
pub fn schema_pointer(id: &str) -> String {
    let escaped = id.replace('~', "~0").replace('/', "~1");
    format!("{SCHEMA_POINTER_PREFIX}{escaped}")
}

/// Parse a `$ref` path like `#/components/schemas/Foo` and extract the
/// (unescaped) name.
pub fn parse_ref_name(ref_path: &str, expected_section: &str) -> Result<String, ResolveError> {
    let stripped = ref_path
        .strip_prefix("#/components/")
        .ok_or_else(|| ResolveError::InvalidReference(ref_path.to_string()))?;
    let (section, name) = stripped
        .split_once('/')
        .ok_or_else(|| ResolveError::InvalidReference(ref_path.to_string()))?;
    if section != expected_section || name.is_empty() || name.contains('/') {
        return Err(ResolveError::InvalidReference(ref_path.to_string()));
    }
    Ok(name.replace("~1", "/").replace("~0", "~"))
}

/// Outcome of looking up a schema `$ref`.
#[derive(Debug)]
pub enum SchemaLookup<'a> {
    Found { id: String, schema: &'a SchemaOrRef },
    /// Well-formed pointer into `components.schemas` with no target.
    Missing { id: String },
    /// Pointer outside `components.schemas` (external files, nested paths).
    Unsupported,
}

/// State threaded through one document conversion.
pub struct ParserContext<'a> {
    pub document: &'a OpenApiDocument,
    pub options: &'a ConvertOptions,
    auth_headers: BTreeSet<String>,
    discriminated_unions: HashMap<String, DiscriminatedUnionReference>,
    errors: Vec<ConversionError>,
    non_request_referenced: BTreeSet<String>,
    resolution_path: Vec<String>,
    in_request: bool,
}

impl<'a> ParserContext<'a> {
    pub fn new(
        document: &'a OpenApiDocument,
        options: &'a ConvertOptions,
        auth_headers: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            document,
            options,
            auth_headers: auth_headers
                .into_iter()
                .map(|h| h.to_ascii_lowercase())
                .collect(),
            discriminated_unions: collect_discriminated_unions(document),
            errors: Vec::new(),
            non_request_referenced: BTreeSet::new(),
            resolution_path: Vec::new(),
            in_request: false,
        }
    }

    /// Record a recoverable problem.
    pub fn record(
        &mut self,
        kind: ConversionErrorKind,
        breadcrumbs: &[String],
        message: impl Into<String>,
    ) {
        let error = ConversionError {
            kind,
            breadcrumbs: breadcrumbs.to_vec(),
            message: message.into(),
        };
        log::debug!("{error}");
        self.errors.push(error);
    }

    pub fn errors(&self) -> &[ConversionError] {
        &self.errors
    }

    pub fn is_auth_header(&self, name: &str) -> bool {
        self.auth_headers.contains(&name.to_ascii_lowercase())
    }

    pub fn discriminated_union(&self, pointer: &str) -> Option<&DiscriminatedUnionReference> {
        self.discriminated_unions.get(pointer)
    }

    pub fn discriminated_unions(&self) -> &HashMap<String, DiscriminatedUnionReference> {
        &self.discriminated_unions
    }

    /// Note a schema referenced from outside a request body.
    pub fn mark_referenced(&mut self, id: &str) {
        if !self.in_request {
            self.non_request_referenced.insert(id.to_string());
        }
    }

    /// Run `f` with references treated as request-only.
    pub fn in_request_scope<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let previous = std::mem::replace(&mut self.in_request, true);
        let out = f(self);
        self.in_request = previous;
        out
    }

    pub fn lookup_schema(&self, ref_path: &str) -> SchemaLookup<'a> {
        let Ok(id) = parse_ref_name(ref_path, "schemas") else {
            return SchemaLookup::Unsupported;
        };
        let document: &'a OpenApiDocument = self.document;
        match document
            .components
            .as_ref()
            .and_then(|c| c.schemas.get(&id))
        {
            Some(schema) => SchemaLookup::Found { id, schema },
            None => SchemaLookup::Missing { id },
        }
    }

    pub fn lookup_parameter(&self, ref_path: &str) -> Option<&'a Parameter> {
        let document: &'a OpenApiDocument = self.document;
        let mut current = ref_path;
        for _ in 0..self.options.max_reference_depth {
            let name = parse_ref_name(current, "parameters").ok()?;
            match document.components.as_ref()?.parameters.get(&name)? {
                ParameterOrRef::Parameter(param) => return Some(param),
                ParameterOrRef::Ref { ref_path } => current = ref_path,
                ParameterOrRef::Invalid(_) => return None,
            }
        }
        None
    }

    pub fn lookup_request_body(&self, ref_path: &str) -> Option<&'a RequestBody> {
        let document: &'a OpenApiDocument = self.document;
        let mut current = ref_path;
        for _ in 0..self.options.max_reference_depth {
            let name = parse_ref_name(current, "requestBodies").ok()?;
            match document.components.as_ref()?.request_bodies.get(&name)? {
                RequestBodyOrRef::RequestBody(body) => return Some(body),
                RequestBodyOrRef::Ref { ref_path } => current = ref_path,
                RequestBodyOrRef::Invalid(_) => return None,
            }
        }
        None
    }

    pub fn lookup_response(&self, ref_path: &str) -> Option<&'a Response> {
        let document: &'a OpenApiDocument = self.document;
        let mut current = ref_path;
        for _ in 0..self.options.max_reference_depth {
            let name = parse_ref_name(current, "responses").ok()?;
            match document.components.as_ref()?.responses.get(&name)? {
                ResponseOrRef::Response(response) => return Some(response),
                ResponseOrRef::Ref { ref_path } => current = ref_path,
                ResponseOrRef::Invalid(_) => return None,
            }
        }
        None
    }

    /// Push `pointer` onto the in-progress resolution path. Fails if it is
    /// already being resolved or the path is at its depth limit.
    pub fn enter_reference(&mut self, pointer: &str) -> Result<(), ResolveError> {
        if self.resolution_path.iter().any(|p| p == pointer) {
            let mut chain = self.resolution_path.clone();
            chain.push(pointer.to_string());
            return Err(ResolveError::CircularReference {
                pointer: pointer.to_string(),
                chain: chain.join(" -> "),
            });
        }
        if self.resolution_path.len() >= self.options.max_reference_depth {
            return Err(ResolveError::ReferenceDepthExceeded {
                pointer: pointer.to_string(),
                depth: self.options.max_reference_depth,
            });
        }
        self.resolution_path.push(pointer.to_string());
        Ok(())
    }

    pub fn exit_reference(&mut self) {
        self.resolution_path.pop();
    }

    /// Consume the context, returning recorded errors and the sorted set of
    /// non-request-referenced schema ids.
    pub fn into_parts(self) -> (Vec<ConversionError>, Vec<String>) {
        (
            self.errors,
            self.non_request_referenced.into_iter().collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn doc() -> OpenApiDocument {
        parse::from_yaml(
            r#"
openapi: 3.1.0
info: {title: t}
components:
  schemas:
    Pet: {type: object}
    a/b: {type: string}
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_ref_name() {
        assert_eq!(
            parse_ref_name("#/components/schemas/Pet", "schemas").unwrap(),
            "Pet"
        );
        assert_eq!(
            parse_ref_name("#/components/schemas/a~1b", "schemas").unwrap(),
            "a/b"
        );
        assert!(parse_ref_name("#/components/parameters/Pet", "schemas").is_err());
        assert!(parse_ref_name("other.yaml#/Pet", "schemas").is_err());
    }

    #[test]
    fn test_schema_pointer_escapes() {
        assert_eq!(schema_pointer("a/b"), "#/components/schemas/a~1b");
    }

    #[test]
    fn test_lookup_schema() {
        let document = doc();
        let options = ConvertOptions::default();
        let ctx = ParserContext::new(&document, &options, []);
        assert!(matches!(
            ctx.lookup_schema("#/components/schemas/Pet"),
            SchemaLookup::Found { ref id, .. } if id == "Pet"
        ));
        assert!(matches!(
            ctx.lookup_schema("#/components/schemas/a~1b"),
            SchemaLookup::Found { .. }
        ));
        assert!(matches!(
            ctx.lookup_schema("#/components/schemas/Missing"),
            SchemaLookup::Missing { .. }
        ));
        assert!(matches!(
            ctx.lookup_schema("common.yaml#/Pet"),
            SchemaLookup::Unsupported
        ));
    }

    #[test]
    fn test_cycle_guard() {
        let document = doc();
        let options = ConvertOptions::default();
        let mut ctx = ParserContext::new(&document, &options, []);
        ctx.enter_reference("#/components/schemas/A").unwrap();
        ctx.enter_reference("#/components/schemas/B").unwrap();
        let err = ctx.enter_reference("#/components/schemas/A").unwrap_err();
        assert!(matches!(err, ResolveError::CircularReference { .. }));
        ctx.exit_reference();
        ctx.exit_reference();
        assert!(ctx.enter_reference("#/components/schemas/A").is_ok());
    }

    #[test]
    fn test_depth_limit() {
        let document = doc();
        let options = ConvertOptions {
            max_reference_depth: 2,
            ..ConvertOptions::default()
        };
        let mut ctx = ParserContext::new(&document, &options, []);
        ctx.enter_reference("#/a").unwrap();
        ctx.enter_reference("#/b").unwrap();
        assert!(matches!(
            ctx.enter_reference("#/c"),
            Err(ResolveError::ReferenceDepthExceeded { depth: 2, .. })
        ));
    }

    #[test]
    fn test_request_scope_skips_referenced() {
        let document = doc();
        let options = ConvertOptions::default();
        let mut ctx = ParserContext::new(&document, &options, ["Authorization".to_string()]);
        ctx.in_request_scope(|ctx| ctx.mark_referenced("Upload"));
        ctx.mark_referenced("Pet");
        assert!(ctx.is_auth_header("authorization"));
        let (errors, referenced) = ctx.into_parts();
        assert!(errors.is_empty());
        assert_eq!(referenced, vec!["Pet"]);
    }
}
