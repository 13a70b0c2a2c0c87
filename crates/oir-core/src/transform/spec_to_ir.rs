use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::config::ConvertOptions;
use crate::error::ConvertError;
use crate::ir::{
    ConversionErrorKind, HttpMethod, IrEndpoint, IrOpenApiFile, IrSecurityScheme, IrServer, IrTag,
};
use crate::parse::document::OpenApiDocument;
use crate::parse::security::SecuritySchemeOrInvalid;

use super::content_conflicts::eliminate_content_conflicts;
use super::context::ParserContext;
use super::discriminants::strip_discriminants;
use super::extensions;
use super::path_converter::{convert_path_item, convert_webhook_item, normalize_path};
use super::schema_converter::convert_named_schema;
use super::security_converter::{convert_security_scheme, reserved_auth_headers};

/// Convert a parsed OpenAPI document into the IR with default options.
pub fn generate_ir(document: &OpenApiDocument) -> Result<IrOpenApiFile, ConvertError> {
    generate_ir_with_options(document, &ConvertOptions::default())
}

/// Convert with explicit options.
///
/// Fails only on problems that leave no sensible IR to return: a missing
/// `info.title`, a reference cycle through composition, or a request body
/// that still carries both JSON and multipart content. Everything else is
/// recorded in [`IrOpenApiFile::errors`].
pub fn generate_ir_with_options(
    document: &OpenApiDocument,
    options: &ConvertOptions,
) -> Result<IrOpenApiFile, ConvertError> {
    let info = document.info.as_ref().ok_or(ConvertError::MissingInfo)?;
    let title = info.title.clone().ok_or(ConvertError::MissingTitle)?;

    // Phase 1: security schemes and the headers they reserve
    let mut security_schemes: IndexMap<String, IrSecurityScheme> = IndexMap::new();
    let mut unsupported_schemes = Vec::new();
    let mut malformed_schemes = Vec::new();
    if let Some(components) = &document.components {
        for (id, scheme) in &components.security_schemes {
            let SecuritySchemeOrInvalid::Scheme(scheme) = scheme else {
                malformed_schemes.push(id.clone());
                continue;
            };
            match convert_security_scheme(scheme) {
                Some(converted) => {
                    security_schemes.insert(id.clone(), converted);
                }
                None => unsupported_schemes.push(id.clone()),
            }
        }
    }
    let auth_headers = reserved_auth_headers(security_schemes.values());

    // Phase 2: elect one of JSON / multipart wherever a body declares both
    let resolution = eliminate_content_conflicts(document, options.content_conflict_policy);
    let resolved = &resolution.document;
    let mut ctx = ParserContext::new(resolved, options, auth_headers);

    for id in unsupported_schemes {
        ctx.record(
            ConversionErrorKind::UnsupportedSecurityScheme,
            &["securitySchemes".to_string(), id.clone()],
            format!("security scheme {id} is not supported and was skipped"),
        );
    }
    for id in malformed_schemes {
        ctx.record(
            ConversionErrorKind::MalformedNode,
            &["securitySchemes".to_string(), id.clone()],
            format!("security scheme {id} is not a valid security scheme object"),
        );
    }
    for conflict in resolution.conflicts.iter().filter(|c| c.diverged) {
        ctx.record(
            ConversionErrorKind::ContentConflict,
            &[conflict.location.clone()],
            format!(
                "kept {} and discarded {}, whose schema differs",
                conflict.kept, conflict.discarded
            ),
        );
    }

    // Phase 3: endpoints and webhooks declared under `paths`
    let mut endpoints = Vec::new();
    let mut webhooks = Vec::new();
    let mut seen: BTreeSet<(HttpMethod, String)> = BTreeSet::new();
    for (path, item) in &resolved.paths {
        let Some(item) = item else {
            continue;
        };
        log::debug!("Converting path {path}");
        let converted = convert_path_item(path, item, document, &mut ctx)?;
        for endpoint in converted.endpoints {
            if seen.insert((endpoint.method, endpoint.path.clone())) {
                endpoints.push(endpoint);
            } else {
                ctx.record(
                    ConversionErrorKind::DuplicateEndpoint,
                    &[
                        normalize_path(path).to_string(),
                        endpoint.method.as_str().to_ascii_lowercase(),
                    ],
                    format!(
                        "{} {} is declared more than once; keeping the first",
                        endpoint.method.as_str(),
                        endpoint.path
                    ),
                );
            }
        }
        webhooks.extend(converted.webhooks);
    }

    // Phase 4: the top-level `webhooks` section
    for (name, item) in &resolved.webhooks {
        let Some(item) = item else {
            continue;
        };
        log::debug!("Converting webhook {name}");
        webhooks.extend(convert_webhook_item(name, item, &mut ctx)?);
    }

    // Phase 5: component schemas
    let mut schemas = IndexMap::new();
    if let Some(components) = &resolved.components {
        for (id, schema) in &components.schemas {
            log::debug!("Converting schema {id}");
            schemas.insert(id.clone(), convert_named_schema(id, schema, &mut ctx)?);
        }
    }
    let schemas = strip_discriminants(schemas, ctx.discriminated_unions());
    let variables = extensions::variable_definitions(resolved, &mut ctx);

    // Phase 6: assembly
    let servers = collect_servers(resolved, &mut ctx);
    let tags = collect_tags(resolved, &endpoints, &mut ctx);
    let has_endpoints_marked_internal = endpoints.iter().any(|e| e.internal);
    let (errors, non_request_referenced_schemas) = ctx.into_parts();

    Ok(IrOpenApiFile {
        title,
        description: info.description.clone(),
        servers,
        tags,
        endpoints,
        webhooks,
        schemas,
        security_schemes,
        has_endpoints_marked_internal,
        errors,
        non_request_referenced_schemas,
        dependencies: Vec::new(),
        variables,
    })
}

fn collect_servers(document: &OpenApiDocument, ctx: &mut ParserContext<'_>) -> Vec<IrServer> {
    let mut servers = Vec::with_capacity(document.servers.len());
    for (i, server) in document.servers.iter().enumerate() {
        let Some(url) = &server.url else {
            ctx.record(
                ConversionErrorKind::MalformedNode,
                &["servers".to_string(), i.to_string()],
                "server has no url",
            );
            continue;
        };
        servers.push(IrServer {
            url: url.clone(),
            description: server.description.clone(),
            name: extensions::string(&server.extensions, extensions::SERVER_NAME)
                .map(str::to_string),
        });
    }
    servers
}

/// Declared tags first, in document order, then any tag an endpoint uses
/// without declaring it.
fn collect_tags(
    document: &OpenApiDocument,
    endpoints: &[IrEndpoint],
    ctx: &mut ParserContext<'_>,
) -> IndexMap<String, IrTag> {
    let mut tags: IndexMap<String, IrTag> = IndexMap::new();
    for (i, tag) in document.tags.iter().enumerate() {
        let Some(name) = &tag.name else {
            ctx.record(
                ConversionErrorKind::MalformedNode,
                &["tags".to_string(), i.to_string()],
                "tag has no name",
            );
            continue;
        };
        tags.insert(
            name.clone(),
            IrTag {
                id: name.clone(),
                description: tag.description.clone(),
            },
        );
    }
    for tag in endpoints.iter().flat_map(|e| &e.tags) {
        tags.entry(tag.clone()).or_insert_with(|| IrTag {
            id: tag.clone(),
            description: None,
        });
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{IrRequest, IrSchema};
    use crate::parse;

    fn kinds(ir: &IrOpenApiFile) -> Vec<ConversionErrorKind> {
        ir.errors.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_missing_info_and_title() {
        let no_info = parse::from_yaml("openapi: 3.1.0\n").unwrap();
        assert!(matches!(generate_ir(&no_info), Err(ConvertError::MissingInfo)));
        let no_title = parse::from_yaml("openapi: 3.1.0\ninfo: {version: '1'}\n").unwrap();
        assert!(matches!(generate_ir(&no_title), Err(ConvertError::MissingTitle)));
    }

    #[test]
    fn test_security_and_reserved_headers() {
        let document = parse::from_yaml(
            r#"
openapi: 3.1.0
info: {title: Secure}
security:
  - apiKey: []
paths:
  /items:
    get:
      parameters:
        - {name: X-API-Key, in: header, schema: {type: string}}
        - {name: X-Request-Id, in: header, schema: {type: string}}
components:
  securitySchemes:
    apiKey: {type: apiKey, in: header, name: x-api-key}
    queryKey: {type: apiKey, in: query, name: key}
"#,
        )
        .unwrap();
        let ir = generate_ir(&document).unwrap();
        assert_eq!(
            ir.security_schemes.keys().collect::<Vec<_>>(),
            vec!["apiKey"]
        );
        assert_eq!(kinds(&ir), vec![ConversionErrorKind::UnsupportedSecurityScheme]);
        let endpoint = &ir.endpoints[0];
        assert!(endpoint.authed);
        assert_eq!(endpoint.headers.len(), 1);
        assert_eq!(endpoint.headers[0].name.wire_value, "X-Request-Id");
    }

    #[test]
    fn test_header_name_override_still_reserves_declared_header() {
        let document = parse::from_yaml(
            r#"
openapi: 3.1.0
info: {title: Keys}
security:
  - apiKey: []
paths:
  /items:
    get:
      parameters:
        - {name: X-API-Key, in: header, schema: {type: string}}
components:
  securitySchemes:
    apiKey:
      type: apiKey
      in: header
      name: X-API-Key
      x-fern-header: {name: apiKey}
"#,
        )
        .unwrap();
        let ir = generate_ir(&document).unwrap();
        assert!(ir.errors.is_empty());
        assert_eq!(ir.security_schemes["apiKey"].header_name(), "X-API-Key");
        assert!(ir.endpoints[0].headers.is_empty());
    }

    #[test]
    fn test_duplicate_endpoint_after_normalization() {
        let document = parse::from_yaml(
            r#"
openapi: 3.1.0
info: {title: Users}
paths:
  /users:
    get: {operationId: listUsers}
  /users/:
    get: {operationId: listUsersAgain}
"#,
        )
        .unwrap();
        let ir = generate_ir(&document).unwrap();
        assert_eq!(ir.endpoints.len(), 1);
        assert_eq!(ir.endpoints[0].name.camel_case, "listUsers");
        assert_eq!(kinds(&ir), vec![ConversionErrorKind::DuplicateEndpoint]);
    }

    #[test]
    fn test_diverged_conflict_is_reported() {
        let document = parse::from_yaml(
            r#"
openapi: 3.1.0
info: {title: Uploads}
paths:
  /files:
    post:
      requestBody:
        content:
          application/json:
            schema: {type: object, properties: {url: {type: string}}}
          multipart/form-data:
            schema: {type: object, properties: {file: {type: string, format: binary}}}
"#,
        )
        .unwrap();
        let ir = generate_ir(&document).unwrap();
        assert_eq!(kinds(&ir), vec![ConversionErrorKind::ContentConflict]);
        assert!(matches!(
            ir.endpoints[0].request,
            Some(IrRequest::Multipart { .. })
        ));
    }

    #[test]
    fn test_assembly() {
        let document = parse::from_yaml(
            r#"
openapi: 3.1.0
info: {title: Pets, description: Pet store}
servers:
  - {url: 'https://api.example.com', x-fern-server-name: Production}
tags:
  - {name: pets, description: Pet operations}
x-fern-sdk-variables:
  tenant: {type: string}
paths:
  /pets:
    get:
      tags: [pets, admin]
      x-internal: true
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema: {type: array, items: {$ref: '#/components/schemas/Pet'}}
webhooks:
  petAdopted:
    post:
      requestBody:
        content:
          application/json:
            schema: {$ref: '#/components/schemas/Pet'}
components:
  schemas:
    Pet:
      type: object
      title: PetRecord
      properties:
        name: {type: string}
"#,
        )
        .unwrap();
        let ir = generate_ir(&document).unwrap();
        assert!(ir.errors.is_empty());
        assert_eq!(ir.description.as_deref(), Some("Pet store"));
        assert_eq!(ir.servers[0].name.as_deref(), Some("Production"));
        assert_eq!(ir.tags.keys().collect::<Vec<_>>(), vec!["pets", "admin"]);
        assert!(ir.has_endpoints_marked_internal);
        assert_eq!(ir.webhooks.len(), 1);
        assert_eq!(ir.webhooks[0].path, "petAdopted");
        assert_eq!(ir.non_request_referenced_schemas, vec!["Pet"]);
        assert!(ir.variables.contains_key("tenant"));
        let IrSchema::Object(pet) = &ir.schemas["Pet"] else {
            panic!("expected object");
        };
        assert_eq!(
            pet.name.as_ref().map(|n| n.pascal_case.as_str()),
            Some("PetRecord")
        );
    }
}
