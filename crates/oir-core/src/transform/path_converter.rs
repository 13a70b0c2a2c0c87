use indexmap::IndexMap;

use crate::error::ConvertError;
use crate::ir::{
    ConversionErrorKind, HttpMethod, IrEndpoint, IrErrorResponse, IrMultipartProperty,
    IrMultipartPropertyKind, IrParameter, IrRequest, IrResponse, IrSchema, IrWebhook,
    NameAndWireValue, SchemaMeta,
};
use crate::parse::document::OpenApiDocument;
use crate::parse::media_type::MediaType;
use crate::parse::operation::{Operation, PathItem};
use crate::parse::parameter::{Parameter, ParameterLocation, ParameterOrRef};
use crate::parse::request_body::{RequestBody, RequestBodyOrRef};
use crate::parse::response::{Response, ResponseOrRef};
use crate::parse::schema::{Schema, SchemaType, TypeSet};

use super::content_conflicts::ContentKind;
use super::context::ParserContext;
use super::extensions;
use super::name_normalizer::{derive_name_variants, error_name_for_status, route_to_name};
use super::schema_converter::{convert_schema, crumbs, dereference};

/// Everything one path item converts into.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvertedPathItem {
    pub endpoints: Vec<IrEndpoint>,
    pub webhooks: Vec<IrWebhook>,
}

/// Drop one trailing slash, keeping the root path intact.
pub fn normalize_path(path: &str) -> &str {
    match path.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => path,
    }
}

/// Convert every operation on a path item into an endpoint, or a webhook
/// when it carries `x-fern-webhook: true`.
pub fn convert_path_item<'a>(
    path: &str,
    item: &'a PathItem,
    document: &OpenApiDocument,
    ctx: &mut ParserContext<'a>,
) -> Result<ConvertedPathItem, ConvertError> {
    let path = normalize_path(path);
    let mut converted = ConvertedPathItem::default();
    extensions::check_unknown(&item.extensions, ctx, &[path.to_string()]);

    for (method, operation) in item.operations() {
        let breadcrumbs = vec![path.to_string(), method.as_str().to_ascii_lowercase()];
        if extensions::flag(&operation.extensions, extensions::IGNORE) {
            log::debug!("Skipping ignored operation {} {path}", method.as_str());
            continue;
        }
        extensions::check_unknown(&operation.extensions, ctx, &breadcrumbs);
        let parameters =
            convert_parameters(&item.parameters, &operation.parameters, ctx, &breadcrumbs)?;

        if extensions::flag(&operation.extensions, extensions::WEBHOOK) {
            if let Some(webhook) =
                convert_webhook(path, method, operation, parameters.headers, ctx, &breadcrumbs)?
            {
                converted.webhooks.push(webhook);
            }
            continue;
        }

        converted.endpoints.push(convert_endpoint(
            path,
            method,
            operation,
            parameters,
            document,
            ctx,
            &breadcrumbs,
        )?);
    }
    Ok(converted)
}

/// Convert an entry of the top-level `webhooks` section. Every operation on
/// it is a webhook; the entry name stands in for the path.
pub fn convert_webhook_item<'a>(
    name: &str,
    item: &'a PathItem,
    ctx: &mut ParserContext<'a>,
) -> Result<Vec<IrWebhook>, ConvertError> {
    let mut webhooks = Vec::new();
    for (method, operation) in item.operations() {
        let breadcrumbs = vec![
            "webhooks".to_string(),
            name.to_string(),
            method.as_str().to_ascii_lowercase(),
        ];
        if extensions::flag(&operation.extensions, extensions::IGNORE) {
            continue;
        }
        extensions::check_unknown(&operation.extensions, ctx, &breadcrumbs);
        let parameters =
            convert_parameters(&item.parameters, &operation.parameters, ctx, &breadcrumbs)?;
        if let Some(webhook) =
            convert_webhook(name, method, operation, parameters.headers, ctx, &breadcrumbs)?
        {
            webhooks.push(webhook);
        }
    }
    Ok(webhooks)
}

fn convert_endpoint<'a>(
    path: &str,
    method: HttpMethod,
    operation: &'a Operation,
    parameters: ConvertedParameters,
    document: &OpenApiDocument,
    ctx: &mut ParserContext<'a>,
    breadcrumbs: &[String],
) -> Result<IrEndpoint, ConvertError> {
    let request = convert_request(operation.request_body.as_ref(), ctx, breadcrumbs)?;
    let (response, error_responses) = convert_responses(&operation.responses, ctx, breadcrumbs)?;

    let security = operation
        .security
        .as_ref()
        .or(document.security.as_ref())
        .cloned()
        .unwrap_or_default();

    Ok(IrEndpoint {
        method,
        path: path.to_string(),
        operation_id: operation.operation_id.clone(),
        name: operation_name(path, method, operation),
        sdk_group_name: extensions::string_list(&operation.extensions, extensions::SDK_GROUP_NAME),
        summary: operation.summary.clone(),
        description: operation.description.clone(),
        tags: operation.tags.clone(),
        audiences: extensions::string_list(&operation.extensions, extensions::AUDIENCES),
        path_parameters: parameters.path,
        query_parameters: parameters.query,
        headers: parameters.headers,
        request,
        response,
        error_responses,
        authed: security.iter().any(|requirement| !requirement.is_empty()),
        security,
        internal: extensions::flag(&operation.extensions, extensions::INTERNAL),
        deprecated: operation.deprecated == Some(true),
    })
}

fn convert_webhook<'a>(
    path: &str,
    method: HttpMethod,
    operation: &'a Operation,
    headers: Vec<IrParameter>,
    ctx: &mut ParserContext<'a>,
    breadcrumbs: &[String],
) -> Result<Option<IrWebhook>, ConvertError> {
    let body = operation
        .request_body
        .as_ref()
        .and_then(|body| resolve_request_body(body, ctx, breadcrumbs));
    let payload = body.and_then(|body| {
        body.content
            .iter()
            .find(|(content_type, _)| ContentKind::of(content_type) == ContentKind::Json)
    });
    let Some((_, media)) = payload else {
        ctx.record(
            ConversionErrorKind::MalformedNode,
            breadcrumbs,
            "webhook has no JSON payload",
        );
        return Ok(None);
    };

    let payload = match &media.schema {
        Some(schema) => convert_schema(schema, true, ctx, &crumbs(breadcrumbs, &["requestBody"]))?,
        None => IrSchema::unknown(SchemaMeta::default()),
    };
    Ok(Some(IrWebhook {
        method,
        path: path.to_string(),
        operation_id: operation.operation_id.clone(),
        name: operation_name(path, method, operation),
        summary: operation.summary.clone(),
        description: operation.description.clone(),
        tags: operation.tags.clone(),
        headers,
        payload,
    }))
}

/// `x-fern-sdk-method-name` > `operationId` > a name derived from the route.
fn operation_name(path: &str, method: HttpMethod, operation: &Operation) -> NameAndWireValue {
    let route_name = route_to_name(method.as_str(), path);
    let explicit = extensions::string(&operation.extensions, extensions::SDK_METHOD_NAME)
        .or(operation.operation_id.as_deref())
        .and_then(|raw| derive_name_variants(raw, None).ok());
    match explicit {
        Some(name) => name,
        None => derive_name_variants(&route_name, None).unwrap_or_else(|_| NameAndWireValue {
            original_value: route_name.clone(),
            wire_value: route_name.clone(),
            camel_case: route_name.clone(),
            pascal_case: route_name.clone(),
            snake_case: route_name.clone(),
            screaming_snake_case: route_name,
        }),
    }
}

#[derive(Debug, Default)]
struct ConvertedParameters {
    path: Vec<IrParameter>,
    query: Vec<IrParameter>,
    headers: Vec<IrParameter>,
}

fn convert_parameters<'a>(
    path_level: &'a [ParameterOrRef],
    operation_level: &'a [ParameterOrRef],
    ctx: &mut ParserContext<'a>,
    breadcrumbs: &[String],
) -> Result<ConvertedParameters, ConvertError> {
    // Operation-level parameters replace path-level ones with the same name
    // and location.
    let mut merged: IndexMap<(String, ParameterLocation), &'a Parameter> = IndexMap::new();
    for parameter in path_level.iter().chain(operation_level) {
        let resolved = match parameter {
            ParameterOrRef::Parameter(p) => p,
            ParameterOrRef::Ref { ref_path } => match ctx.lookup_parameter(ref_path) {
                Some(p) => p,
                None => {
                    ctx.record(
                        ConversionErrorKind::DanglingReference,
                        breadcrumbs,
                        format!("parameter reference {ref_path} does not resolve"),
                    );
                    continue;
                }
            },
            ParameterOrRef::Invalid(_) => {
                ctx.record(
                    ConversionErrorKind::MalformedNode,
                    breadcrumbs,
                    "parameter is missing `name` or `in`",
                );
                continue;
            }
        };
        merged.insert((resolved.name.clone(), resolved.location), resolved);
    }

    let mut converted = ConvertedParameters::default();
    for ((_, location), parameter) in merged {
        let target = match location {
            ParameterLocation::Cookie => continue,
            ParameterLocation::Header if ctx.is_auth_header(&parameter.name) => continue,
            ParameterLocation::Header => &mut converted.headers,
            ParameterLocation::Query => &mut converted.query,
            ParameterLocation::Path => &mut converted.path,
        };
        let path = crumbs(breadcrumbs, &["parameters", parameter.name.as_str()]);
        let raw = extensions::string(&parameter.extensions, extensions::PARAMETER_NAME)
            .unwrap_or(&parameter.name);
        let name = match derive_name_variants(raw, Some(&parameter.name)) {
            Ok(name) => name,
            Err(_) => {
                ctx.record(
                    ConversionErrorKind::InvalidIdentifier,
                    &path,
                    "parameter name is empty",
                );
                continue;
            }
        };
        let required = parameter.required || location == ParameterLocation::Path;
        let schema = match &parameter.schema {
            Some(schema) => convert_schema(schema, required, ctx, &path)?,
            None => IrSchema::unknown(SchemaMeta {
                optional: !required,
                ..SchemaMeta::default()
            }),
        };
        let variable_reference = match location {
            ParameterLocation::Path => {
                extensions::string(&parameter.extensions, extensions::SDK_VARIABLE)
                    .map(str::to_string)
            }
            _ => None,
        };
        target.push(IrParameter {
            name,
            schema,
            required,
            description: parameter.description.clone(),
            variable_reference,
        });
    }
    Ok(converted)
}

fn resolve_request_body<'b>(
    body: &'b RequestBodyOrRef,
    ctx: &mut ParserContext<'b>,
    breadcrumbs: &[String],
) -> Option<&'b RequestBody> {
    match body {
        RequestBodyOrRef::RequestBody(body) => Some(body),
        RequestBodyOrRef::Ref { ref_path } => {
            let resolved = ctx.lookup_request_body(ref_path);
            if resolved.is_none() {
                ctx.record(
                    ConversionErrorKind::DanglingReference,
                    breadcrumbs,
                    format!("request body reference {ref_path} does not resolve"),
                );
            }
            resolved
        }
        RequestBodyOrRef::Invalid(_) => {
            ctx.record(
                ConversionErrorKind::MalformedNode,
                breadcrumbs,
                "requestBody is not a request body object",
            );
            None
        }
    }
}

fn convert_request<'a>(
    body: Option<&'a RequestBodyOrRef>,
    ctx: &mut ParserContext<'a>,
    breadcrumbs: &[String],
) -> Result<Option<IrRequest>, ConvertError> {
    let Some(body) = body else {
        return Ok(None);
    };
    ctx.in_request_scope(|ctx| {
        let Some(body) = resolve_request_body(body, ctx, breadcrumbs) else {
            return Ok(None);
        };
        let path = crumbs(breadcrumbs, &["requestBody"]);
        let find = |kind: ContentKind| {
            body.content
                .iter()
                .find(|(content_type, _)| ContentKind::of(content_type) == kind)
        };

        let json = find(ContentKind::Json);
        let multipart = find(ContentKind::Multipart);
        if json.is_some() && multipart.is_some() {
            return Err(ConvertError::UnresolvedContentConflict {
                location: breadcrumbs.join("."),
            });
        }

        if let Some((content_type, media)) = json.or_else(|| find(ContentKind::FormUrlEncoded)) {
            return Ok(Some(IrRequest::Json {
                content_type: content_type.clone(),
                schema: media_schema(media, ctx, &path)?,
                description: body.description.clone(),
                required: body.required,
            }));
        }
        if let Some((content_type, media)) = multipart {
            return Ok(Some(IrRequest::Multipart {
                content_type: content_type.clone(),
                properties: multipart_properties(media, ctx, &path)?,
                description: body.description.clone(),
                required: body.required,
            }));
        }
        if let Some((content_type, _)) = find(ContentKind::OctetStream) {
            return Ok(Some(IrRequest::Bytes {
                content_type: content_type.clone(),
                description: body.description.clone(),
                required: body.required,
            }));
        }

        for content_type in body.content.keys() {
            ctx.record(
                ConversionErrorKind::UnsupportedContentType,
                &path,
                format!("request content type {content_type} is not supported"),
            );
        }
        Ok(None)
    })
}

fn media_schema(
    media: &MediaType,
    ctx: &mut ParserContext<'_>,
    breadcrumbs: &[String],
) -> Result<IrSchema, ConvertError> {
    match &media.schema {
        Some(schema) => convert_schema(schema, true, ctx, breadcrumbs),
        None => Ok(IrSchema::unknown(SchemaMeta::default())),
    }
}

fn multipart_properties<'a>(
    media: &'a MediaType,
    ctx: &mut ParserContext<'a>,
    breadcrumbs: &[String],
) -> Result<Vec<IrMultipartProperty>, ConvertError> {
    let Some(object) = media.schema.as_ref().and_then(|s| dereference(s, ctx)) else {
        return Ok(Vec::new());
    };

    let mut properties = Vec::with_capacity(object.properties.len());
    for (key, property) in &object.properties {
        let path = crumbs(breadcrumbs, &[key.as_str()]);
        let Ok(name) = derive_name_variants(key, None) else {
            ctx.record(
                ConversionErrorKind::InvalidIdentifier,
                &path,
                "multipart field name is empty",
            );
            continue;
        };
        let required = object.required.contains(key);
        let resolved = dereference(property, ctx);
        let kind = match resolved.and_then(|schema| file_shape(schema, ctx)) {
            Some(is_array) => IrMultipartPropertyKind::File {
                is_array,
                content_type: media.encoding.get(key).and_then(|e| e.content_type.clone()),
            },
            None => IrMultipartPropertyKind::Field {
                schema: convert_schema(property, required, ctx, &path)?,
            },
        };
        properties.push(IrMultipartProperty {
            key: key.clone(),
            name,
            kind,
            required,
            description: resolved.and_then(|s| s.description.clone()),
        });
    }
    Ok(properties)
}

/// `Some(is_array)` when the schema describes an uploaded file or a list
/// of them.
fn file_shape(schema: &Schema, ctx: &ParserContext<'_>) -> Option<bool> {
    if is_binary(schema) {
        return Some(false);
    }
    let is_array = matches!(schema.schema_type, Some(TypeSet::Single(SchemaType::Array)));
    let items = schema.items.as_deref().and_then(|items| dereference(items, ctx))?;
    (is_array && is_binary(items)).then_some(true)
}

fn is_binary(schema: &Schema) -> bool {
    schema.format.as_deref() == Some("binary") || schema.extension("contentMediaType").is_some()
}

fn resolve_response<'r>(
    response: &'r ResponseOrRef,
    ctx: &mut ParserContext<'r>,
    breadcrumbs: &[String],
) -> Option<&'r Response> {
    match response {
        ResponseOrRef::Response(response) => Some(response),
        ResponseOrRef::Ref { ref_path } => {
            let resolved = ctx.lookup_response(ref_path);
            if resolved.is_none() {
                ctx.record(
                    ConversionErrorKind::DanglingReference,
                    breadcrumbs,
                    format!("response reference {ref_path} does not resolve"),
                );
            }
            resolved
        }
        ResponseOrRef::Invalid(_) => {
            ctx.record(
                ConversionErrorKind::MalformedNode,
                breadcrumbs,
                "response is not a response object",
            );
            None
        }
    }
}

fn convert_responses<'a>(
    responses: &'a IndexMap<String, ResponseOrRef>,
    ctx: &mut ParserContext<'a>,
    breadcrumbs: &[String],
) -> Result<(Option<IrResponse>, Vec<IrErrorResponse>), ConvertError> {
    let mut numbered: Vec<(u16, &String, &'a ResponseOrRef)> = responses
        .iter()
        .filter_map(|(status, response)| {
            status.parse::<u16>().ok().map(|code| (code, status, response))
        })
        .collect();
    numbered.sort_by_key(|(code, _, _)| *code);

    let mut success = None;
    let mut errors = Vec::new();
    for (code, status, response) in numbered {
        let path = crumbs(breadcrumbs, &["responses", status.as_str()]);
        match code {
            200..=299 if success.is_none() => {
                success = Some(convert_success_response(code, response, ctx, &path)?);
            }
            400..=599 => {
                if let Some(error) = convert_error_response(code, response, ctx, &path)? {
                    errors.push(error);
                }
            }
            _ => {}
        }
    }
    Ok((success.flatten(), errors))
}

fn convert_success_response<'a>(
    status_code: u16,
    response: &'a ResponseOrRef,
    ctx: &mut ParserContext<'a>,
    breadcrumbs: &[String],
) -> Result<Option<IrResponse>, ConvertError> {
    let Some(response) = resolve_response(response, ctx, breadcrumbs) else {
        return Ok(None);
    };
    if status_code == 204 || response.content.is_empty() {
        return Ok(None);
    }
    let description = response.description.clone();
    let find = |kind: ContentKind| {
        response
            .content
            .iter()
            .find(|(content_type, _)| ContentKind::of(content_type) == kind)
    };

    if let Some((_, media)) = find(ContentKind::EventStream) {
        return Ok(Some(IrResponse::Streaming {
            status_code,
            schema: media_schema(media, ctx, breadcrumbs)?,
            description,
        }));
    }
    if let Some((_, media)) = find(ContentKind::Json) {
        return Ok(Some(IrResponse::Json {
            status_code,
            schema: media_schema(media, ctx, breadcrumbs)?,
            description,
        }));
    }
    if find(ContentKind::Text).is_some() {
        return Ok(Some(IrResponse::Text {
            status_code,
            description,
        }));
    }
    Ok(Some(IrResponse::File {
        status_code,
        description,
    }))
}

fn convert_error_response<'a>(
    status_code: u16,
    response: &'a ResponseOrRef,
    ctx: &mut ParserContext<'a>,
    breadcrumbs: &[String],
) -> Result<Option<IrErrorResponse>, ConvertError> {
    let Some(response) = resolve_response(response, ctx, breadcrumbs) else {
        return Ok(None);
    };
    let schema = match response
        .content
        .iter()
        .find(|(content_type, _)| ContentKind::of(content_type) == ContentKind::Json)
    {
        Some((_, media)) => Some(media_schema(media, ctx, breadcrumbs)?),
        None => None,
    };
    Ok(Some(IrErrorResponse {
        status_code,
        name: derive_name_variants(&error_name_for_status(status_code), None)?,
        schema,
        description: response.description.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConvertOptions;
    use crate::parse;

    fn convert(yaml: &str, path: &str) -> (ConvertedPathItem, Vec<ConversionErrorKind>) {
        let document = parse::from_yaml(yaml).unwrap();
        let options = ConvertOptions::default();
        let mut ctx = ParserContext::new(&document, &options, ["Authorization".to_string()]);
        let item = document.paths[path].as_ref().unwrap();
        let converted = convert_path_item(path, item, &document, &mut ctx).unwrap();
        let kinds = ctx.errors().iter().map(|e| e.kind).collect();
        (converted, kinds)
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/users/"), "/users");
        assert_eq!(normalize_path("/users"), "/users");
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn test_parameters_merge_and_auth_headers() {
        let (converted, errors) = convert(
            r#"
openapi: 3.1.0
info: {title: t}
paths:
  /users/{userId}/:
    parameters:
      - {name: userId, in: path, schema: {type: string}, description: path level}
      - {name: session, in: cookie, schema: {type: string}}
    get:
      parameters:
        - {name: userId, in: path, schema: {type: integer}}
        - {name: authorization, in: header, schema: {type: string}}
        - {name: X-Trace, in: header, schema: {type: string}}
        - {name: limit, in: query, schema: {type: integer}}
        - $ref: '#/components/parameters/Missing'
"#,
            "/users/{userId}/",
        );
        assert_eq!(errors, vec![ConversionErrorKind::DanglingReference]);
        let endpoint = &converted.endpoints[0];
        assert_eq!(endpoint.path, "/users/{userId}");
        assert_eq!(endpoint.name.camel_case, "getUser");
        assert_eq!(endpoint.path_parameters.len(), 1);
        assert!(endpoint.path_parameters[0].description.is_none());
        assert_eq!(endpoint.headers.len(), 1);
        assert_eq!(endpoint.headers[0].name.wire_value, "X-Trace");
        assert_eq!(endpoint.query_parameters.len(), 1);
        assert!(endpoint.query_parameters[0].schema.meta().optional);
    }

    #[test]
    fn test_multipart_request() {
        let (converted, errors) = convert(
            r#"
openapi: 3.1.0
info: {title: t}
paths:
  /files:
    post:
      operationId: uploadFile
      requestBody:
        required: true
        content:
          multipart/form-data:
            schema:
              type: object
              required: [file]
              properties:
                file: {type: string, format: binary}
                attachments:
                  type: array
                  items: {type: string, format: binary}
                note: {type: string}
            encoding:
              file: {contentType: image/png}
      responses:
        '201':
          description: created
          content:
            application/json:
              schema: {type: object, properties: {id: {type: string}}}
        '404': {description: missing}
"#,
            "/files",
        );
        assert!(errors.is_empty());
        let endpoint = &converted.endpoints[0];
        assert_eq!(endpoint.name.snake_case, "upload_file");
        let Some(IrRequest::Multipart { properties, required, .. }) = &endpoint.request else {
            panic!("expected multipart request");
        };
        assert!(*required);
        assert_eq!(
            properties[0].kind,
            IrMultipartPropertyKind::File {
                is_array: false,
                content_type: Some("image/png".to_string())
            }
        );
        assert!(matches!(
            properties[1].kind,
            IrMultipartPropertyKind::File { is_array: true, .. }
        ));
        assert!(matches!(properties[2].kind, IrMultipartPropertyKind::Field { .. }));
        assert!(matches!(
            endpoint.response,
            Some(IrResponse::Json { status_code: 201, .. })
        ));
        assert_eq!(endpoint.error_responses[0].name.pascal_case, "NotFoundError");
    }

    #[test]
    fn test_unresolved_conflict_is_fatal() {
        let document = parse::from_yaml(
            r#"
openapi: 3.1.0
info: {title: t}
paths:
  /files:
    post:
      requestBody:
        content:
          application/json: {schema: {type: object}}
          multipart/form-data: {schema: {type: object}}
"#,
        )
        .unwrap();
        let options = ConvertOptions::default();
        let mut ctx = ParserContext::new(&document, &options, []);
        let item = document.paths["/files"].as_ref().unwrap();
        let err = convert_path_item("/files", item, &document, &mut ctx).unwrap_err();
        assert!(matches!(err, ConvertError::UnresolvedContentConflict { .. }));
    }

    #[test]
    fn test_webhook_and_ignore() {
        let (converted, errors) = convert(
            r#"
openapi: 3.1.0
info: {title: t}
paths:
  /events:
    post:
      operationId: orderCreated
      x-fern-webhook: true
      requestBody:
        content:
          application/json:
            schema: {type: object, properties: {orderId: {type: string}}}
    put:
      x-fern-webhook: true
    delete:
      x-fern-ignore: true
"#,
            "/events",
        );
        assert!(converted.endpoints.is_empty());
        assert_eq!(converted.webhooks.len(), 1);
        assert_eq!(converted.webhooks[0].name.camel_case, "orderCreated");
        assert_eq!(errors, vec![ConversionErrorKind::MalformedNode]);
    }

    #[test]
    fn test_security_and_extensions() {
        let (converted, errors) = convert(
            r#"
openapi: 3.1.0
info: {title: t}
security:
  - bearerAuth: []
paths:
  /admin:
    get:
      x-internal: true
      x-fern-sdk-method-name: listAdmins
      x-fern-sdk-group-name: [admin, users]
      x-fern-audiences: [internal]
      responses:
        '204': {description: none}
    post:
      security: [{}]
      requestBody:
        content:
          text/csv: {schema: {type: string}}
      responses:
        '200':
          description: csv
          content:
            text/csv: {schema: {type: string}}
"#,
            "/admin",
        );
        assert_eq!(errors, vec![ConversionErrorKind::UnsupportedContentType]);
        let get = &converted.endpoints[0];
        assert!(get.authed);
        assert!(get.internal);
        assert_eq!(get.name.original_value, "listAdmins");
        assert_eq!(get.sdk_group_name, vec!["admin", "users"]);
        assert_eq!(get.audiences, vec!["internal"]);
        assert!(get.response.is_none());
        let post = &converted.endpoints[1];
        assert!(!post.authed);
        assert!(post.request.is_none());
        assert!(matches!(post.response, Some(IrResponse::Text { .. })));
    }
}
