use indexmap::IndexMap;

use crate::config::ContentConflictPolicy;
use crate::parse::document::OpenApiDocument;
use crate::parse::media_type::MediaType;
use crate::parse::request_body::RequestBodyOrRef;

/// Broad category of a media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Json,
    Multipart,
    FormUrlEncoded,
    OctetStream,
    EventStream,
    Text,
    Other,
}

impl ContentKind {
    pub fn of(content_type: &str) -> Self {
        let essence = media_type_essence(content_type);
        match essence.as_str() {
            "application/json" => ContentKind::Json,
            "application/x-www-form-urlencoded" => ContentKind::FormUrlEncoded,
            "application/octet-stream" => ContentKind::OctetStream,
            "text/event-stream" => ContentKind::EventStream,
            e if e.ends_with("+json") => ContentKind::Json,
            e if e.starts_with("multipart/") => ContentKind::Multipart,
            e if e.starts_with("text/") => ContentKind::Text,
            _ => ContentKind::Other,
        }
    }
}

/// `type/subtype` without parameters, lowercased.
pub fn media_type_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// One JSON/multipart election made by the pre-pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedContentConflict {
    pub location: String,
    pub kept: String,
    pub discarded: String,
    /// The discarded schema differs from the kept one.
    pub diverged: bool,
}

/// A document with every JSON/multipart conflict resolved, plus the
/// elections that were made.
#[derive(Debug, Clone)]
pub struct ContentResolution {
    pub document: OpenApiDocument,
    pub conflicts: Vec<ResolvedContentConflict>,
}

/// Rewrite every inline request body (operations under `paths` and
/// `webhooks`, and `components.requestBodies`) so that no content map holds
/// both a JSON and a multipart representation.
pub fn eliminate_content_conflicts(
    document: &OpenApiDocument,
    policy: ContentConflictPolicy,
) -> ContentResolution {
    let mut resolved = document.clone();
    let mut conflicts = Vec::new();

    let path_items = resolved
        .paths
        .iter_mut()
        .map(|(path, item)| (format!("paths.{path}"), item))
        .chain(
            resolved
                .webhooks
                .iter_mut()
                .map(|(name, item)| (format!("webhooks.{name}"), item)),
        );
    for (prefix, item) in path_items {
        let Some(item) = item else {
            continue;
        };
        for (method, operation) in item.operations_mut() {
            if let Some(RequestBodyOrRef::RequestBody(body)) = &mut operation.request_body {
                let location = format!("{prefix}.{}", method.as_str().to_ascii_lowercase());
                conflicts.extend(resolve_content(&mut body.content, policy, location));
            }
        }
    }

    if let Some(components) = &mut resolved.components {
        for (name, body) in components.request_bodies.iter_mut() {
            if let RequestBodyOrRef::RequestBody(body) = body {
                let location = format!("components.requestBodies.{name}");
                conflicts.extend(resolve_content(&mut body.content, policy, location));
            }
        }
    }

    ContentResolution {
        document: resolved,
        conflicts,
    }
}

fn resolve_content(
    content: &mut IndexMap<String, MediaType>,
    policy: ContentConflictPolicy,
    location: String,
) -> Option<ResolvedContentConflict> {
    let json = content
        .keys()
        .find(|k| ContentKind::of(k) == ContentKind::Json)?
        .clone();
    let multipart = content
        .keys()
        .find(|k| ContentKind::of(k) == ContentKind::Multipart)?
        .clone();

    let (kept, discarded, dropped_kind) = match policy {
        ContentConflictPolicy::PreferMultipart => (multipart, json, ContentKind::Json),
        ContentConflictPolicy::PreferJson => (json, multipart, ContentKind::Multipart),
    };
    let diverged = content.get(&kept).and_then(|m| m.schema.as_ref())
        != content.get(&discarded).and_then(|m| m.schema.as_ref());
    content.retain(|content_type, _| ContentKind::of(content_type) != dropped_kind);

    log::debug!("{location}: kept {kept}, discarded {discarded}");
    Some(ResolvedContentConflict {
        location,
        kept,
        discarded,
        diverged,
    })
}
