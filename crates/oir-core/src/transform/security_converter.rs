use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::ir::{IrOAuthScope, IrSecurityScheme};
use crate::parse::security::{ApiKeyLocation, SecurityScheme, SecuritySchemeType};

use super::extensions;
use super::name_normalizer::derive_name_variants;

/// Map an OpenAPI security scheme onto one the IR supports. Returns `None`
/// for schemes downstream generators cannot express.
pub fn convert_security_scheme(scheme: &SecurityScheme) -> Option<IrSecurityScheme> {
    let description = scheme.description.clone();
    match scheme.scheme_type {
        SecuritySchemeType::Http => {
            match scheme.scheme.as_deref().map(str::to_ascii_lowercase).as_deref() {
                Some("basic") => Some(IrSecurityScheme::Basic { description }),
                Some("bearer") => Some(IrSecurityScheme::Bearer { description }),
                _ => None,
            }
        }
        SecuritySchemeType::ApiKey => match (scheme.location, &scheme.name) {
            (Some(ApiKeyLocation::Header), Some(name)) => {
                let header = extensions::header_override(&scheme.extensions);
                let parameter_name = header
                    .name
                    .as_deref()
                    .and_then(|raw| derive_name_variants(raw, Some(name)).ok());
                Some(IrSecurityScheme::Header {
                    header_name: name.clone(),
                    name: parameter_name,
                    prefix: header.prefix,
                    description,
                })
            }
            _ => None,
        },
        SecuritySchemeType::OAuth2 => {
            let mut scopes: IndexMap<String, String> = IndexMap::new();
            for flow in scheme.flows.iter().flat_map(|f| f.iter()) {
                for (name, text) in &flow.scopes {
                    scopes.entry(name.clone()).or_insert_with(|| text.clone());
                }
            }
            Some(IrSecurityScheme::Oauth {
                scopes: scopes
                    .into_iter()
                    .map(|(name, text)| IrOAuthScope {
                        name,
                        description: (!text.is_empty()).then_some(text),
                    })
                    .collect(),
                description,
            })
        }
        SecuritySchemeType::OpenIdConnect => Some(IrSecurityScheme::Bearer { description }),
        SecuritySchemeType::MutualTls | SecuritySchemeType::Unsupported => None,
    }
}

/// Header names that carry credentials and must not appear as explicit
/// parameters.
pub fn reserved_auth_headers<'s>(
    schemes: impl IntoIterator<Item = &'s IrSecurityScheme>,
) -> BTreeSet<String> {
    schemes
        .into_iter()
        .map(|scheme| scheme.header_name().to_string())
        .collect()
}
