use heck::{ToLowerCamelCase, ToPascalCase, ToShoutySnakeCase, ToSnakeCase};

use crate::error::NameError;
use crate::ir::NameAndWireValue;

/// Derive every casing of `raw`. The wire value is `raw` unless an override
/// is given. Empty input is the only failure.
pub fn derive_name_variants(
    raw: &str,
    wire_override: Option<&str>,
) -> Result<NameAndWireValue, NameError> {
    if raw.is_empty() {
        return Err(NameError::InvalidIdentifier);
    }

    let words = split_words(raw);
    let joined = if words.is_empty() {
        "unnamed".to_string()
    } else {
        words.join("_")
    };

    Ok(NameAndWireValue {
        original_value: raw.to_string(),
        wire_value: wire_override.unwrap_or(raw).to_string(),
        camel_case: joined.to_lower_camel_case(),
        pascal_case: joined.to_pascal_case(),
        snake_case: joined.to_snake_case(),
        screaming_snake_case: joined.to_shouty_snake_case(),
    })
}

/// Split an identifier into words at separators, lower→upper humps,
/// acronym ends and digit/letter transitions.
fn split_words(raw: &str) -> Vec<String> {
    let chars: Vec<char> = raw.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &ch) in chars.iter().enumerate() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if let Some(prev) = current.chars().last() {
            let next = chars.get(i + 1).copied();
            let hump = prev.is_lowercase() && ch.is_uppercase();
            let acronym_end = prev.is_uppercase()
                && ch.is_uppercase()
                && next.is_some_and(|n| n.is_lowercase());
            let digit_edge = prev.is_numeric() != ch.is_numeric();
            if hump || acronym_end || digit_edge {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(ch);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Fallback endpoint name for operations without an `operationId`, such as
/// `getUser` for `GET /users/{userId}`. Static segments are joined in
/// PascalCase; a trailing path parameter singularizes the last one.
pub fn route_to_name(method: &str, path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let targets_item = segments
        .last()
        .is_some_and(|s| s.starts_with('{') && s.ends_with('}'));
    let resources: Vec<&str> = segments
        .iter()
        .copied()
        .filter(|s| !s.starts_with('{'))
        .collect();

    let prefix = match method.to_ascii_lowercase().as_str() {
        "get" if targets_item => "get",
        "get" => "list",
        "post" => "create",
        "put" => "update",
        "delete" => "delete",
        "patch" => "patch",
        "options" => "options",
        "head" => "head",
        "trace" => "trace",
        _ => "call",
    };

    let last = resources.len().saturating_sub(1);
    let resource: String = resources
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            if targets_item && i == last {
                singular(segment).to_pascal_case()
            } else {
                segment.to_pascal_case()
            }
        })
        .collect();
    format!("{prefix}{resource}")
}

fn singular(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies").filter(|s| !s.is_empty()) {
        return format!("{stem}y");
    }
    for suffix in ["ses", "xes", "zes"] {
        if let Some(stem) = word.strip_suffix(suffix) {
            return format!("{stem}{}", &suffix[..1]);
        }
    }
    match word.strip_suffix('s') {
        Some(stem) if !stem.is_empty() && !stem.ends_with('s') => stem.to_string(),
        _ => word.to_string(),
    }
}

/// Conventional error name for an HTTP status code.
pub fn error_name_for_status(status: u16) -> String {
    let name = match status {
        400 => "BadRequestError",
        401 => "UnauthorizedError",
        403 => "ForbiddenError",
        404 => "NotFoundError",
        405 => "MethodNotAllowedError",
        409 => "ConflictError",
        410 => "GoneError",
        413 => "ContentTooLargeError",
        415 => "UnsupportedMediaTypeError",
        422 => "UnprocessableEntityError",
        429 => "TooManyRequestsError",
        500 => "InternalServerError",
        501 => "NotImplementedError",
        502 => "BadGatewayError",
        503 => "ServiceUnavailableError",
        504 => "GatewayTimeoutError",
        other => return format!("Status{other}Error"),
    };
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(raw: &str) -> NameAndWireValue {
        derive_name_variants(raw, None).unwrap()
    }

    #[test]
    fn test_simple_name() {
        let n = names("listModels");
        assert_eq!(n.pascal_case, "ListModels");
        assert_eq!(n.camel_case, "listModels");
        assert_eq!(n.snake_case, "list_models");
        assert_eq!(n.screaming_snake_case, "LIST_MODELS");
        assert_eq!(n.wire_value, "listModels");
    }

    #[test]
    fn test_kebab_case() {
        let n = names("pet-store");
        assert_eq!(n.pascal_case, "PetStore");
        assert_eq!(n.camel_case, "petStore");
        assert_eq!(n.original_value, "pet-store");
    }

    #[test]
    fn test_acronym_boundary() {
        let n = names("HTTPServer");
        assert_eq!(n.snake_case, "http_server");
        assert_eq!(n.pascal_case, "HttpServer");
    }

    #[test]
    fn test_digit_boundary() {
        let n = names("v2Api");
        assert_eq!(n.snake_case, "v_2_api");
        assert_eq!(n.camel_case, "v2Api");
    }

    #[test]
    fn test_special_chars() {
        let n = names("application/json");
        assert_eq!(n.pascal_case, "ApplicationJson");
    }

    #[test]
    fn test_no_alphanumerics() {
        let n = names("$$");
        assert_eq!(n.camel_case, "unnamed");
        assert_eq!(n.wire_value, "$$");
    }

    #[test]
    fn test_empty_is_invalid() {
        assert_eq!(
            derive_name_variants("", None),
            Err(NameError::InvalidIdentifier)
        );
    }

    #[test]
    fn test_wire_override() {
        let n = derive_name_variants("displayName", Some("display_name")).unwrap();
        assert_eq!(n.original_value, "displayName");
        assert_eq!(n.wire_value, "display_name");
        assert_eq!(n.snake_case, "display_name");
    }

    #[test]
    fn test_error_names() {
        assert_eq!(error_name_for_status(404), "NotFoundError");
        assert_eq!(error_name_for_status(418), "Status418Error");
    }

    #[test]
    fn test_route_to_name_list() {
        assert_eq!(route_to_name("GET", "/users"), "listUsers");
    }

    #[test]
    fn test_route_to_name_create() {
        assert_eq!(route_to_name("POST", "/users"), "createUsers");
    }

    #[test]
    fn test_route_to_name_get_single() {
        assert_eq!(route_to_name("GET", "/users/{userId}"), "getUser");
    }

    #[test]
    fn test_route_to_name_delete() {
        assert_eq!(route_to_name("DELETE", "/users/{userId}"), "deleteUser");
    }

    #[test]
    fn test_route_to_name_root() {
        assert_eq!(route_to_name("GET", "/"), "list");
    }

    #[test]
    fn test_route_to_name_nested_single() {
        assert_eq!(
            route_to_name("GET", "/users/{userId}/messages/{messageId}"),
            "getUsersMessage"
        );
    }

    #[test]
    fn test_route_to_name_singular_forms() {
        assert_eq!(route_to_name("PUT", "/categories/{id}"), "updateCategory");
        assert_eq!(route_to_name("GET", "/boxes/{id}"), "getBox");
        assert_eq!(route_to_name("GET", "/address/{id}"), "getAddress");
        assert_eq!(route_to_name("LINK", "/users"), "callUsers");
    }
}
