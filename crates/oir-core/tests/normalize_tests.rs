use oir_core::transform::name_normalizer::{
    derive_name_variants, error_name_for_status, route_to_name,
};

#[test]
fn test_camel_case_input() {
    let n = derive_name_variants("createChatCompletion", None).unwrap();
    assert_eq!(n.pascal_case, "CreateChatCompletion");
    assert_eq!(n.camel_case, "createChatCompletion");
    assert_eq!(n.snake_case, "create_chat_completion");
    assert_eq!(n.screaming_snake_case, "CREATE_CHAT_COMPLETION");
}

#[test]
fn test_error_name_casings() {
    let n = derive_name_variants("BlogNotFoundError", None).unwrap();
    assert_eq!(n.original_value, "BlogNotFoundError");
    assert_eq!(n.wire_value, "BlogNotFoundError");
    assert_eq!(n.camel_case, "blogNotFoundError");
    assert_eq!(n.pascal_case, "BlogNotFoundError");
    assert_eq!(n.snake_case, "blog_not_found_error");
    assert_eq!(n.screaming_snake_case, "BLOG_NOT_FOUND_ERROR");
}

#[test]
fn test_wire_override() {
    let n = derive_name_variants("publishAt", Some("publish_at")).unwrap();
    assert_eq!(n.camel_case, "publishAt");
    assert_eq!(n.wire_value, "publish_at");
}

#[test]
fn test_kebab_and_acronyms() {
    let n = derive_name_variants("pet-store-api", None).unwrap();
    assert_eq!(n.pascal_case, "PetStoreApi");

    let n = derive_name_variants("HTTPResponseCode", None).unwrap();
    assert_eq!(n.snake_case, "http_response_code");
}

#[test]
fn test_casings_round_trip() {
    let inputs = [
        "BlogNotFoundError",
        "create_chat_completion",
        "X-Request-Id",
        "v2Users",
        "oauth2Token",
        "userID",
    ];
    for input in inputs {
        let n = derive_name_variants(input, None).unwrap();
        for variant in [&n.camel_case, &n.pascal_case, &n.snake_case] {
            let again = derive_name_variants(variant, None).unwrap();
            assert_eq!(again.camel_case, n.camel_case, "camelCase of {variant}");
            assert_eq!(again.pascal_case, n.pascal_case, "PascalCase of {variant}");
            assert_eq!(again.snake_case, n.snake_case, "snake_case of {variant}");
            assert_eq!(
                again.screaming_snake_case, n.screaming_snake_case,
                "SCREAMING_SNAKE_CASE of {variant}"
            );
        }
    }
}

#[test]
fn test_empty_name_fails() {
    assert!(derive_name_variants("", None).is_err());
}

#[test]
fn test_route_names() {
    assert_eq!(route_to_name("GET", "/users"), "listUsers");
    assert_eq!(route_to_name("GET", "/users/{userId}"), "getUser");
    assert_eq!(route_to_name("POST", "/users"), "createUsers");
    assert_eq!(route_to_name("DELETE", "/users/{userId}"), "deleteUser");
    assert_eq!(route_to_name("GET", "/"), "list");
}

#[test]
fn test_error_names() {
    assert_eq!(error_name_for_status(404), "NotFoundError");
    assert_eq!(error_name_for_status(429), "TooManyRequestsError");
    assert_eq!(error_name_for_status(418), "Status418Error");
}
