use super::*;

fn names(route: &RouteDeclaration) -> Vec<&str> {
    route.placeholders().collect()
}

#[test]
fn test_root_path() {
    let route = RouteDeclaration::parse("/").unwrap();
    assert!(route.segments().is_empty());
    assert_eq!(route.capture("/").unwrap().len(), 0);
    assert!(route.capture("/users").is_none());
}

#[test]
fn test_brace_placeholders() {
    let route = RouteDeclaration::parse("/users/{user}/posts/{post}").unwrap();
    assert_eq!(names(&route), vec!["user", "post"]);
    assert_eq!(route.template(), "/users/{user}/posts/{post}");
    assert_eq!(route.to_string(), "/users/{user}/posts/{post}");
}

#[test]
fn test_colon_placeholders() {
    let route = RouteDeclaration::parse("/users/:user/posts/:post").unwrap();
    assert_eq!(names(&route), vec!["user", "post"]);
}

#[test]
fn test_literal_only_route_has_no_placeholders() {
    let route = RouteDeclaration::parse("/admin/settings").unwrap();
    assert!(names(&route).is_empty());
    assert_eq!(
        route.segments(),
        &[
            Segment::Literal("admin".into()),
            Segment::Literal("settings".into())
        ]
    );
}

#[test]
fn test_capture_in_path_order() {
    let route = RouteDeclaration::parse("/users/{user}/posts/{post}").unwrap();
    let params = route.capture("/users/1/posts/42").unwrap();
    let pairs: Vec<(&str, &str)> = params
        .iter()
        .map(|(k, v)| (k.as_ref(), v.as_str()))
        .collect();
    assert_eq!(pairs, vec![("user", "1"), ("post", "42")]);
}

#[test]
fn test_capture_ignores_query_and_trailing_slash() {
    let route = RouteDeclaration::parse("/users/{user}").unwrap();
    let params = route.capture("/users/7/?debug=true").unwrap();
    assert_eq!(params[0].1, "7");
}

#[test]
fn test_capture_rejects_mismatches() {
    let route = RouteDeclaration::parse("/users/{user}/posts/{post}").unwrap();
    assert!(route.capture("/users/1/comments/2").is_none());
    assert!(route.capture("/users/1/posts").is_none());
    assert!(route.capture("/users/1/posts/2/extra").is_none());
}

#[test]
fn test_empty_placeholder_rejected() {
    assert!(matches!(
        RouteDeclaration::parse("/users/{}"),
        Err(RouteError::EmptyPlaceholder { .. })
    ));
    assert!(matches!(
        RouteDeclaration::parse("/users/:"),
        Err(RouteError::EmptyPlaceholder { .. })
    ));
}

#[test]
fn test_invalid_placeholder_name_rejected() {
    assert!(matches!(
        RouteDeclaration::parse("/users/{a:b}"),
        Err(RouteError::InvalidPlaceholder { .. })
    ));
}

#[test]
fn test_duplicate_placeholder_rejected() {
    let err = RouteDeclaration::parse("/org/{id}/user/{id}").unwrap_err();
    assert_eq!(
        err,
        RouteError::DuplicatePlaceholder {
            template: "/org/{id}/user/{id}".into(),
            name: "id".into()
        }
    );
}
