use super::*;
use crate::error::InvalidBindingError;
use crate::request::RequestInfo;
use crate::resolver::{resolver_sync, Resolver};
use futures::executor::block_on;
use http::Method;
use serde_json::json;
use std::sync::Arc;

fn constant(value: serde_json::Value) -> impl Resolver {
    resolver_sync(move |_, _| Ok(value.clone()))
}

#[test]
fn test_register_then_lookup_returns_same_resolver() {
    let mut registry = BindingRegistry::new();
    let resolver: Arc<dyn Resolver> = Arc::new(constant(json!({ "id": 1 })));
    registry
        .register_dyn("user", Some(Arc::clone(&resolver)))
        .unwrap();

    let binding = registry.lookup("user").unwrap();
    assert_eq!(binding.name(), "user");
    assert!(Arc::ptr_eq(binding.resolver(), &resolver));
}

#[test]
fn test_lookup_resolver_is_callable() {
    let mut registry = BindingRegistry::new();
    registry.register("post", constant(json!({ "id": 2 }))).unwrap();

    let info = RequestInfo::new(Method::GET, "/posts/2");
    let binding = registry.lookup("post").unwrap();
    let value = block_on(binding.resolver().resolve("2", &info)).unwrap();
    assert_eq!(value, json!({ "id": 2 }));
}

#[test]
fn test_duplicate_registration_keeps_first() {
    let mut registry = BindingRegistry::new();
    registry.register("user", constant(json!("first"))).unwrap();

    let err = registry.register("user", constant(json!("second"))).unwrap_err();
    assert_eq!(
        err,
        InvalidBindingError::Duplicate {
            name: "user".into()
        }
    );
    assert_eq!(registry.len(), 1);

    let info = RequestInfo::new(Method::GET, "/");
    let binding = registry.lookup("user").unwrap();
    let value = block_on(binding.resolver().resolve("1", &info)).unwrap();
    assert_eq!(value, json!("first"));
}

#[test]
fn test_empty_names_rejected() {
    let mut registry = BindingRegistry::new();
    assert_eq!(
        registry.register("", constant(json!(null))),
        Err(InvalidBindingError::EmptyName)
    );
    assert_eq!(
        registry.register("   ", constant(json!(null))),
        Err(InvalidBindingError::EmptyName)
    );
    assert!(registry.is_empty());
}

#[test]
fn test_route_syntax_in_name_rejected() {
    let mut registry = BindingRegistry::new();
    for bad in ["user/id", "{user}", ":user", "user id"] {
        let err = registry.register(bad, constant(json!(null))).unwrap_err();
        assert!(
            matches!(err, InvalidBindingError::InvalidName { ref name } if name == bad),
            "expected InvalidName for {bad:?}, got {err:?}"
        );
    }
    assert!(registry.is_empty());
}

#[test]
fn test_missing_resolver_rejected() {
    let mut registry = BindingRegistry::new();
    let err = registry.register_dyn("user", None).unwrap_err();
    assert_eq!(
        err,
        InvalidBindingError::MissingResolver {
            name: "user".into()
        }
    );
    assert!(!registry.contains("user"));
}

#[test]
fn test_missing_resolver_with_bad_name_reports_name_first() {
    let mut registry = BindingRegistry::new();
    assert_eq!(
        registry.register_dyn("", None),
        Err(InvalidBindingError::EmptyName)
    );
}

#[test]
fn test_lookup_unknown_name() {
    let registry = BindingRegistry::new();
    let err = registry.lookup("ghost").unwrap_err();
    assert_eq!(err.name, "ghost");
}

#[test]
fn test_names_follow_registration_order() {
    let mut registry = BindingRegistry::new();
    for name in ["post", "user", "comment"] {
        registry.register(name, constant(json!(name))).unwrap();
    }
    assert_eq!(
        registry.names().collect::<Vec<_>>(),
        vec!["post", "user", "comment"]
    );
    let indices: Vec<usize> = registry.iter().map(|b| b.index()).collect();
    assert_eq!(indices, vec![0, 1, 2]);
}

#[test]
fn test_validate_name_accepts_common_identifiers() {
    for ok in ["user", "postId", "team_id", "org-slug", "v2"] {
        assert!(validate_name(ok).is_ok(), "{ok} should be valid");
    }
}
