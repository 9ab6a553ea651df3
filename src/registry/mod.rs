//! # Registry Module
//!
//! The binding registry is the validated table of placeholder name → resolver
//! pairs. It is filled once at startup and then shared, read-only, by every
//! request.
//!
//! ## Lifecycle
//!
//! 1. Build a [`BindingRegistry`] and call [`BindingRegistry::register`] for each
//!    placeholder the service's routes use. Any [`InvalidBindingError`] should
//!    abort startup.
//! 2. Move it into an `Arc` and hand it to the
//!    [`ParamDispatcher`](crate::dispatcher::ParamDispatcher). Registration takes
//!    `&mut self`, so once shared the table can no longer change and concurrent
//!    lookups need no locking.
//!
//! ```rust
//! use parambind::registry::BindingRegistry;
//! use parambind::resolver::resolver_sync;
//! use serde_json::json;
//!
//! let mut registry = BindingRegistry::new();
//! registry.register("user", resolver_sync(|raw, _| Ok(json!({ "id": raw })))).unwrap();
//! assert!(registry.register("user", resolver_sync(|_, _| Ok(json!(null)))).is_err());
//! assert_eq!(registry.names().collect::<Vec<_>>(), vec!["user"]);
//! ```
//!
//! [`InvalidBindingError`]: crate::error::InvalidBindingError

mod core;
#[cfg(test)]
mod tests;

pub use self::core::{validate_name, Binding, BindingRegistry};
