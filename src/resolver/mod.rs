//! # Resolver Module
//!
//! A resolver turns the raw string captured for a placeholder into a domain
//! value, usually by loading an entity by id.
//!
//! Every resolver, synchronous or not, is exposed through one shape: a call that
//! returns a boxed `Send` future of `anyhow::Result<serde_json::Value>`. The
//! executor therefore drives all of them the same way and the dispatcher never
//! needs to know how a value was produced.
//!
//! ## Adapters
//!
//! - [`resolver_fn`] wraps an async closure `Fn(String, RequestInfo) -> Future`
//! - [`resolver_sync`] wraps a plain closure `Fn(&str, &RequestInfo) -> Result`
//! - [`TypedResolver`] wraps an async closure producing any `Serialize` type
//!
//! ```rust
//! use parambind::resolver::{parse_raw, resolver_fn, resolver_sync};
//! use serde_json::json;
//!
//! let user = resolver_fn(|raw, _info| async move {
//!     let id: u64 = parse_raw(&raw)?;
//!     Ok(json!({ "id": id }))
//! });
//! let slug = resolver_sync(|raw, _info| Ok(json!(raw.to_lowercase())));
//! # let _ = (user, slug);
//! ```

mod core;

pub use self::core::{
    parse_raw, resolver_fn, resolver_sync, typed_resolver, BoxFuture, FnResolver, ResolveResult,
    Resolver, SyncResolver, TypedResolver,
};
