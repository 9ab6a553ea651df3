//! # parambind
//!
//! **parambind** resolves named path placeholders into domain values before a
//! request handler runs. A route such as `/users/{user}/posts/{post}` declares
//! two placeholders; the application registers one resolver per placeholder
//! name, and for every matched request the dispatcher turns the raw strings
//! (`"1"`, `"7"`) into loaded entities stored in a per-request context.
//!
//! ## Architecture
//!
//! - **[`registry`]** - name → resolver bindings, filled at startup
//! - **[`resolver`]** - the single async resolver abstraction and its adapters
//! - **[`executor`]** - runs one resolver and captures every failure as data
//! - **[`context`]** - the per-request store of resolved values
//! - **[`dispatcher`]** - sequences lookups and resolutions, then calls exactly
//!   one of the host's handler or error channel
//! - **[`route`]** - route templates and placeholder capture
//! - **[`cancel`]** - per-request cancellation
//! - **[`hooks`]** - resolution observers, including counters
//! - **[`config`]** / **[`otel`]** - environment configuration and logging
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use http::Method;
//! use parambind::{
//!     continuation, resolver_fn, BindingRegistry, CancelToken, ParamDispatcher, RequestInfo,
//!     ResolveStatus,
//! };
//! use serde_json::json;
//!
//! let mut registry = BindingRegistry::new();
//! registry.register(
//!     "user",
//!     resolver_fn(|raw, _info| async move {
//!         match raw.as_str() {
//!             "1" => Ok(json!({ "id": 1, "name": "Mirko" })),
//!             _ => Err(ResolveStatus::not_found(format!("no user {raw}")).into()),
//!         }
//!     }),
//! )?;
//!
//! let dispatcher = ParamDispatcher::new(Arc::new(registry));
//! let info = RequestInfo::new(Method::GET, "/users/1");
//!
//! let status = futures::executor::block_on(dispatcher.dispatch(
//!     &[("user", "1")],
//!     &info,
//!     &CancelToken::new(),
//!     continuation(|_ctx| 200, |err| err.status()),
//! ));
//! assert_eq!(status.completed(), Some(200));
//! # Ok::<(), parambind::InvalidBindingError>(())
//! ```

pub mod cancel;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod executor;
pub mod hooks;
pub mod ids;
pub mod otel;
pub mod registry;
pub mod request;
pub mod resolver;
pub mod response;
pub mod route;

pub use cancel::CancelToken;
pub use config::DispatchConfig;
pub use context::{ContextError, RequestContext, ResolvedParams};
pub use dispatcher::{continuation, Continuation, DispatchOutcome, ParamDispatcher};
pub use error::{
    DispatchError, ErrorInfo, FailureKind, InvalidBindingError, NotFoundError, ResolveStatus,
};
pub use executor::{Outcome, ResolutionExecutor};
pub use hooks::{MetricsHook, MetricsSnapshot, ResolveHook};
pub use ids::RequestId;
pub use registry::{Binding, BindingRegistry};
pub use request::RequestInfo;
pub use resolver::{resolver_fn, resolver_sync, typed_resolver, Resolver};
pub use response::FailureResponse;
pub use route::{RouteDeclaration, RouteError};
