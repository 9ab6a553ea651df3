//! # Dispatcher Module
//!
//! The dispatcher sits between the host's path matching and its request
//! handler. For each matched request it resolves every route placeholder into
//! a domain value, stores the values in a [`RequestContext`], and then hands
//! control back to the host through exactly one of two calls:
//!
//! - [`Continuation::proceed`] with the fully populated context, or
//! - [`Continuation::fail`] with the [`DispatchError`] that stopped resolution.
//!
//! ## Request Flow
//!
//! 1. Host matches the route and extracts ordered `(placeholder, raw)` pairs
//! 2. Every placeholder is looked up in the [`BindingRegistry`]; an unbound
//!    name fails the request before any resolver runs
//! 3. Placeholders resolve strictly one after another, in path order, so a
//!    later resolver can rely on an earlier value (a post scoped to its user)
//! 4. The first failure stops the request: later resolvers are never invoked
//! 5. All resolved → `proceed(ctx)`; otherwise → `fail(err)`
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Host as Routing layer
//!     participant Dispatcher as ParamDispatcher
//!     participant Registry as BindingRegistry
//!     participant Executor as ResolutionExecutor
//!     participant Handler as Continuation
//!
//!     Host->>Dispatcher: dispatch([(user,"1"),(post,"7")], info, cancel, cont)
//!     Dispatcher->>Registry: lookup(user), lookup(post)
//!     alt Placeholder unbound
//!         Dispatcher->>Handler: fail(NotFound)
//!     end
//!     Dispatcher->>Executor: resolve(user, "1")
//!     Executor-->>Dispatcher: Resolved(user)
//!     Dispatcher->>Executor: resolve(post, "7")
//!     alt Resolver failed
//!         Dispatcher->>Handler: fail(Resolution)
//!     end
//!     Executor-->>Dispatcher: Resolved(post)
//!     Dispatcher->>Handler: proceed({user, post})
//! ```
//!
//! ## Cancellation
//!
//! A cancelled request (see [`CancelToken`]) stops at the next opportunity.
//! Late results are discarded and neither `proceed` nor `fail` runs, since
//! nobody is left to receive the response; [`dispatch`] reports
//! [`DispatchOutcome::Cancelled`] instead.
//!
//! ## Concurrency
//!
//! The dispatcher keeps no per-request state. One instance, usually behind an
//! `Arc`, serves any number of concurrent requests.
//!
//! [`RequestContext`]: crate::context::RequestContext
//! [`DispatchError`]: crate::error::DispatchError
//! [`BindingRegistry`]: crate::registry::BindingRegistry
//! [`CancelToken`]: crate::cancel::CancelToken
//! [`dispatch`]: ParamDispatcher::dispatch

mod continuation;
mod core;

pub use self::core::{DispatchOutcome, ParamDispatcher};
pub use continuation::{continuation, Continuation, ContinuationFn};
