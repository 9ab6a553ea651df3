//! # Context Module
//!
//! [`RequestContext`] holds the values resolved for one request, keyed by
//! placeholder name. The dispatcher is its only writer; the request handler
//! receives it once every placeholder has resolved.
//!
//! Writes are additive only: a name set earlier in the request is never
//! overwritten or removed. A context is created per request and never shared
//! between requests.

mod core;

pub use self::core::{ContextError, RequestContext, ResolvedParams, MAX_INLINE_VALUES};
