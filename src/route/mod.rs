//! # Route Module
//!
//! A [`RouteDeclaration`] is the routing layer's view of a path template: an
//! ordered list of literal segments and named placeholders. The dispatcher only
//! reads it, to learn which placeholders a route has and in what order they
//! resolve.
//!
//! Both placeholder spellings used by common routers are accepted:
//!
//! - `{name}` (OpenAPI path templating)
//! - `:name`
//!
//! [`RouteDeclaration::capture`] pulls the ordered `(name, raw)` pairs out of a
//! concrete path. Hosts with their own matcher can skip it and pass their
//! extracted pairs straight to the dispatcher.
//!
//! ```rust
//! use parambind::route::RouteDeclaration;
//!
//! let route = RouteDeclaration::parse("/users/{user}/posts/:post").unwrap();
//! assert_eq!(route.placeholders().collect::<Vec<_>>(), vec!["user", "post"]);
//!
//! let params = route.capture("/users/1/posts/7").unwrap();
//! assert_eq!(params[0].1, "1");
//! assert_eq!(params[1].1, "7");
//! ```

mod core;
#[cfg(test)]
mod tests;

pub use self::core::{ParamVec, RouteDeclaration, RouteError, Segment, MAX_INLINE_PARAMS};
