use crate::error::ResolveStatus;
use crate::request::RequestInfo;
use anyhow::Context;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;
use std::future::Future;
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::Arc;

/// Boxed future returned by resolvers.
pub type BoxFuture<'a, T> = futures::future::BoxFuture<'a, T>;

/// Result type produced by a resolver.
pub type ResolveResult = anyhow::Result<Value>;

/// Trait implemented by placeholder resolvers.
///
/// The returned future must own everything it needs (`'static`): copy the raw
/// value and clone the parts of `info` the lookup depends on.
pub trait Resolver: Send + Sync + 'static {
    fn resolve(&self, raw: &str, info: &RequestInfo) -> BoxFuture<'static, ResolveResult>;
}

impl<R: Resolver + ?Sized> Resolver for Arc<R> {
    fn resolve(&self, raw: &str, info: &RequestInfo) -> BoxFuture<'static, ResolveResult> {
        (**self).resolve(raw, info)
    }
}

impl<R: Resolver + ?Sized> Resolver for Box<R> {
    fn resolve(&self, raw: &str, info: &RequestInfo) -> BoxFuture<'static, ResolveResult> {
        (**self).resolve(raw, info)
    }
}

/// Resolver backed by an async closure.
pub struct FnResolver<F> {
    f: F,
}

impl<F, Fut> Resolver for FnResolver<F>
where
    F: Fn(String, RequestInfo) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ResolveResult> + Send + 'static,
{
    fn resolve(&self, raw: &str, info: &RequestInfo) -> BoxFuture<'static, ResolveResult> {
        Box::pin((self.f)(raw.to_owned(), info.clone()))
    }
}

/// Wrap an async closure as a [`Resolver`].
pub fn resolver_fn<F, Fut>(f: F) -> FnResolver<F>
where
    F: Fn(String, RequestInfo) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ResolveResult> + Send + 'static,
{
    FnResolver { f }
}

/// Resolver backed by a synchronous closure.
///
/// The closure runs when the executor calls [`Resolver::resolve`]; the result
/// is handed back as an already-completed future.
pub struct SyncResolver<F> {
    f: F,
}

impl<F> Resolver for SyncResolver<F>
where
    F: Fn(&str, &RequestInfo) -> ResolveResult + Send + Sync + 'static,
{
    fn resolve(&self, raw: &str, info: &RequestInfo) -> BoxFuture<'static, ResolveResult> {
        Box::pin(futures::future::ready((self.f)(raw, info)))
    }
}

/// Wrap a synchronous closure as a [`Resolver`].
pub fn resolver_sync<F>(f: F) -> SyncResolver<F>
where
    F: Fn(&str, &RequestInfo) -> ResolveResult + Send + Sync + 'static,
{
    SyncResolver { f }
}

/// Resolver that returns a typed domain value, serialized into the context.
///
/// ```rust
/// use parambind::resolver::{parse_raw, typed_resolver};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct User { id: u64, name: String }
///
/// let users = typed_resolver(|raw, _info| async move {
///     let id: u64 = parse_raw(&raw)?;
///     Ok(User { id, name: "Mirko".into() })
/// });
/// # let _ = users;
/// ```
pub struct TypedResolver<F, T, Fut> {
    f: F,
    _phantom: PhantomData<fn() -> (T, Fut)>,
}

impl<F, T, Fut> TypedResolver<F, T, Fut>
where
    F: Fn(String, RequestInfo) -> Fut + Send + Sync + 'static,
    T: Serialize + Send + 'static,
    Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _phantom: PhantomData,
        }
    }
}

impl<F, T, Fut> Resolver for TypedResolver<F, T, Fut>
where
    F: Fn(String, RequestInfo) -> Fut + Send + Sync + 'static,
    T: Serialize + Send + 'static,
    Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
{
    fn resolve(&self, raw: &str, info: &RequestInfo) -> BoxFuture<'static, ResolveResult> {
        let fut = (self.f)(raw.to_owned(), info.clone());
        Box::pin(async move {
            let value = fut.await?;
            serde_json::to_value(value).context("failed to serialize resolved value")
        })
    }
}

/// Wrap an async closure producing a `Serialize` value as a [`Resolver`].
pub fn typed_resolver<F, T, Fut>(f: F) -> TypedResolver<F, T, Fut>
where
    F: Fn(String, RequestInfo) -> Fut + Send + Sync + 'static,
    T: Serialize + Send + 'static,
    Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
{
    TypedResolver::new(f)
}

/// Parse a raw path value, failing with a 400 [`ResolveStatus`].
pub fn parse_raw<T>(raw: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse::<T>().map_err(|e| {
        anyhow::Error::new(ResolveStatus::bad_request(format!(
            "invalid path value '{raw}': {e}"
        )))
    })
}
