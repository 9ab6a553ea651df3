//! The per-request handle passed to every resolver.
//!
//! The dispatcher treats [`RequestInfo`] as opaque: it only reads the request id
//! for log correlation. Resolvers may inspect the method, headers, or any typed
//! value the host stored in [`RequestInfo::extensions`] (decoded JWT claims,
//! tenant ids, database handles scoped to the request).

use crate::context::ResolvedParams;
use crate::ids::{RequestId, REQUEST_ID_HEADER};
use http::{Extensions, Method};
use smallvec::SmallVec;
use std::sync::Arc;

/// Maximum inline headers before heap allocation.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Header storage; names use `Arc<str>` since they repeat across requests.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Request metadata visible to resolvers.
#[derive(Debug, Clone)]
pub struct RequestInfo {
    request_id: RequestId,
    method: Method,
    path: Arc<str>,
    headers: HeaderVec,
    extensions: Extensions,
}

impl RequestInfo {
    /// Create request info for `method path` with a freshly minted request id.
    #[must_use]
    pub fn new(method: Method, path: impl Into<Arc<str>>) -> Self {
        Self {
            request_id: RequestId::new(),
            method,
            path: path.into(),
            headers: HeaderVec::new(),
            extensions: Extensions::new(),
        }
    }

    /// Create request info from host-parsed headers.
    ///
    /// The request id is taken from `x-request-id` when present and valid.
    #[must_use]
    pub fn from_parts(method: Method, path: impl Into<Arc<str>>, headers: HeaderVec) -> Self {
        let request_id = RequestId::from_header_or_new(
            headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(REQUEST_ID_HEADER))
                .map(|(_, v)| v.as_str()),
        );
        Self {
            request_id,
            method,
            path: path.into(),
            headers,
            extensions: Extensions::new(),
        }
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = request_id;
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((Arc::from(name), value.into()));
        self
    }

    /// Attach a typed value for resolvers to read back with [`Extensions::get`].
    #[must_use]
    pub fn with_extension<T: Clone + Send + Sync + 'static>(mut self, value: T) -> Self {
        self.extensions.insert(value);
        self
    }

    #[inline]
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    #[inline]
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get a header by name (case-insensitive per RFC 7230)
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderVec {
        &self.headers
    }

    #[must_use]
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Values resolved by earlier placeholders of the current request.
    ///
    /// `None` for the first placeholder and outside of a dispatch.
    #[must_use]
    pub fn resolved_params(&self) -> Option<&ResolvedParams> {
        self.extensions.get::<ResolvedParams>()
    }
}
