//! Error taxonomy for binding registration and parameter resolution.
//!
//! - [`InvalidBindingError`]: bad registration. Fatal at startup.
//! - [`NotFoundError`]: a route placeholder with no binding. A configuration
//!   defect, reported as a request failure.
//! - [`ErrorInfo`]: a resolver rejected or panicked. A normal runtime outcome that
//!   travels as data to the host's error channel.
//!
//! [`DispatchError`] is what the error channel receives.

use crate::response::FailureResponse;
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Registration-time failure. The offending binding is never added.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidBindingError {
    #[error("binding name must not be empty")]
    EmptyName,

    /// Names must be usable as a placeholder (`{name}` or `:name`).
    #[error("binding name '{name}' cannot be used as a path placeholder")]
    InvalidName { name: String },

    #[error("binding '{name}' was registered without a resolver")]
    MissingResolver { name: String },

    /// The first registration is kept.
    #[error("binding '{name}' is already registered")]
    Duplicate { name: String },
}

/// A placeholder name with no registered binding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no binding registered for placeholder '{name}'")]
pub struct NotFoundError {
    pub name: String,
}

impl NotFoundError {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Error a resolver can return to choose the HTTP status of its failure.
///
/// Any other error type maps to 500.
///
/// ```
/// use parambind::ResolveStatus;
///
/// let err = anyhow::Error::new(ResolveStatus::not_found("user 999 does not exist"));
/// assert_eq!(err.downcast_ref::<ResolveStatus>().map(|s| s.status), Some(404));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ResolveStatus {
    pub status: u16,
    pub message: String,
}

impl ResolveStatus {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(404, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(400, message)
    }
}

/// How a resolver failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The resolver returned an error.
    Rejected,
    /// The resolver panicked, either when called or while being polled.
    Panicked,
}

/// A captured resolver failure.
///
/// Keeps the original error chain intact so the host can log or downcast it.
/// The executor never inspects it beyond classifying panics.
pub struct ErrorInfo {
    param: Arc<str>,
    raw_value: String,
    kind: FailureKind,
    cause: anyhow::Error,
}

impl ErrorInfo {
    pub fn new(
        param: Arc<str>,
        raw_value: impl Into<String>,
        kind: FailureKind,
        cause: anyhow::Error,
    ) -> Self {
        Self {
            param,
            raw_value: raw_value.into(),
            kind,
            cause,
        }
    }

    #[must_use]
    pub fn param(&self) -> &str {
        &self.param
    }

    #[must_use]
    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }

    #[must_use]
    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// The resolver's error message, including its context chain.
    #[must_use]
    pub fn message(&self) -> String {
        format!("{:#}", self.cause)
    }

    #[must_use]
    pub fn cause(&self) -> &anyhow::Error {
        &self.cause
    }

    #[must_use]
    pub fn into_cause(self) -> anyhow::Error {
        self.cause
    }

    /// HTTP status for this failure: a [`ResolveStatus`] anywhere in the chain
    /// wins, otherwise 500.
    #[must_use]
    pub fn status(&self) -> u16 {
        if self.kind == FailureKind::Panicked {
            return 500;
        }
        self.cause
            .chain()
            .find_map(|e| e.downcast_ref::<ResolveStatus>())
            .map_or(500, |s| s.status)
    }
}

impl fmt::Debug for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorInfo")
            .field("param", &self.param)
            .field("raw_value", &self.raw_value)
            .field("kind", &self.kind)
            .field("cause", &self.message())
            .finish()
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FailureKind::Rejected => write!(
                f,
                "failed to resolve '{}' from '{}': {:#}",
                self.param, self.raw_value, self.cause
            ),
            FailureKind::Panicked => write!(
                f,
                "resolver for '{}' panicked on '{}': {:#}",
                self.param, self.raw_value, self.cause
            ),
        }
    }
}

impl std::error::Error for ErrorInfo {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        let cause: &(dyn std::error::Error + Send + Sync + 'static) = self.cause.as_ref();
        Some(cause)
    }
}

/// Failure handed to the host's error channel.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The inbound parameter list named the same placeholder twice.
    #[error("placeholder '{name}' appears more than once in the request")]
    DuplicatePlaceholder { name: String },

    #[error(transparent)]
    Resolution(#[from] ErrorInfo),

    /// The request was aborted before resolution finished.
    #[error("request cancelled while resolving '{param}'")]
    Cancelled { param: String },
}

impl DispatchError {
    /// HTTP status for the host's error response.
    ///
    /// Cancellation uses 499 (client closed request); nobody is left to read it.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            DispatchError::NotFound(_) | DispatchError::DuplicatePlaceholder { .. } => 500,
            DispatchError::Resolution(info) => info.status(),
            DispatchError::Cancelled { .. } => 499,
        }
    }

    /// Placeholder the failure is attributed to.
    #[must_use]
    pub fn param(&self) -> &str {
        match self {
            DispatchError::NotFound(e) => &e.name,
            DispatchError::DuplicatePlaceholder { name } => name,
            DispatchError::Resolution(info) => info.param(),
            DispatchError::Cancelled { param } => param,
        }
    }

    #[must_use]
    pub fn is_configuration_defect(&self) -> bool {
        matches!(
            self,
            DispatchError::NotFound(_) | DispatchError::DuplicatePlaceholder { .. }
        )
    }

    /// Render the JSON error response a host would send.
    ///
    /// Configuration defects hide their details from clients.
    #[must_use]
    pub fn to_response(&self) -> FailureResponse {
        let status = self.status();
        let body = match self {
            DispatchError::NotFound(_) | DispatchError::DuplicatePlaceholder { .. } => json!({
                "error": "Route misconfigured",
            }),
            DispatchError::Resolution(info) => json!({
                "error": "Parameter resolution failed",
                "param": info.param(),
                "details": info.cause().to_string(),
            }),
            DispatchError::Cancelled { param } => json!({
                "error": "Request cancelled",
                "param": param,
            }),
        };
        FailureResponse::json(status, body)
    }
}
