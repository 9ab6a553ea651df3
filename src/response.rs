//! Error-channel response shape for hosts that speak JSON over HTTP.

use crate::request::HeaderVec;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Response a host sends when parameter resolution fails.
///
/// Produced by [`DispatchError::to_response`](crate::DispatchError::to_response).
#[derive(Debug, Clone, Serialize)]
pub struct FailureResponse {
    /// HTTP status code
    pub status: u16,
    #[serde(skip_serializing)]
    pub headers: HeaderVec,
    pub body: Value,
}

impl FailureResponse {
    /// Create a JSON response with a content-type header
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "application/json".to_string()));
        Self {
            status,
            headers,
            body,
        }
    }

    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
