use crate::executor::Outcome;
use crate::request::RequestInfo;
use std::time::Duration;

/// Observer of placeholder resolutions.
///
/// For each placeholder that reaches the resolver, `before` is called once and
/// then exactly one of `after` or `cancelled`. A hook that panics is logged
/// and skipped; the dispatch and the remaining hooks carry on.
pub trait ResolveHook: Send + Sync {
    fn before(&self, _param: &str, _raw: &str, _info: &RequestInfo) {}

    fn after(&self, _param: &str, _outcome: &Outcome, _latency: Duration) {}

    /// The request was cancelled while this placeholder was resolving.
    fn cancelled(&self, _param: &str, _info: &RequestInfo) {}
}
