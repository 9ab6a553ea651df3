use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

use super::ResolveHook;
use crate::error::FailureKind;
use crate::executor::Outcome;
use crate::request::RequestInfo;

/// Hook collecting resolution counters.
///
/// All counters use atomic operations so one instance can be shared by every
/// in-flight request without locks.
#[derive(Debug, Default)]
pub struct MetricsHook {
    started: AtomicU64,
    resolved: AtomicU64,
    rejected: AtomicU64,
    panicked: AtomicU64,
    cancelled: AtomicU64,
    total_latency_ns: AtomicU64,
}

/// Point-in-time copy of [`MetricsHook`] counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub started: u64,
    pub resolved: u64,
    pub rejected: u64,
    pub panicked: u64,
    pub cancelled: u64,
    pub average_latency_us: u64,
}

impl MetricsHook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn started(&self) -> u64 {
        self.started.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn resolved(&self) -> u64 {
        self.resolved.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn failed(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed) + self.panicked.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn cancelled_count(&self) -> u64 {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Mean latency over completed (resolved or failed) resolutions.
    ///
    /// Returns zero before the first completion.
    #[must_use]
    pub fn average_latency(&self) -> Duration {
        let completed = self.resolved() + self.failed();
        if completed == 0 {
            Duration::from_nanos(0)
        } else {
            Duration::from_nanos(self.total_latency_ns.load(Ordering::Relaxed) / completed)
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            started: self.started(),
            resolved: self.resolved(),
            rejected: self.rejected.load(Ordering::Relaxed),
            panicked: self.panicked.load(Ordering::Relaxed),
            cancelled: self.cancelled_count(),
            average_latency_us: self.average_latency().as_micros() as u64,
        }
    }
}

impl ResolveHook for MetricsHook {
    fn before(&self, _param: &str, _raw: &str, _info: &RequestInfo) {
        self.started.fetch_add(1, Ordering::Relaxed);
    }

    fn after(&self, _param: &str, outcome: &Outcome, latency: Duration) {
        let counter = match outcome {
            Outcome::Resolved(_) => &self.resolved,
            Outcome::Failed(e) if e.kind() == FailureKind::Panicked => &self.panicked,
            Outcome::Failed(_) => &self.rejected,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ns
            .fetch_add(latency.as_nanos() as u64, Ordering::Relaxed);
    }

    fn cancelled(&self, _param: &str, _info: &RequestInfo) {
        self.cancelled.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorInfo;
    use http::Method;
    use serde_json::json;
    use std::sync::Arc;

    fn failed(kind: FailureKind) -> Outcome {
        Outcome::Failed(ErrorInfo::new(
            Arc::from("user"),
            "1",
            kind,
            anyhow::anyhow!("x"),
        ))
    }

    #[test]
    fn test_counters_split_by_outcome() {
        let hook = MetricsHook::new();
        let info = RequestInfo::new(Method::GET, "/");

        for _ in 0..4 {
            hook.before("user", "1", &info);
        }
        hook.after("user", &Outcome::Resolved(json!(1)), Duration::from_millis(2));
        hook.after("user", &failed(FailureKind::Rejected), Duration::from_millis(4));
        hook.after("user", &failed(FailureKind::Panicked), Duration::from_millis(6));
        hook.cancelled("user", &info);

        let snap = hook.snapshot();
        assert_eq!(snap.started, 4);
        assert_eq!(snap.resolved, 1);
        assert_eq!(snap.rejected, 1);
        assert_eq!(snap.panicked, 1);
        assert_eq!(snap.cancelled, 1);
        assert_eq!(hook.failed(), 2);
        assert_eq!(hook.average_latency(), Duration::from_millis(4));
        assert_eq!(snap.average_latency_us, 4000);
    }

    #[test]
    fn test_average_latency_zero_when_idle() {
        assert_eq!(MetricsHook::new().average_latency(), Duration::ZERO);
    }
}
