use crate::config::DispatchConfig;
use crate::error::{ErrorInfo, FailureKind};
use crate::registry::Binding;
use crate::request::RequestInfo;
use futures::FutureExt;
use serde_json::Value;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Result of one resolver invocation. Consumed exactly once by the dispatcher.
#[derive(Debug)]
pub enum Outcome {
    Resolved(Value),
    Failed(ErrorInfo),
}

impl Outcome {
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Outcome::Resolved(_))
    }

    /// Convert into a `Result` for `?`-style callers.
    ///
    /// # Errors
    ///
    /// Returns the captured [`ErrorInfo`] for a failed outcome.
    pub fn into_result(self) -> Result<Value, ErrorInfo> {
        match self {
            Outcome::Resolved(v) => Ok(v),
            Outcome::Failed(e) => Err(e),
        }
    }
}

/// Invokes resolvers and captures their failures as data.
#[derive(Debug, Clone)]
pub struct ResolutionExecutor {
    slow_threshold: Duration,
    log_raw_values: bool,
}

impl Default for ResolutionExecutor {
    fn default() -> Self {
        Self::new(&DispatchConfig::default())
    }
}

impl ResolutionExecutor {
    #[must_use]
    pub fn new(config: &DispatchConfig) -> Self {
        Self {
            slow_threshold: config.slow_resolve_threshold,
            log_raw_values: config.log_raw_values,
        }
    }

    /// Run `binding`'s resolver on `raw`.
    ///
    /// Never panics and never returns early with an error: every path ends in
    /// an [`Outcome`].
    pub async fn resolve(&self, binding: &Binding, raw: &str, info: &RequestInfo) -> Outcome {
        let request_id = info.request_id();
        let param = binding.name();
        let shown = self.shown(raw);

        debug!(
            request_id = %request_id,
            param = %param,
            raw_value = %shown,
            "Resolver invocation start"
        );

        let start = Instant::now();

        // Synchronous resolvers do their work inside `resolve` itself.
        let fut = match catch_unwind(AssertUnwindSafe(|| binding.resolver().resolve(raw, info))) {
            Ok(fut) => fut,
            Err(panic) => return self.panicked(binding, raw, info, panic.as_ref(), start),
        };

        let result = match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => return self.panicked(binding, raw, info, panic.as_ref(), start),
        };

        let elapsed = start.elapsed();
        let latency_ms = elapsed.as_millis() as u64;

        match result {
            Ok(value) => {
                if elapsed > self.slow_threshold {
                    warn!(
                        request_id = %request_id,
                        param = %param,
                        raw_value = %shown,
                        latency_ms = latency_ms,
                        threshold_ms = self.slow_threshold.as_millis() as u64,
                        "Slow placeholder resolution detected"
                    );
                } else {
                    info!(
                        request_id = %request_id,
                        param = %param,
                        raw_value = %shown,
                        latency_ms = latency_ms,
                        "Placeholder resolved"
                    );
                }
                Outcome::Resolved(value)
            }
            Err(cause) => {
                let failure = ErrorInfo::new(binding.name_arc(), raw, FailureKind::Rejected, cause);
                warn!(
                    request_id = %request_id,
                    param = %param,
                    raw_value = %shown,
                    latency_ms = latency_ms,
                    status = failure.status(),
                    error = %failure.message(),
                    "Placeholder resolution failed"
                );
                Outcome::Failed(failure)
            }
        }
    }

    fn panicked(
        &self,
        binding: &Binding,
        raw: &str,
        info: &RequestInfo,
        panic: &(dyn Any + Send),
        start: Instant,
    ) -> Outcome {
        let panic_message = panic_message(panic);
        error!(
            request_id = %info.request_id(),
            param = %binding.name(),
            raw_value = %self.shown(raw),
            latency_ms = start.elapsed().as_millis() as u64,
            panic_message = %panic_message,
            "Resolver panicked - CRITICAL"
        );
        Outcome::Failed(ErrorInfo::new(
            binding.name_arc(),
            raw,
            FailureKind::Panicked,
            anyhow::anyhow!("resolver panicked: {panic_message}"),
        ))
    }

    fn shown<'a>(&self, raw: &'a str) -> &'a str {
        if self.log_raw_values {
            raw
        } else {
            "<redacted>"
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
