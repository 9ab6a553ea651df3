//! Dispatcher core module - per-request placeholder resolution.

use crate::cancel::CancelToken;
use crate::config::DispatchConfig;
use crate::context::RequestContext;
use crate::error::{DispatchError, NotFoundError};
use crate::executor::{Outcome, ResolutionExecutor};
use crate::hooks::ResolveHook;
use crate::ids::RequestId;
use crate::registry::{Binding, BindingRegistry};
use crate::request::RequestInfo;
use crate::route::RouteDeclaration;
use futures::future::{select, Either};
use smallvec::SmallVec;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::pin::pin;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, info_span, warn, Instrument};

use super::Continuation;

/// How a dispatch ended.
#[derive(Debug)]
#[must_use]
pub enum DispatchOutcome<T> {
    /// Exactly one of `proceed` or `fail` ran and returned `T`.
    Completed(T),
    /// The request was cancelled; no terminal action ran.
    Cancelled,
}

impl<T> DispatchOutcome<T> {
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DispatchOutcome::Cancelled)
    }

    #[must_use]
    pub fn completed(self) -> Option<T> {
        match self {
            DispatchOutcome::Completed(t) => Some(t),
            DispatchOutcome::Cancelled => None,
        }
    }
}

/// A placeholder paired with its binding, ready to resolve.
struct Planned<'a> {
    binding: &'a Binding,
    raw: &'a str,
}

/// Coordinates registry lookups, resolver execution and context writes for
/// each request.
///
/// Holds only shared, read-only state: the registry, the executor settings
/// and the hook list. Clone it or put it behind an `Arc` to share.
#[derive(Clone)]
pub struct ParamDispatcher {
    registry: Arc<BindingRegistry>,
    executor: ResolutionExecutor,
    hooks: Vec<Arc<dyn ResolveHook>>,
    config: DispatchConfig,
}

impl ParamDispatcher {
    /// Create a dispatcher over `registry` with default configuration.
    #[must_use]
    pub fn new(registry: Arc<BindingRegistry>) -> Self {
        Self::with_config(registry, DispatchConfig::default())
    }

    #[must_use]
    pub fn with_config(registry: Arc<BindingRegistry>, config: DispatchConfig) -> Self {
        info!(
            bindings = registry.len(),
            binding_names = ?registry.names().collect::<Vec<_>>(),
            slow_resolve_ms = config.slow_resolve_threshold.as_millis() as u64,
            strict_routes = config.strict_routes,
            "Param dispatcher initialized"
        );
        Self {
            registry,
            executor: ResolutionExecutor::new(&config),
            hooks: Vec::new(),
            config,
        }
    }

    /// Add an observer. Hooks run in the order they are added.
    pub fn add_hook(&mut self, hook: Arc<dyn ResolveHook>) {
        self.hooks.push(hook);
    }

    #[must_use]
    pub fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Check that every placeholder of `route` has a binding.
    ///
    /// # Errors
    ///
    /// [`NotFoundError`] for the first unbound placeholder in path order.
    pub fn validate_route(&self, route: &RouteDeclaration) -> Result<(), NotFoundError> {
        for name in route.placeholders() {
            if let Err(e) = self.registry.lookup(name) {
                error!(
                    route = %route,
                    placeholder = %name,
                    available_bindings = ?self.registry.names().collect::<Vec<_>>(),
                    "Route placeholder has no binding - every request on this route will fail"
                );
                return Err(e);
            }
        }
        Ok(())
    }

    /// Validate a set of routes at startup.
    ///
    /// In strict mode the first unbound placeholder is returned as an error so
    /// startup can abort. Otherwise every problem is logged and returned.
    ///
    /// # Errors
    ///
    /// Only in strict mode, see above.
    pub fn validate_routes<'a, I>(&self, routes: I) -> Result<Vec<NotFoundError>, NotFoundError>
    where
        I: IntoIterator<Item = &'a RouteDeclaration>,
    {
        let mut unbound = Vec::new();
        let mut checked = 0usize;
        for route in routes {
            checked += 1;
            if let Err(e) = self.validate_route(route) {
                if self.config.strict_routes {
                    return Err(e);
                }
                unbound.push(e);
            }
        }
        info!(
            routes_checked = checked,
            misconfigured = unbound.len(),
            "Route bindings validated"
        );
        Ok(unbound)
    }

    /// Resolve every placeholder of one request into a fresh [`RequestContext`].
    ///
    /// `params` are the `(placeholder, raw value)` pairs in path order.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::DuplicatePlaceholder`] or [`DispatchError::NotFound`]
    ///   before any resolver runs
    /// - [`DispatchError::Resolution`] for the first resolver that fails; later
    ///   placeholders are not attempted
    /// - [`DispatchError::Cancelled`] once `cancel` fires; any value that
    ///   arrives afterwards is discarded
    pub async fn resolve<N, V>(
        &self,
        params: &[(N, V)],
        info: &RequestInfo,
        cancel: &CancelToken,
    ) -> Result<RequestContext, DispatchError>
    where
        N: AsRef<str>,
        V: AsRef<str>,
    {
        let request_id = info.request_id();

        // A request cancelled up front never reaches planning, so a route
        // defect cannot turn it into a failure.
        if cancel.is_cancelled() {
            let first = params.first().map_or("", |(name, _)| name.as_ref());
            info!(
                request_id = %request_id,
                placeholders = params.len(),
                "Request cancelled before dispatch"
            );
            return Err(DispatchError::Cancelled {
                param: first.to_string(),
            });
        }

        let plan = self.plan(params, info)?;
        let total = plan.len();
        let mut ctx = RequestContext::new(request_id);

        for (idx, step) in plan.iter().enumerate() {
            let param = step.binding.name();

            if cancel.is_cancelled() {
                info!(
                    request_id = %request_id,
                    param = %param,
                    resolved = idx,
                    "Request cancelled before placeholder resolution"
                );
                return Err(DispatchError::Cancelled {
                    param: param.to_string(),
                });
            }

            // Later resolvers see what earlier ones produced.
            let scoped;
            let step_info = if ctx.is_empty() {
                info
            } else {
                scoped = info.clone().with_extension(ctx.snapshot());
                &scoped
            };

            self.notify_hooks(request_id, param, "before", |hook| {
                hook.before(param, step.raw, step_info);
            });

            let start = Instant::now();
            let resolving = pin!(self.executor.resolve(step.binding, step.raw, step_info));

            let outcome = match select(resolving, cancel.cancelled()).await {
                Either::Left((outcome, _)) if !cancel.is_cancelled() => outcome,
                _ => {
                    self.notify_hooks(request_id, param, "cancelled", |hook| {
                        hook.cancelled(param, step_info);
                    });
                    info!(
                        request_id = %request_id,
                        param = %param,
                        resolved = idx,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Request cancelled during placeholder resolution - result discarded"
                    );
                    return Err(DispatchError::Cancelled {
                        param: param.to_string(),
                    });
                }
            };

            let latency = start.elapsed();
            self.notify_hooks(request_id, param, "after", |hook| {
                hook.after(param, &outcome, latency);
            });

            match outcome {
                Outcome::Resolved(value) => {
                    ctx.insert(step.binding.name_arc(), value).map_err(|_| {
                        DispatchError::DuplicatePlaceholder {
                            name: param.to_string(),
                        }
                    })?;
                }
                Outcome::Failed(failure) => {
                    let skipped: SmallVec<[&str; 8]> =
                        plan[idx + 1..].iter().map(|p| p.binding.name()).collect();
                    warn!(
                        request_id = %request_id,
                        param = %param,
                        status = failure.status(),
                        skipped = ?skipped,
                        "Placeholder failed - remaining placeholders skipped"
                    );
                    return Err(DispatchError::Resolution(failure));
                }
            }
        }

        debug!(
            request_id = %request_id,
            resolved = total,
            "All placeholders resolved"
        );
        Ok(ctx)
    }

    /// Resolve a request's placeholders and run exactly one terminal action.
    ///
    /// On success `cont.proceed` receives the populated context; on failure
    /// `cont.fail` receives the error. If the request is cancelled first,
    /// neither runs and [`DispatchOutcome::Cancelled`] is returned.
    pub async fn dispatch<N, V, C>(
        &self,
        params: &[(N, V)],
        info: &RequestInfo,
        cancel: &CancelToken,
        cont: C,
    ) -> DispatchOutcome<C::Output>
    where
        N: AsRef<str>,
        V: AsRef<str>,
        C: Continuation,
    {
        let span = info_span!(
            "param_dispatch",
            request_id = %info.request_id(),
            method = %info.method(),
            path = %info.path(),
            placeholders = params.len()
        );

        async move {
            let start = Instant::now();
            match self.resolve(params, info, cancel).await {
                Err(DispatchError::Cancelled { .. }) => {
                    debug!(
                        request_id = %info.request_id(),
                        "Dispatch abandoned - request cancelled"
                    );
                    DispatchOutcome::Cancelled
                }
                // A cancel landing after the last resolution still wins.
                Ok(_) if cancel.is_cancelled() => {
                    debug!(
                        request_id = %info.request_id(),
                        "Dispatch abandoned after resolution - request cancelled"
                    );
                    DispatchOutcome::Cancelled
                }
                Ok(ctx) => {
                    info!(
                        request_id = %info.request_id(),
                        resolved = ctx.len(),
                        latency_ms = start.elapsed().as_millis() as u64,
                        "Placeholders resolved - proceeding to handler"
                    );
                    DispatchOutcome::Completed(cont.proceed(ctx))
                }
                Err(err) => {
                    if err.is_configuration_defect() {
                        error!(
                            request_id = %info.request_id(),
                            param = %err.param(),
                            error = %err,
                            "Route misconfigured - routing to error channel"
                        );
                    } else {
                        info!(
                            request_id = %info.request_id(),
                            param = %err.param(),
                            status = err.status(),
                            latency_ms = start.elapsed().as_millis() as u64,
                            "Placeholder resolution failed - routing to error channel"
                        );
                    }
                    DispatchOutcome::Completed(cont.fail(err))
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Run one callback on every hook. A panicking hook is logged and skipped.
    fn notify_hooks<F>(&self, request_id: RequestId, param: &str, stage: &'static str, call: F)
    where
        F: Fn(&dyn ResolveHook),
    {
        for hook in &self.hooks {
            if catch_unwind(AssertUnwindSafe(|| call(hook.as_ref()))).is_err() {
                error!(
                    request_id = %request_id,
                    param = %param,
                    stage = stage,
                    "Resolve hook panicked - CRITICAL"
                );
            }
        }
    }

    /// Look up every binding and reject repeated names, before running anything.
    fn plan<'a, N, V>(
        &'a self,
        params: &'a [(N, V)],
        info: &RequestInfo,
    ) -> Result<SmallVec<[Planned<'a>; 8]>, DispatchError>
    where
        N: AsRef<str>,
        V: AsRef<str>,
    {
        let mut plan: SmallVec<[Planned<'a>; 8]> = SmallVec::with_capacity(params.len());

        for (name, raw) in params {
            let name = name.as_ref();
            if plan.iter().any(|p| p.binding.name() == name) {
                error!(
                    request_id = %info.request_id(),
                    placeholder = %name,
                    "Placeholder appears more than once in request - CRITICAL"
                );
                return Err(DispatchError::DuplicatePlaceholder {
                    name: name.to_string(),
                });
            }

            let binding = match self.registry.lookup(name) {
                Ok(binding) => binding,
                Err(e) => {
                    error!(
                        request_id = %info.request_id(),
                        placeholder = %name,
                        available_bindings = ?self.registry.names().collect::<Vec<_>>(),
                        "Placeholder has no binding - CRITICAL"
                    );
                    return Err(e.into());
                }
            };

            plan.push(Planned {
                binding,
                raw: raw.as_ref(),
            });
        }

        Ok(plan)
    }
}
