use crate::context::RequestContext;
use crate::error::DispatchError;

/// The host's two ways forward after resolution.
///
/// Both methods take `self` by value, so a continuation can be used for only
/// one terminal action.
pub trait Continuation {
    type Output;

    /// Run the route's request handler with the resolved values.
    fn proceed(self, ctx: RequestContext) -> Self::Output;

    /// Route the failure to the host's error channel.
    fn fail(self, err: DispatchError) -> Self::Output;
}

/// Continuation built from a pair of closures.
pub struct ContinuationFn<P, F> {
    proceed: P,
    fail: F,
}

/// Build a [`Continuation`] from a handler closure and an error-channel closure.
///
/// ```rust
/// use parambind::dispatcher::continuation;
///
/// let cont = continuation(
///     |ctx| ctx.to_json().to_string(),
///     |err| err.to_response().status.to_string(),
/// );
/// # let _ = cont;
/// ```
pub fn continuation<P, F, T>(proceed: P, fail: F) -> ContinuationFn<P, F>
where
    P: FnOnce(RequestContext) -> T,
    F: FnOnce(DispatchError) -> T,
{
    ContinuationFn { proceed, fail }
}

impl<P, F, T> Continuation for ContinuationFn<P, F>
where
    P: FnOnce(RequestContext) -> T,
    F: FnOnce(DispatchError) -> T,
{
    type Output = T;

    fn proceed(self, ctx: RequestContext) -> T {
        (self.proceed)(ctx)
    }

    fn fail(self, err: DispatchError) -> T {
        (self.fail)(err)
    }
}
