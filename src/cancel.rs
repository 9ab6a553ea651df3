//! Request cancellation.
//!
//! The host keeps one [`CancelToken`] per in-flight request and calls
//! [`CancelToken::cancel`] when the client goes away. The dispatcher races every
//! resolver against [`CancelToken::cancelled`] and checks the flag again before
//! writing a result, so values that arrive after cancellation are dropped.
//!
//! Dropping the dispatch future altogether is an equally valid way to cancel;
//! the token exists for hosts that cannot reach the future they spawned.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll, Waker};

/// Shared cancellation flag for one request.
///
/// Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    inner: Arc<CancelState>,
}

#[derive(Debug, Default)]
struct CancelState {
    flag: AtomicBool,
    wakers: Mutex<Vec<Waker>>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.flag.load(Ordering::Acquire)
    }

    /// Mark the request as cancelled and wake everything waiting on it.
    ///
    /// Returns `true` for the call that actually flipped the flag.
    pub fn cancel(&self) -> bool {
        let first = self
            .inner
            .flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if first {
            let wakers = std::mem::take(
                &mut *self
                    .inner
                    .wakers
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner),
            );
            for waker in wakers {
                waker.wake();
            }
        }
        first
    }

    /// Future that completes once the token is cancelled.
    #[must_use]
    pub fn cancelled(&self) -> Cancelled {
        Cancelled {
            token: self.clone(),
        }
    }
}

/// Future returned by [`CancelToken::cancelled`].
#[derive(Debug)]
#[must_use = "futures do nothing unless polled"]
pub struct Cancelled {
    token: CancelToken,
}

impl Future for Cancelled {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.token.is_cancelled() {
            return Poll::Ready(());
        }

        let mut wakers = self
            .token
            .inner
            .wakers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // cancel() may have run between the flag check and taking the lock.
        if self.token.is_cancelled() {
            return Poll::Ready(());
        }
        if !wakers.iter().any(|w| w.will_wake(cx.waker())) {
            wakers.push(cx.waker().clone());
        }
        Poll::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use futures::FutureExt;

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        assert!(token.cancel());
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_only_first_cancel_reports_true() {
        let token = CancelToken::new();
        assert!(token.cancel());
        assert!(!token.cancel());
    }

    #[test]
    fn test_cancelled_future_pending_until_cancel() {
        let token = CancelToken::new();
        let mut fut = token.cancelled();
        assert!((&mut fut).now_or_never().is_none());

        token.cancel();
        assert!(fut.now_or_never().is_some());
    }

    #[test]
    fn test_cancel_from_another_thread_wakes_waiter() {
        let token = CancelToken::new();
        let remote = token.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(20));
            remote.cancel();
        });
        block_on(token.cancelled());
        handle.join().unwrap();
        assert!(token.is_cancelled());
    }
}
