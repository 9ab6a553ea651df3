//! # Executor Module
//!
//! Runs a single binding's resolver and turns whatever happens into an
//! [`Outcome`].
//!
//! ## Guarantees
//!
//! - Synchronous and asynchronous resolvers are awaited the same way.
//! - `Err` results become [`Outcome::Failed`] with [`FailureKind::Rejected`].
//! - Panics, whether raised when the resolver is called or while its future is
//!   polled, become [`Outcome::Failed`] with [`FailureKind::Panicked`]. A
//!   misbehaving resolver cannot take down the worker that runs the request.
//! - The failure's error chain is kept as-is for the host to log or downcast.
//!
//! The executor holds no per-request state and can be shared freely.
//!
//! [`FailureKind::Rejected`]: crate::error::FailureKind::Rejected
//! [`FailureKind::Panicked`]: crate::error::FailureKind::Panicked

mod core;

pub use self::core::{Outcome, ResolutionExecutor};
