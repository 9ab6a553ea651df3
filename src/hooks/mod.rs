//! # Hooks Module
//!
//! Observers invoked around every placeholder resolution, in registration order.
//! Hooks see each resolution but cannot change its outcome; they exist for
//! metrics, audit trails and tests.
//!
//! - [`ResolveHook`] - the observer trait
//! - [`MetricsHook`] - lock-free counters and average latency

mod core;
mod metrics;

pub use self::core::ResolveHook;
pub use metrics::{MetricsHook, MetricsSnapshot};
