//! # Dispatch Configuration
//!
//! Environment-driven tuning for the resolution dispatcher.
//!
//! ## Environment Variables
//!
//! ### `PARAMBIND_SLOW_RESOLVE_MS`
//!
//! Resolutions taking longer than this many milliseconds are logged at WARN
//! instead of INFO. The dispatcher imposes no timeout of its own; this only
//! makes slow lookups visible. Default: `100`.
//!
//! ### `PARAMBIND_LOG_RAW_VALUES`
//!
//! Whether raw path values (ids, slugs, emails in vanity URLs) appear in log
//! fields. Set to `false` where path segments may carry personal data; the
//! field is then logged as `<redacted>`. Default: `true`.
//!
//! ### `PARAMBIND_STRICT_ROUTES`
//!
//! When `true`, [`ParamDispatcher::validate_routes`] fails on the first route
//! whose placeholder has no binding, so startup can abort. When `false`
//! the problem is logged at ERROR and every request on that route fails with a
//! configuration error. Default: `false`.
//!
//! ```bash
//! export PARAMBIND_SLOW_RESOLVE_MS=250
//! export PARAMBIND_LOG_RAW_VALUES=false
//! export PARAMBIND_STRICT_ROUTES=true
//! ```
//!
//! [`ParamDispatcher::validate_routes`]: crate::dispatcher::ParamDispatcher::validate_routes

use std::env;
use std::time::Duration;

const DEFAULT_SLOW_RESOLVE_MS: u64 = 100;

/// Dispatcher configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Threshold above which a resolution is logged as slow
    pub slow_resolve_threshold: Duration,
    /// Include raw path values in log fields
    pub log_raw_values: bool,
    /// Abort route validation on the first unbound placeholder
    pub strict_routes: bool,
}

impl DispatchConfig {
    /// Load configuration from environment variables, falling back to defaults
    /// for unset or unparsable values.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let slow_resolve_threshold = lookup("PARAMBIND_SLOW_RESOLVE_MS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map_or(defaults.slow_resolve_threshold, Duration::from_millis);

        let log_raw_values = lookup("PARAMBIND_LOG_RAW_VALUES")
            .and_then(|s| parse_bool(&s))
            .unwrap_or(defaults.log_raw_values);

        let strict_routes = lookup("PARAMBIND_STRICT_ROUTES")
            .and_then(|s| parse_bool(&s))
            .unwrap_or(defaults.strict_routes);

        Self {
            slow_resolve_threshold,
            log_raw_values,
            strict_routes,
        }
    }

    #[must_use]
    pub fn with_slow_resolve_threshold(mut self, threshold: Duration) -> Self {
        self.slow_resolve_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_log_raw_values(mut self, enabled: bool) -> Self {
        self.log_raw_values = enabled;
        self
    }

    #[must_use]
    pub fn with_strict_routes(mut self, strict: bool) -> Self {
        self.strict_routes = strict;
        self
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            slow_resolve_threshold: Duration::from_millis(DEFAULT_SLOW_RESOLVE_MS),
            log_raw_values: true,
            strict_routes: false,
        }
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = DispatchConfig::from_lookup(lookup(&[]));
        assert_eq!(config, DispatchConfig::default());
        assert_eq!(config.slow_resolve_threshold, Duration::from_millis(100));
        assert!(config.log_raw_values);
        assert!(!config.strict_routes);
    }

    #[test]
    fn test_values_are_parsed() {
        let config = DispatchConfig::from_lookup(lookup(&[
            ("PARAMBIND_SLOW_RESOLVE_MS", "250"),
            ("PARAMBIND_LOG_RAW_VALUES", "off"),
            ("PARAMBIND_STRICT_ROUTES", "TRUE"),
        ]));
        assert_eq!(config.slow_resolve_threshold, Duration::from_millis(250));
        assert!(!config.log_raw_values);
        assert!(config.strict_routes);
    }

    #[test]
    fn test_garbage_falls_back_to_default() {
        let config = DispatchConfig::from_lookup(lookup(&[
            ("PARAMBIND_SLOW_RESOLVE_MS", "fast"),
            ("PARAMBIND_STRICT_ROUTES", "maybe"),
        ]));
        assert_eq!(config, DispatchConfig::default());
    }
}
