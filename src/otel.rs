//! Structured logging setup.
//!
//! Every dispatcher event is a `tracing` event with `request_id` and `param`
//! fields, so JSON output can be filtered per request. Hosts that already own a
//! subscriber skip this module; the library only emits events.
//!
//! Configuration comes from `PARAMBIND_LOG_*` environment variables:
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `PARAMBIND_LOG_LEVEL` | `info` | trace/debug/info/warn/error |
//! | `PARAMBIND_LOG_FORMAT` | `json` | json/pretty |
//! | `PARAMBIND_LOG_SAMPLING_MODE` | `all` | all/error-only/sampled |
//! | `PARAMBIND_LOG_SAMPLING_RATE` | `0.1` | kept share of info/debug events when sampled |
//! | `PARAMBIND_LOG_ASYNC` | `true` | buffer output on a background writer |
//! | `PARAMBIND_LOG_TARGET_FILTER` | unset | extra comma-separated filter directives |
//! | `PARAMBIND_LOG_INCLUDE_LOCATION` | `false` | add file:line to events |

use anyhow::{Context, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::subscriber::Interest;
use tracing::{Level, Metadata, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::{Context as LayerContext, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::parse_bool;

/// Log format: JSON for production, pretty-print for development
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

/// Which events reach the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingMode {
    All,
    /// Only WARN and ERROR
    ErrorOnly,
    /// Every WARN and ERROR, a share of everything else
    Sampled,
}

impl SamplingMode {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "error-only" | "error_only" => SamplingMode::ErrorOnly,
            "sampled" => SamplingMode::Sampled,
            _ => SamplingMode::All,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub log_level: String,
    pub format: LogFormat,
    pub sampling_mode: SamplingMode,
    /// Kept share (0.0-1.0) of INFO and below in `Sampled` mode
    pub sampling_rate: f64,
    pub async_logging: bool,
    /// Comma-separated `EnvFilter` directives
    pub target_filter: Option<String>,
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::default_prod()
    }
}

impl LogConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparsable values keep the
    /// production defaults.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default_prod();
        Self {
            log_level: lookup("PARAMBIND_LOG_LEVEL").unwrap_or(defaults.log_level),
            format: lookup("PARAMBIND_LOG_FORMAT")
                .map_or(defaults.format, |s| LogFormat::parse(&s)),
            sampling_mode: lookup("PARAMBIND_LOG_SAMPLING_MODE")
                .map_or(defaults.sampling_mode, |s| SamplingMode::parse(&s)),
            sampling_rate: lookup("PARAMBIND_LOG_SAMPLING_RATE")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.sampling_rate),
            async_logging: lookup("PARAMBIND_LOG_ASYNC")
                .and_then(|s| parse_bool(&s))
                .unwrap_or(defaults.async_logging),
            target_filter: lookup("PARAMBIND_LOG_TARGET_FILTER").filter(|s| !s.trim().is_empty()),
            include_location: lookup("PARAMBIND_LOG_INCLUDE_LOCATION")
                .and_then(|s| parse_bool(&s))
                .unwrap_or(defaults.include_location),
        }
    }

    #[must_use]
    pub fn default_dev() -> Self {
        Self {
            log_level: "debug".to_string(),
            format: LogFormat::Pretty,
            sampling_mode: SamplingMode::All,
            sampling_rate: 1.0,
            async_logging: false,
            target_filter: None,
            include_location: true,
        }
    }

    #[must_use]
    pub fn default_prod() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Json,
            sampling_mode: SamplingMode::All,
            sampling_rate: 0.1,
            async_logging: true,
            target_filter: None,
            include_location: false,
        }
    }

    fn level(&self) -> Level {
        match self.log_level.trim().to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

/// Drops a share of INFO-and-below events; WARN and ERROR always pass.
pub struct SamplingLayer {
    mode: SamplingMode,
    sampling_rate: f64,
    counter: AtomicU64,
}

impl SamplingLayer {
    #[must_use]
    pub fn new(mode: SamplingMode, sampling_rate: f64) -> Self {
        Self {
            mode,
            sampling_rate: sampling_rate.clamp(0.0, 1.0),
            counter: AtomicU64::new(0),
        }
    }

    fn should_sample(&self, metadata: &Metadata<'_>) -> bool {
        // Spans carry request_id for every event inside them.
        if metadata.is_span() {
            return true;
        }
        let severe = matches!(*metadata.level(), Level::WARN | Level::ERROR);
        match self.mode {
            SamplingMode::All => true,
            SamplingMode::ErrorOnly => severe,
            SamplingMode::Sampled => {
                if severe {
                    return true;
                }
                if self.sampling_rate <= 0.0 {
                    return false;
                }
                let interval = (1.0 / self.sampling_rate) as u64;
                let count = self.counter.fetch_add(1, Ordering::Relaxed);
                interval > 0 && count % interval == 0
            }
        }
    }
}

impl<S> Layer<S> for SamplingLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    // A cached always/never would freeze the first sampling decision for the
    // whole callsite, so sampled INFO-and-below callsites are re-asked per event.
    fn register_callsite(&self, metadata: &'static Metadata<'static>) -> Interest {
        let severe = matches!(*metadata.level(), Level::WARN | Level::ERROR);
        if self.mode == SamplingMode::Sampled && metadata.is_event() && !severe {
            Interest::sometimes()
        } else if self.should_sample(metadata) {
            Interest::always()
        } else {
            Interest::never()
        }
    }

    fn enabled(&self, metadata: &Metadata<'_>, _ctx: LayerContext<'_, S>) -> bool {
        self.should_sample(metadata)
    }
}

fn env_filter(config: &LogConfig) -> EnvFilter {
    let mut filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level().as_str()));

    if let Some(target_filter) = &config.target_filter {
        for directive in target_filter.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            match directive.parse() {
                Ok(d) => filter = filter.add_directive(d),
                Err(_) => eprintln!("Warning: Invalid log filter directive: {directive}"),
            }
        }
    }
    filter
}

/// Install the global subscriber.
///
/// With async logging on, the returned guard owns the background writer: keep
/// it alive for the life of the process or buffered events are lost.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
///
/// # Example
///
/// ```no_run
/// use parambind::otel::{init_logging_with_config, LogConfig};
///
/// let _guard = init_logging_with_config(&LogConfig::from_env())?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn init_logging_with_config(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let (writer, guard) = if config.async_logging {
        let (nb, guard) = tracing_appender::non_blocking(std::io::stdout());
        (tracing_subscriber::fmt::writer::BoxMakeWriter::new(nb), Some(guard))
    } else {
        (
            tracing_subscriber::fmt::writer::BoxMakeWriter::new(std::io::stdout),
            None,
        )
    };

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_thread_ids(true)
            .with_span_list(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(SamplingLayer::new(config.sampling_mode, config.sampling_rate))
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(guard)
}
