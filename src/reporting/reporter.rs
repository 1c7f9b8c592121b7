//! # Pluggable reporter traits and the built-in trace reporter.
//!
//! Provides [`ErrorReporter`] and [`StatsReporter`] — the extension points
//! through which the observer surfaces wrapped-task failures and completion
//! timings. The built-in [`TraceReporter`] writes both through [`tracing`].
//!
//! ## Rules
//! - Reporters are resolved **at the time of the event** (per-instance
//!   override first, then the current [`ReportingDefaults`] value), never
//!   captured at observer construction.
//! - Reporters must not panic; a panicking reporter is a usage bug. The
//!   dispatch code already isolates each callback invocation, so a bad
//!   reporter can at worst lose its own report.
//!
//! ## Example
//! ```rust
//! use taskwatch::{ErrorReporter, TaskError, Watch};
//!
//! struct Collector;
//!
//! impl ErrorReporter for Collector {
//!     fn report(&self, watcher: &dyn Watch, context: &str, error: &TaskError) {
//!         eprintln!(
//!             "task={:?} {context}: {}",
//!             watcher.name(),
//!             error.as_message()
//!         );
//!     }
//! }
//! ```
//!
//! [`ReportingDefaults`]: crate::ReportingDefaults

use std::time::Duration;

use crate::error::TaskError;
use crate::watch::Watch;

/// Receives wrapped-task failures, cancellations, and callback panics.
///
/// Called from the observer's driver task with a short `context` string
/// identifying the failure site (`"error in wrapped task"`,
/// `"task has been canceled"`, or a message naming the failed callback).
pub trait ErrorReporter: Send + Sync + 'static {
    /// Reports one error event for `watcher`.
    fn report(&self, watcher: &dyn Watch, context: &str, error: &TaskError);
}

/// Receives the elapsed wall-clock time of a completed observation.
///
/// Only called when [`ReportingDefaults::stats_enabled`] was set when the
/// observation began; fires exactly once per observation, whatever the
/// outcome.
///
/// [`ReportingDefaults::stats_enabled`]: crate::ReportingDefaults::stats_enabled
pub trait StatsReporter: Send + Sync + 'static {
    /// Reports the elapsed duration for `watcher`.
    fn report(&self, watcher: &dyn Watch, elapsed: Duration);
}

/// Built-in reporter writing through [`tracing`].
///
/// The default value of both process-wide reporter slots. Errors go out at
/// `ERROR` level, statistics at `DEBUG`, each with the watcher name and
/// status label attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct TraceReporter;

impl ErrorReporter for TraceReporter {
    fn report(&self, watcher: &dyn Watch, context: &str, error: &TaskError) {
        tracing::error!(
            task = watcher.name().unwrap_or("<unnamed>"),
            label = error.as_label(),
            "{context}: {}",
            error.as_message(),
        );
    }
}

impl StatsReporter for TraceReporter {
    fn report(&self, watcher: &dyn Watch, elapsed: Duration) {
        tracing::debug!(
            task = watcher.name().unwrap_or("<unnamed>"),
            status = watcher.status().as_label(),
            elapsed_ms = elapsed.as_millis() as u64,
            "task observation finished",
        );
    }
}
