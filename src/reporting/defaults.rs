//! # Process-wide reporting defaults.
//!
//! [`ReportingDefaults`] is the single block of shared mutable configuration
//! in the crate: the default error reporter, the default statistics reporter,
//! the statistics on/off switch, and the global cancellation-reclassification
//! flag.
//!
//! ## Rules
//! - **Late binding**: observers read these values *when an event happens*,
//!   not when the observer is created. Swapping the error reporter after a
//!   watcher was built but before its task completes affects that watcher.
//! - **No transactional semantics**: concurrent writers race last-write-wins,
//!   matching typical global-configuration usage.
//! - **No implicit reset**: tests that mutate these values must save and
//!   restore them ([`snapshot`](ReportingDefaults::snapshot) /
//!   [`restore`](ReportingDefaults::restore)) and run serially.
//!
//! ## Example
//! ```rust
//! use taskwatch::ReportingDefaults;
//!
//! let saved = ReportingDefaults::snapshot();
//! ReportingDefaults::set_stats_enabled(true);
//! assert!(ReportingDefaults::stats_enabled());
//! ReportingDefaults::restore(saved);
//! ```

use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use super::reporter::{ErrorReporter, StatsReporter, TraceReporter};

/// Mutable backing store behind the static.
struct Store {
    stats_enabled: bool,
    canceled_as_faulted: bool,
    error_reporter: Arc<dyn ErrorReporter>,
    stats_reporter: Arc<dyn StatsReporter>,
}

static STORE: LazyLock<RwLock<Store>> = LazyLock::new(|| {
    RwLock::new(Store {
        stats_enabled: false,
        canceled_as_faulted: false,
        error_reporter: Arc::new(TraceReporter),
        stats_reporter: Arc::new(TraceReporter),
    })
});

fn read() -> std::sync::RwLockReadGuard<'static, Store> {
    STORE.read().unwrap_or_else(PoisonError::into_inner)
}

fn write() -> std::sync::RwLockWriteGuard<'static, Store> {
    STORE.write().unwrap_or_else(PoisonError::into_inner)
}

/// Process-wide defaults for error/statistics reporting.
///
/// Pure configuration: storage, defaulting, and get/set access. All state
/// lives in one static block; the type itself is an access namespace.
///
/// Defaults:
/// - `stats_enabled = false`
/// - `canceled_as_faulted = false`
/// - `error_reporter = TraceReporter` (writes via `tracing::error!`)
/// - `stats_reporter = TraceReporter` (writes via `tracing::debug!`)
pub struct ReportingDefaults;

impl ReportingDefaults {
    /// Returns whether completion statistics are collected.
    pub fn stats_enabled() -> bool {
        read().stats_enabled
    }

    /// Enables or disables completion statistics collection.
    ///
    /// The flag is sampled when an observation begins; flipping it mid-flight
    /// does not affect observations already running.
    pub fn set_stats_enabled(enabled: bool) {
        write().stats_enabled = enabled;
    }

    /// Returns the global cancellation-reclassification default.
    ///
    /// When `true`, cancelled tasks are reported and dispatched as faulted
    /// unless the observer carries its own override.
    pub fn canceled_as_faulted() -> bool {
        read().canceled_as_faulted
    }

    /// Sets the global cancellation-reclassification default.
    ///
    /// Resolved at query/dispatch time, so already-created observers without
    /// an instance override pick the new value up immediately.
    pub fn set_canceled_as_faulted(reclassify: bool) {
        write().canceled_as_faulted = reclassify;
    }

    /// Returns the current default error reporter.
    pub fn error_reporter() -> Arc<dyn ErrorReporter> {
        Arc::clone(&read().error_reporter)
    }

    /// Replaces the default error reporter.
    ///
    /// Observers without a per-instance reporter resolve this value at the
    /// moment an error is reported (late binding).
    pub fn set_error_reporter(reporter: Arc<dyn ErrorReporter>) {
        write().error_reporter = reporter;
    }

    /// Returns the current statistics reporter.
    pub fn stats_reporter() -> Arc<dyn StatsReporter> {
        Arc::clone(&read().stats_reporter)
    }

    /// Replaces the statistics reporter.
    pub fn set_stats_reporter(reporter: Arc<dyn StatsReporter>) {
        write().stats_reporter = reporter;
    }

    /// Captures the current values for later [`restore`](Self::restore).
    ///
    /// Test discipline: wrap every global mutation in snapshot/restore to
    /// avoid leaking configuration across tests.
    pub fn snapshot() -> DefaultsSnapshot {
        let store = read();
        DefaultsSnapshot {
            stats_enabled: store.stats_enabled,
            canceled_as_faulted: store.canceled_as_faulted,
            error_reporter: Arc::clone(&store.error_reporter),
            stats_reporter: Arc::clone(&store.stats_reporter),
        }
    }

    /// Restores values previously captured by [`snapshot`](Self::snapshot).
    pub fn restore(saved: DefaultsSnapshot) {
        let mut store = write();
        store.stats_enabled = saved.stats_enabled;
        store.canceled_as_faulted = saved.canceled_as_faulted;
        store.error_reporter = saved.error_reporter;
        store.stats_reporter = saved.stats_reporter;
    }
}

/// Saved copy of [`ReportingDefaults`], produced by
/// [`ReportingDefaults::snapshot`].
pub struct DefaultsSnapshot {
    stats_enabled: bool,
    canceled_as_faulted: bool,
    error_reporter: Arc<dyn ErrorReporter>,
    stats_reporter: Arc<dyn StatsReporter>,
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serial_test::serial;

    use super::*;
    use crate::error::TaskError;
    use crate::reporting::testing::RecordingReporter;

    #[test]
    #[serial(reporting_defaults)]
    fn set_and_restore_round_trip() {
        let saved = ReportingDefaults::snapshot();

        ReportingDefaults::set_stats_enabled(true);
        ReportingDefaults::set_canceled_as_faulted(true);
        assert!(ReportingDefaults::stats_enabled());
        assert!(ReportingDefaults::canceled_as_faulted());

        ReportingDefaults::restore(saved);
        assert!(!ReportingDefaults::stats_enabled());
        assert!(!ReportingDefaults::canceled_as_faulted());
    }

    #[test]
    #[serial(reporting_defaults)]
    fn configured_reporter_receives_events() {
        let saved = ReportingDefaults::snapshot();

        let reporter = RecordingReporter::new();
        ReportingDefaults::set_error_reporter(reporter.clone());
        ReportingDefaults::set_stats_reporter(reporter.clone());

        let placeholder = crate::watch::NotStartedWatcher;
        ReportingDefaults::error_reporter().report(
            &placeholder,
            "error in wrapped task",
            &TaskError::fail("boom"),
        );
        ReportingDefaults::stats_reporter().report(&placeholder, Duration::from_millis(7));

        let lines = reporter.lines.lock().unwrap();
        assert_eq!(lines[0], "error in wrapped task: error: boom");
        assert_eq!(lines[1], "elapsed=7ms");
        drop(lines);

        ReportingDefaults::restore(saved);
    }
}
