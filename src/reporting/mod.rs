//! Reporting: pluggable sinks and process-wide defaults.
//!
//! This module groups the reporter **extension points** and the **global
//! configuration** that backs them:
//! - [`ErrorReporter`], [`StatsReporter`] — sinks for failures and timings
//! - [`TraceReporter`] — built-in sink writing through `tracing`
//! - [`ReportingDefaults`] — process-wide mutable defaults (late-bound)
//!
//! The effective reporter for an event is the observer's per-instance
//! override if set, otherwise whatever [`ReportingDefaults`] holds *at the
//! moment the event is reported*.

mod defaults;
mod reporter;

pub use defaults::{DefaultsSnapshot, ReportingDefaults};
pub use reporter::{ErrorReporter, StatsReporter, TraceReporter};

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory reporter shared by tests across the crate.

    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use crate::error::TaskError;
    use crate::watch::Watch;

    use super::{ErrorReporter, StatsReporter};

    pub(crate) struct RecordingReporter {
        pub(crate) lines: Mutex<Vec<String>>,
    }

    impl RecordingReporter {
        pub(crate) fn new() -> Arc<Self> {
            Arc::new(Self { lines: Mutex::new(Vec::new()) })
        }

        pub(crate) fn take(&self) -> Vec<String> {
            std::mem::take(&mut self.lines.lock().unwrap())
        }
    }

    impl ErrorReporter for RecordingReporter {
        fn report(&self, _watcher: &dyn Watch, context: &str, error: &TaskError) {
            self.lines
                .lock()
                .unwrap()
                .push(format!("{context}: {}", error.as_message()));
        }
    }

    impl StatsReporter for RecordingReporter {
        fn report(&self, _watcher: &dyn Watch, elapsed: Duration) {
            self.lines
                .lock()
                .unwrap()
                .push(format!("elapsed={}ms", elapsed.as_millis()));
        }
    }
}
