//! # Observer configuration.
//!
//! Provides [`WatchOptions`] — the plain configuration bundle consumed by
//! the direct-create constructors. The fluent builders
//! ([`WatcherBuilder`](crate::WatcherBuilder),
//! [`ValueWatcherBuilder`](crate::ValueWatcherBuilder)) assemble the same
//! struct behind the scenes.
//!
//! ## Field semantics
//! - `hot = true` (default): observation begins at construction. Cold
//!   observers report not-started until [`start`](crate::Watch::start).
//! - `isolated_worker = false`: a deferred future is awaited inline by the
//!   observer's driver; when `true` it is spawned onto its own tokio task
//!   first, decoupling its execution context.
//! - `canceled_as_faulted = None`: defer to
//!   [`ReportingDefaults::canceled_as_faulted`](crate::ReportingDefaults::canceled_as_faulted).
//!   `Some(_)` overrides the global default for this observer only. Keep the
//!   tri-state: collapsing to `bool` would lose the "unset" state and break
//!   override precedence.
//! - `error_reporter = None`: defer to the global default, resolved at the
//!   time an error is reported.

use std::borrow::Cow;
use std::sync::Arc;

use crate::reporting::ErrorReporter;
use crate::watch::Watch;

/// Completion callback invoked with the observer.
pub type CompletionHook = Arc<dyn Fn(&dyn Watch) + Send + Sync>;

/// Success callback invoked with the observer and the produced value.
///
/// The no-result variant adapts a payload-free closure into this shape with
/// `T = ()`, so the dispatch path is identical for both observer kinds.
pub type SuccessHook<T> = Arc<dyn Fn(&dyn Watch, &T) + Send + Sync>;

/// Configuration for creating an observer directly.
///
/// All fields are public for flexibility; [`Default`] gives the hot,
/// non-isolated, fully-deferring configuration with no callbacks.
///
/// ## Example
/// ```rust
/// use taskwatch::WatchOptions;
///
/// let opts = WatchOptions::<()> {
///     name: Some("refresh".into()),
///     hot: false,
///     ..WatchOptions::default()
/// };
/// assert!(!opts.hot);
/// ```
pub struct WatchOptions<T> {
    /// Optional diagnostic label; shows up in reporter output.
    pub name: Option<Cow<'static, str>>,

    /// Whether observation begins immediately at construction.
    pub hot: bool,

    /// Whether a deferred future is spawned onto its own tokio task.
    pub isolated_worker: bool,

    /// Instance-level cancellation-reclassification override.
    ///
    /// `None` defers to the global default at query time.
    pub canceled_as_faulted: Option<bool>,

    /// Per-instance error reporter override.
    pub error_reporter: Option<Arc<dyn ErrorReporter>>,

    /// Fires first on any terminal state, before the outcome-specific hook.
    pub on_completed: Option<CompletionHook>,

    /// Fires when the derived terminal state is canceled.
    pub on_canceled: Option<CompletionHook>,

    /// Fires when the derived terminal state is faulted.
    pub on_faulted: Option<CompletionHook>,

    /// Fires on success with the produced value.
    pub on_success: Option<SuccessHook<T>>,
}

impl<T> Default for WatchOptions<T> {
    fn default() -> Self {
        Self {
            name: None,
            hot: true,
            isolated_worker: false,
            canceled_as_faulted: None,
            error_reporter: None,
            on_completed: None,
            on_canceled: None,
            on_faulted: None,
            on_success: None,
        }
    }
}

impl<T> WatchOptions<T> {
    /// Returns `true` if at least one completion callback is registered.
    pub(crate) fn has_callbacks(&self) -> bool {
        self.on_completed.is_some()
            || self.on_canceled.is_some()
            || self.on_faulted.is_some()
            || self.on_success.is_some()
    }
}
