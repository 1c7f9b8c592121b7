//! # Observation capability trait.
//!
//! [`Watch`] is the object-safe surface shared by every observer shape:
//! the concrete [`Watcher`](crate::Watcher) / [`ValueWatcher`](crate::ValueWatcher)
//! variants and the [`NotStartedWatcher`](crate::NotStartedWatcher)
//! placeholder. Reporters and completion callbacks receive `&dyn Watch`, so
//! user code written against the trait works with any of them.
//!
//! ## Rules
//! - Status accessors are pure queries: cheap, non-blocking, callable from
//!   any thread at any time.
//! - [`wait`](Watch::wait) is the completion signal: it resolves once the
//!   task reaches *any* terminal state and never fails, whatever the outcome.
//! - Mutating operations return `Result` so the placeholder can reject them;
//!   real observers always return `Ok`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{TaskError, WatchError};
use crate::watch::status::WatchStatus;

/// Object-safe observation surface of a watched task.
///
/// The derived flags are mutually exclusive and exhaustive: once
/// [`is_completed`](Watch::is_completed) is `true`, exactly one of
/// [`is_succeeded`](Watch::is_succeeded), [`is_faulted`](Watch::is_faulted),
/// [`is_canceled`](Watch::is_canceled) holds.
#[async_trait]
pub trait Watch: Send + Sync {
    /// Returns the diagnostic label given at construction, if any.
    fn name(&self) -> Option<&str>;

    /// Returns the derived status, resolving cancellation reclassification
    /// at call time (instance override first, else the global default).
    fn status(&self) -> WatchStatus;

    /// Returns the terminal error when the task faulted or was cancelled
    /// under reclassification; `None` otherwise.
    fn error(&self) -> Option<Arc<TaskError>>;

    /// Begins observation for a cold observer.
    ///
    /// Idempotent: a second call (or a call on a hot observer) is a no-op.
    /// The deferred factory is invoked at most once.
    fn start(&self) -> Result<(), WatchError>;

    /// Permanently suppresses all future callback dispatch.
    ///
    /// Idempotent and irreversible. The wrapped task still runs to
    /// completion; only notification is suppressed. Best-effort when racing
    /// against an in-flight dispatch.
    fn cancel_callbacks(&self) -> Result<(), WatchError>;

    /// Completion signal: resolves once the task reaches any terminal state.
    ///
    /// Never fails and never panics, regardless of the task's outcome.
    /// Resolves strictly after callback dispatch has finished (or been
    /// suppressed).
    async fn wait(&self);

    /// `true` while observation has not begun.
    fn is_not_started(&self) -> bool {
        self.status() == WatchStatus::NotStarted
    }

    /// `true` until a terminal state is reached (including before start).
    fn is_not_completed(&self) -> bool {
        !self.status().is_terminal()
    }

    /// `true` once a terminal state is reached.
    fn is_completed(&self) -> bool {
        self.status().is_terminal()
    }

    /// `true` when the task completed without error or cancellation.
    fn is_succeeded(&self) -> bool {
        self.status() == WatchStatus::Succeeded
    }

    /// `true` when the task failed, panicked, or was cancelled under
    /// reclassification.
    fn is_faulted(&self) -> bool {
        self.status() == WatchStatus::Faulted
    }

    /// `true` when the task was cancelled and reclassification is off.
    fn is_canceled(&self) -> bool {
        self.status() == WatchStatus::Canceled
    }

    /// Returns the terminal error rendered as a message, if any.
    fn error_message(&self) -> Option<String> {
        self.error().map(|e| e.as_message())
    }
}
