//! # WatchCore: the observation state machine.
//!
//! Owns the wrapped work, drives the await-and-dispatch sequence on a
//! background tokio task, and serves the derived status queries.
//!
//! ## Lifecycle
//! ```text
//! create(work, opts)
//!   ├─ hot  ──► begin() immediately
//!   └─ cold ──► begin() on Watch::start (idempotent, factory runs once)
//!
//! driver task (run):
//!   ├─► sample stats flag, start timer if enabled
//!   ├─► execute()
//!   │     ├─ Work::Handle  ──► await JoinHandle (JoinError → panic/abort)
//!   │     └─ Work::Factory ──► resolve factory (sync panic → immediate fault)
//!   │           ├─ isolated_worker ──► tokio::spawn, await JoinHandle
//!   │           └─ inline           ──► catch_unwind around the future
//!   ├─► store raw outcome
//!   ├─► report fault/cancel to the effective error reporter
//!   ├─► report elapsed time (if timer started)
//!   ├─► dispatch callbacks (unless suppressed)
//!   └─► cancel the `done` token (completion signal)
//! ```
//!
//! ## Rules
//! - Nothing escapes the driver: faults, cancellations, and panics are all
//!   converted into the stored outcome plus a reporter call.
//! - The raw outcome is stored as-is; cancellation reclassification is
//!   resolved at query/dispatch time from the instance override or the
//!   current global default.
//! - Callback order is fixed: `completed` first, then exactly one of
//!   `canceled` / `faulted` / `success`. Each invocation is independently
//!   panic-isolated.
//! - Statistics capture precedes callback dispatch; the completion signal
//!   resolves strictly after dispatch.

use std::borrow::Cow;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, Weak};
use std::time::Instant;

use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::error::{panic_message, TaskError, WatchError};
use crate::reporting::{ErrorReporter, ReportingDefaults};
use crate::watch::options::{CompletionHook, SuccessHook, WatchOptions};
use crate::watch::status::WatchStatus;
use crate::watch::watch::Watch;

/// Deferred work: invoked at most once to produce the future to observe.
pub(crate) type BoxFactory<T> =
    Box<dyn FnOnce() -> BoxFuture<'static, Result<T, TaskError>> + Send>;

/// The one unit of work owned by an observer.
///
/// Exactly one of the two shapes exists per observer; the constructors make
/// any other combination unrepresentable.
pub(crate) enum Work<T> {
    /// Already-spawned task (hot-task mode).
    Handle(JoinHandle<Result<T, TaskError>>),
    /// Deferred factory (hot-or-cold mode).
    Factory(BoxFactory<T>),
}

/// Raw terminal outcome, before reclassification.
pub(crate) enum Outcome<T> {
    Succeeded(Arc<T>),
    Faulted(Arc<TaskError>),
    Canceled(Arc<TaskError>),
}

// Manual impl: `derive` would demand `T: Clone`, but only the Arcs clone.
impl<T> Clone for Outcome<T> {
    fn clone(&self) -> Self {
        match self {
            Outcome::Succeeded(v) => Outcome::Succeeded(Arc::clone(v)),
            Outcome::Faulted(e) => Outcome::Faulted(Arc::clone(e)),
            Outcome::Canceled(e) => Outcome::Canceled(Arc::clone(e)),
        }
    }
}

enum Phase<T> {
    NotCompleted,
    Done(Outcome<T>),
}

/// Shared state machine behind [`Watcher`](crate::Watcher) and
/// [`ValueWatcher`](crate::ValueWatcher).
///
/// Each observer drives exactly one background continuation; the mutable
/// state is touched by at most one dispatch sequence, so no locks are held
/// across awaits.
pub(crate) struct WatchCore<T> {
    /// Self-reference so `Watch::start` can respawn without `Arc<Self>`.
    weak: Weak<WatchCore<T>>,

    name: Option<Cow<'static, str>>,
    isolated_worker: bool,
    canceled_as_faulted: Option<bool>,
    error_reporter: Option<Arc<dyn ErrorReporter>>,

    on_completed: Option<CompletionHook>,
    on_canceled: Option<CompletionHook>,
    on_faulted: Option<CompletionHook>,
    on_success: Option<SuccessHook<T>>,
    has_callbacks: bool,

    /// Fallback value for the result accessor (the unit variant stores `()`).
    fallback: T,

    callbacks_canceled: AtomicBool,
    started: AtomicBool,
    work: Mutex<Option<Work<T>>>,
    phase: RwLock<Phase<T>>,
    done: CancellationToken,
}

impl<T: Send + Sync + 'static> WatchCore<T> {
    /// Creates the core; begins observation immediately when `opts.hot`.
    pub(crate) fn create(work: Work<T>, opts: WatchOptions<T>, fallback: T) -> Arc<Self> {
        let hot = opts.hot;
        let has_callbacks = opts.has_callbacks();
        let core = Arc::new_cyclic(|weak| Self {
            weak: weak.clone(),
            name: opts.name,
            isolated_worker: opts.isolated_worker,
            canceled_as_faulted: opts.canceled_as_faulted,
            error_reporter: opts.error_reporter,
            on_completed: opts.on_completed,
            on_canceled: opts.on_canceled,
            on_faulted: opts.on_faulted,
            on_success: opts.on_success,
            has_callbacks,
            fallback,
            callbacks_canceled: AtomicBool::new(false),
            started: AtomicBool::new(false),
            work: Mutex::new(Some(work)),
            phase: RwLock::new(Phase::NotCompleted),
            done: CancellationToken::new(),
        });
        if hot {
            core.begin();
        }
        core
    }

    /// Spawns the driver task at most once.
    ///
    /// The atomic swap makes restarts no-ops: the factory cannot run twice
    /// and callbacks cannot dispatch twice.
    pub(crate) fn begin(&self) {
        if self.started.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(core) = self.weak.upgrade() {
            tokio::spawn(async move { core.run().await });
        }
    }

    /// Returns the produced value after success, the fallback otherwise.
    ///
    /// Never blocks (short sync read lock) and never panics.
    pub(crate) fn result(&self) -> T
    where
        T: Clone,
    {
        match &*self.read_phase() {
            Phase::Done(Outcome::Succeeded(v)) => (**v).clone(),
            _ => self.fallback.clone(),
        }
    }

    /// One full observation: await, store, report, dispatch, signal.
    async fn run(self: Arc<Self>) {
        // Stats flag is sampled once, before awaiting; the timer stop runs
        // on every path because execute() never unwinds.
        let timer = ReportingDefaults::stats_enabled().then(Instant::now);

        let outcome = self.execute().await;
        {
            let mut phase = self.phase.write().unwrap_or_else(PoisonError::into_inner);
            *phase = Phase::Done(outcome.clone());
        }

        match &outcome {
            Outcome::Faulted(err) => self.report_error("error in wrapped task", err),
            Outcome::Canceled(err) => self.report_error("task has been canceled", err),
            Outcome::Succeeded(_) => {}
        }

        if let Some(started_at) = timer {
            ReportingDefaults::stats_reporter().report(self.as_ref(), started_at.elapsed());
        }

        self.dispatch(&outcome);
        self.done.cancel();
    }

    /// Resolves the work to a raw outcome; cannot fail or unwind.
    async fn execute(&self) -> Outcome<T> {
        let work = {
            let mut slot = self.work.lock().unwrap_or_else(PoisonError::into_inner);
            slot.take()
        };
        let Some(work) = work else {
            // Unreachable behind the `started` guard.
            return Outcome::Faulted(Arc::new(TaskError::fail("work already consumed")));
        };

        match work {
            Work::Handle(handle) => Self::join(handle).await,
            Work::Factory(factory) => {
                // A factory that panics synchronously becomes an immediate
                // fault; it must never reach the caller of start().
                let fut = match std::panic::catch_unwind(AssertUnwindSafe(factory)) {
                    Ok(fut) => fut,
                    Err(payload) => {
                        return Outcome::Faulted(Arc::new(TaskError::Panicked {
                            error: panic_message(payload),
                        }))
                    }
                };
                if self.isolated_worker {
                    Self::join(tokio::spawn(fut)).await
                } else {
                    match AssertUnwindSafe(fut).catch_unwind().await {
                        Ok(res) => Self::classify(res),
                        Err(payload) => Outcome::Faulted(Arc::new(TaskError::Panicked {
                            error: panic_message(payload),
                        })),
                    }
                }
            }
        }
    }

    async fn join(handle: JoinHandle<Result<T, TaskError>>) -> Outcome<T> {
        match handle.await {
            Ok(res) => Self::classify(res),
            Err(err) => Self::classify_join(err),
        }
    }

    fn classify(res: Result<T, TaskError>) -> Outcome<T> {
        match res {
            Ok(value) => Outcome::Succeeded(Arc::new(value)),
            Err(err) if err.is_cancellation() => Outcome::Canceled(Arc::new(err)),
            Err(err) => Outcome::Faulted(Arc::new(err)),
        }
    }

    /// Maps a `JoinError`: abort → canceled, panic → faulted.
    fn classify_join(err: JoinError) -> Outcome<T> {
        if err.is_cancelled() {
            return Outcome::Canceled(Arc::new(TaskError::Canceled));
        }
        match err.try_into_panic() {
            Ok(payload) => Outcome::Faulted(Arc::new(TaskError::Panicked {
                error: panic_message(payload),
            })),
            Err(err) => Outcome::Faulted(Arc::new(TaskError::fail(err.to_string()))),
        }
    }

    /// Invokes the completion callbacks in fixed order.
    ///
    /// `completed` fires first regardless of outcome; then exactly one of
    /// `canceled` / `faulted` / `success`. A panic in one callback is routed
    /// to the effective error reporter and does not stop the next.
    fn dispatch(&self, outcome: &Outcome<T>) {
        if !self.has_callbacks || self.callbacks_canceled.load(Ordering::Acquire) {
            return;
        }

        self.invoke(&self.on_completed, "completed");
        match outcome {
            Outcome::Canceled(_) if !self.reclassify_canceled() => {
                self.invoke(&self.on_canceled, "canceled");
            }
            Outcome::Canceled(_) | Outcome::Faulted(_) => {
                self.invoke(&self.on_faulted, "faulted");
            }
            Outcome::Succeeded(value) => {
                if let Some(hook) = &self.on_success {
                    self.guard("success", || hook(self, value.as_ref()));
                }
            }
        }
    }

    fn invoke(&self, hook: &Option<CompletionHook>, which: &'static str) {
        if let Some(hook) = hook {
            self.guard(which, || hook(self));
        }
    }

    fn guard(&self, which: &'static str, call: impl FnOnce()) {
        if let Err(payload) = std::panic::catch_unwind(AssertUnwindSafe(call)) {
            let err = TaskError::Panicked { error: panic_message(payload) };
            self.report_error(&format!("`{which}` callback panicked"), &err);
        }
    }

    /// Routes an error to the effective reporter, resolved now (late bound).
    fn report_error(&self, context: &str, err: &TaskError) {
        let reporter = self
            .error_reporter
            .clone()
            .unwrap_or_else(ReportingDefaults::error_reporter);
        reporter.report(self, context, err);
    }

    /// Effective reclassification flag: instance override, else global.
    fn reclassify_canceled(&self) -> bool {
        self.canceled_as_faulted
            .unwrap_or_else(ReportingDefaults::canceled_as_faulted)
    }

    fn read_phase(&self) -> RwLockReadGuard<'_, Phase<T>> {
        self.phase.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl<T: Send + Sync + 'static> Watch for WatchCore<T> {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn status(&self) -> WatchStatus {
        if !self.started.load(Ordering::Acquire) {
            return WatchStatus::NotStarted;
        }
        match &*self.read_phase() {
            Phase::NotCompleted => WatchStatus::Running,
            Phase::Done(Outcome::Succeeded(_)) => WatchStatus::Succeeded,
            Phase::Done(Outcome::Faulted(_)) => WatchStatus::Faulted,
            Phase::Done(Outcome::Canceled(_)) => {
                if self.reclassify_canceled() {
                    WatchStatus::Faulted
                } else {
                    WatchStatus::Canceled
                }
            }
        }
    }

    fn error(&self) -> Option<Arc<TaskError>> {
        match &*self.read_phase() {
            Phase::Done(Outcome::Faulted(err)) => Some(Arc::clone(err)),
            Phase::Done(Outcome::Canceled(err)) if self.reclassify_canceled() => {
                Some(Arc::clone(err))
            }
            _ => None,
        }
    }

    fn start(&self) -> Result<(), WatchError> {
        self.begin();
        Ok(())
    }

    fn cancel_callbacks(&self) -> Result<(), WatchError> {
        // Best-effort when racing a dispatch already in flight.
        self.callbacks_canceled.store(true, Ordering::Release);
        Ok(())
    }

    async fn wait(&self) {
        self.done.cancelled().await;
    }
}
