//! # Fire-and-forget observer (no result).
//!
//! [`Watcher`] observes a unit of work that produces no value. It is a cheap
//! cloneable handle over the shared core; dropping every handle does not stop
//! the observation — the driver task owns its own reference.
//!
//! ## Example
//! ```rust
//! use taskwatch::{TaskError, Watcher};
//!
//! # async fn demo() {
//! let watcher = Watcher::defer(|| async {
//!     // do work...
//!     Ok::<_, TaskError>(())
//! });
//!
//! watcher.wait().await; // always resolves, never fails
//! assert!(watcher.is_succeeded());
//! # }
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use tokio::task::JoinHandle;

use crate::error::{TaskError, WatchError};
use crate::watch::builder::WatcherBuilder;
use crate::watch::core::{WatchCore, Work};
use crate::watch::options::WatchOptions;
use crate::watch::status::WatchStatus;
use crate::watch::watch::Watch;

/// Observer for an async task that produces no value.
///
/// Created hot from an already-spawned handle or a deferred factory
/// ([`observe`](Watcher::observe) / [`defer`](Watcher::defer)), or cold via
/// the [`builder`](Watcher::build).
#[derive(Clone)]
pub struct Watcher {
    core: Arc<WatchCore<()>>,
}

impl Watcher {
    /// Observes an already-spawned task; observation begins immediately.
    ///
    /// Must be called within a tokio runtime.
    pub fn observe(handle: JoinHandle<Result<(), TaskError>>) -> Self {
        Self::observe_with(handle, WatchOptions::default())
    }

    /// Observes an already-spawned task with explicit options.
    ///
    /// `opts.hot` defaults to `true`; set it to `false` to defer observation
    /// until [`start`](Watcher::start) even though the task itself is
    /// already running.
    pub fn observe_with(
        handle: JoinHandle<Result<(), TaskError>>,
        opts: WatchOptions<()>,
    ) -> Self {
        Self { core: WatchCore::create(Work::Handle(handle), opts, ()) }
    }

    /// Observes deferred work; the factory runs when observation begins.
    ///
    /// Hot by default: the factory is resolved immediately on a background
    /// task. A synchronous panic inside the factory becomes a fault, never a
    /// panic at this call site.
    pub fn defer<F, Fut>(factory: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        Self::defer_with(factory, WatchOptions::default())
    }

    /// Observes deferred work with explicit options.
    pub fn defer_with<F, Fut>(factory: F, opts: WatchOptions<()>) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        let factory = Box::new(move || factory().boxed());
        Self { core: WatchCore::create(Work::Factory(factory), opts, ()) }
    }

    /// Returns a fluent builder around a deferred factory; cold by default.
    pub fn builder<F, Fut>(factory: F) -> WatcherBuilder
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        WatcherBuilder::new(factory)
    }

    pub(crate) fn from_core(core: Arc<WatchCore<()>>) -> Self {
        Self { core }
    }

    /// Begins observation for a cold watcher; no-op once started.
    pub fn start(&self) {
        self.core.begin();
    }

    /// Permanently suppresses callback dispatch; the task keeps running.
    pub fn cancel_callbacks(&self) {
        let _ = Watch::cancel_callbacks(&*self.core);
    }

    /// Completion signal; resolves on any terminal state, never fails.
    pub async fn wait(&self) {
        Watch::wait(&*self.core).await
    }

    /// Derived status, with reclassification resolved at call time.
    pub fn status(&self) -> WatchStatus {
        self.core.status()
    }

    /// Diagnostic label, if configured.
    pub fn name(&self) -> Option<&str> {
        self.core.name()
    }

    /// Terminal error when faulted (or cancelled under reclassification).
    pub fn error(&self) -> Option<Arc<TaskError>> {
        self.core.error()
    }

    /// Terminal error rendered as a message, if any.
    pub fn error_message(&self) -> Option<String> {
        self.core.error_message()
    }

    /// `true` while observation has not begun.
    pub fn is_not_started(&self) -> bool {
        self.core.is_not_started()
    }

    /// `true` until a terminal state is reached.
    pub fn is_not_completed(&self) -> bool {
        self.core.is_not_completed()
    }

    /// `true` once a terminal state is reached.
    pub fn is_completed(&self) -> bool {
        self.core.is_completed()
    }

    /// `true` when the task completed without error or cancellation.
    pub fn is_succeeded(&self) -> bool {
        self.core.is_succeeded()
    }

    /// `true` when the task failed, panicked, or was reclassified.
    pub fn is_faulted(&self) -> bool {
        self.core.is_faulted()
    }

    /// `true` when the task was cancelled and reclassification is off.
    pub fn is_canceled(&self) -> bool {
        self.core.is_canceled()
    }
}

#[async_trait]
impl Watch for Watcher {
    fn name(&self) -> Option<&str> {
        self.core.name()
    }

    fn status(&self) -> WatchStatus {
        self.core.status()
    }

    fn error(&self) -> Option<Arc<TaskError>> {
        self.core.error()
    }

    fn start(&self) -> Result<(), WatchError> {
        self.core.begin();
        Ok(())
    }

    fn cancel_callbacks(&self) -> Result<(), WatchError> {
        Watch::cancel_callbacks(&*self.core)
    }

    async fn wait(&self) {
        Watch::wait(&*self.core).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::time::sleep;
    use tokio_util::sync::CancellationToken;

    use super::*;

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    #[tokio::test]
    async fn delayed_success_fires_only_success_callback() {
        let completed = counter();
        let success = counter();
        let canceled = counter();
        let faulted = counter();

        let watcher = {
            let (completed, success, canceled, faulted) = (
                completed.clone(),
                success.clone(),
                canceled.clone(),
                faulted.clone(),
            );
            Watcher::builder(|| async {
                sleep(Duration::from_millis(10)).await;
                Ok(())
            })
            .on_completed(move |_| {
                completed.fetch_add(1, Ordering::SeqCst);
            })
            .on_success(move |_| {
                success.fetch_add(1, Ordering::SeqCst);
            })
            .on_canceled(move |_| {
                canceled.fetch_add(1, Ordering::SeqCst);
            })
            .on_faulted(move |_| {
                faulted.fetch_add(1, Ordering::SeqCst);
            })
            .hot()
            .build()
        };

        watcher.wait().await;
        assert!(watcher.is_succeeded());
        assert!(watcher.is_completed());
        assert!(!watcher.is_faulted());
        assert!(!watcher.is_canceled());
        assert_eq!(completed.load(Ordering::SeqCst), 1);
        assert_eq!(success.load(Ordering::SeqCst), 1);
        assert_eq!(canceled.load(Ordering::SeqCst), 0);
        assert_eq!(faulted.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn delayed_fault_keeps_inner_message() {
        let watcher = Watcher::defer(|| async {
            sleep(Duration::from_millis(10)).await;
            Err(TaskError::fail("Fault"))
        });

        watcher.wait().await;
        assert!(watcher.is_faulted());
        assert!(!watcher.is_succeeded());
        assert!(!watcher.is_canceled());
        let err = watcher.error().expect("fault must expose the error");
        assert_eq!(err.detail(), Some("Fault"));
    }

    #[tokio::test]
    async fn synchronous_panic_equals_asynchronous_fault() {
        // Factory panics before any suspension point.
        let watcher = Watcher::defer(|| {
            if true {
                panic!("Fault");
            }
            async { Ok(()) }
        });

        watcher.wait().await;
        assert!(watcher.is_faulted());
        let err = watcher.error().expect("panic must surface as a fault");
        assert_eq!(err.detail(), Some("Fault"));
    }

    #[tokio::test]
    async fn wait_never_fails_for_any_outcome() {
        let ok = Watcher::defer(|| async { Ok(()) });
        let fail = Watcher::defer(|| async { Err(TaskError::fail("boom")) });
        let cancel = Watcher::defer(|| async { Err(TaskError::Canceled) });

        ok.wait().await;
        fail.wait().await;
        cancel.wait().await;

        assert!(ok.is_succeeded());
        assert!(fail.is_faulted());
        assert!(cancel.is_canceled());
    }

    #[tokio::test]
    async fn cold_watcher_invokes_factory_once() {
        let calls = counter();
        let watcher = {
            let calls = calls.clone();
            Watcher::builder(move || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(()) }
            })
            .build()
        };

        assert!(watcher.is_not_started());
        sleep(Duration::from_millis(10)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0, "cold must not run the factory");

        watcher.start();
        watcher.start();
        watcher.wait().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1, "start() twice runs the factory once");
        assert!(watcher.is_succeeded());
    }

    #[tokio::test]
    async fn cancel_callbacks_suppresses_dispatch_but_not_completion() {
        let fired = counter();
        let watcher = {
            let fired = fired.clone();
            let bump = move |_: &dyn Watch| {
                fired.fetch_add(1, Ordering::SeqCst);
            };
            Watcher::builder(|| async {
                sleep(Duration::from_millis(20)).await;
                Ok(())
            })
            .on_completed(bump.clone())
            .on_success(move |w| bump(w))
            .build()
        };

        watcher.start();
        watcher.cancel_callbacks();
        watcher.wait().await;

        assert!(watcher.is_succeeded(), "the task still runs to completion");
        assert_eq!(fired.load(Ordering::SeqCst), 0, "all callbacks suppressed");
    }

    #[tokio::test]
    async fn callback_panic_does_not_block_next_callback() {
        let success = counter();
        let watcher = {
            let success = success.clone();
            Watcher::builder(|| async { Ok(()) })
                .on_completed(|_| panic!("completed hook exploded"))
                .on_success(move |_| {
                    success.fetch_add(1, Ordering::SeqCst);
                })
                .hot()
                .build()
        };

        watcher.wait().await;
        assert!(watcher.is_succeeded());
        assert_eq!(
            success.load(Ordering::SeqCst),
            1,
            "success hook must run despite the completed hook panicking"
        );
    }

    #[tokio::test]
    async fn observes_spawned_handle() {
        let handle = tokio::spawn(async {
            sleep(Duration::from_millis(5)).await;
            Ok(())
        });
        let watcher = Watcher::observe(handle);
        watcher.wait().await;
        assert!(watcher.is_succeeded());
    }

    #[tokio::test]
    async fn aborted_handle_is_canceled() {
        let handle = tokio::spawn(async {
            sleep(Duration::from_secs(60)).await;
            Ok(())
        });
        handle.abort();
        let watcher = Watcher::observe(handle);
        watcher.wait().await;
        assert!(watcher.is_canceled());
        assert!(!watcher.is_faulted());
    }

    #[tokio::test]
    async fn cooperative_cancellation_before_cold_start() {
        // Scenario: the caller cancels the source before starting the
        // observer; the work notices immediately.
        let source = CancellationToken::new();
        source.cancel();

        let watcher = {
            let source = source.clone();
            Watcher::builder(move || async move {
                if source.is_cancelled() {
                    return Err(TaskError::Canceled);
                }
                Ok(())
            })
            .build()
        };

        watcher.start();
        watcher.wait().await;
        assert!(watcher.is_canceled());
        assert!(!watcher.is_faulted());
        assert!(watcher.error().is_none(), "no error exposed without reclassification");
    }

    #[tokio::test]
    async fn isolated_worker_still_reports_outcome() {
        let watcher = {
            let opts = WatchOptions { isolated_worker: true, ..WatchOptions::default() };
            Watcher::defer_with(
                || async {
                    sleep(Duration::from_millis(5)).await;
                    Err(TaskError::fail("isolated"))
                },
                opts,
            )
        };
        watcher.wait().await;
        assert!(watcher.is_faulted());
        assert_eq!(watcher.error().unwrap().detail(), Some("isolated"));
    }
}
