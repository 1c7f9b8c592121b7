//! # Observer for a task that produces a value.
//!
//! [`ValueWatcher`] adds a result accessor and a value-carrying success
//! callback on top of the shared observation core. [`result`](ValueWatcher::result)
//! is safe at any point in the lifecycle: before (or without) success it
//! returns the fallback fixed at construction.
//!
//! ## Example
//! ```rust
//! use taskwatch::{TaskError, ValueWatcher};
//!
//! # async fn demo() {
//! let watcher: ValueWatcher<Vec<u32>> = ValueWatcher::defer(|| async {
//!     Ok::<_, TaskError>(vec![1, 2, 3])
//! });
//!
//! watcher.wait().await;
//! assert_eq!(watcher.result().len(), 3);
//! # }
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use tokio::task::JoinHandle;

use crate::error::{TaskError, WatchError};
use crate::watch::builder::ValueWatcherBuilder;
use crate::watch::core::{WatchCore, Work};
use crate::watch::options::WatchOptions;
use crate::watch::status::WatchStatus;
use crate::watch::watch::Watch;

/// Observer for an async task producing a `T`.
///
/// Cheap cloneable handle; the driver task keeps the observation alive even
/// after every handle is dropped.
#[derive(Clone)]
pub struct ValueWatcher<T> {
    core: Arc<WatchCore<T>>,
}

impl<T: Send + Sync + 'static> ValueWatcher<T> {
    /// Observes an already-spawned task; observation begins immediately.
    ///
    /// The fallback for [`result`](ValueWatcher::result) is `T::default()`;
    /// use the [`builder`](ValueWatcher::builder) to supply another.
    pub fn observe(handle: JoinHandle<Result<T, TaskError>>) -> Self
    where
        T: Default,
    {
        Self::observe_with(handle, WatchOptions::default())
    }

    /// Observes an already-spawned task with explicit options.
    pub fn observe_with(handle: JoinHandle<Result<T, TaskError>>, opts: WatchOptions<T>) -> Self
    where
        T: Default,
    {
        Self { core: WatchCore::create(Work::Handle(handle), opts, T::default()) }
    }

    /// Observes deferred work; hot by default.
    pub fn defer<F, Fut>(factory: F) -> Self
    where
        T: Default,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
    {
        Self::defer_with(factory, WatchOptions::default())
    }

    /// Observes deferred work with explicit options.
    pub fn defer_with<F, Fut>(factory: F, opts: WatchOptions<T>) -> Self
    where
        T: Default,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
    {
        let factory = Box::new(move || factory().boxed());
        Self { core: WatchCore::create(Work::Factory(factory), opts, T::default()) }
    }

    /// Returns a fluent builder around a deferred factory; cold by default.
    pub fn builder<F, Fut>(factory: F) -> ValueWatcherBuilder<T>
    where
        T: Default,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
    {
        ValueWatcherBuilder::new(factory)
    }

    pub(crate) fn from_core(core: Arc<WatchCore<T>>) -> Self {
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

    /// Returns the produced value after success, the fallback otherwise.
    ///
    /// Never panics and never blocks.
    pub fn result(&self) -> T
    where
        T: Clone,
    {
        self.core.result()
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
impl<T: Send + Sync + 'static> Watch for ValueWatcher<T> {
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
    use std::sync::Mutex;
    use std::time::Duration;

    use tokio::time::sleep;

    use super::*;

    #[tokio::test]
    async fn success_exposes_value_through_result_and_callback() {
        let seen = Arc::new(Mutex::new(None::<usize>));
        let watcher = {
            let seen = seen.clone();
            ValueWatcher::<Vec<u32>>::builder(|| async {
                sleep(Duration::from_millis(5)).await;
                Ok(vec![1, 2, 3])
            })
            .on_success(move |_, value| {
                *seen.lock().unwrap() = Some(value.len());
            })
            .hot()
            .build()
        };

        watcher.wait().await;
        assert!(watcher.is_succeeded());
        assert_eq!(watcher.result().len(), 3);
        assert_eq!(*seen.lock().unwrap(), Some(3));
    }

    #[tokio::test]
    async fn result_returns_fallback_before_and_without_success() {
        let watcher: ValueWatcher<Vec<u32>> = ValueWatcher::builder(|| async {
            Err(TaskError::fail("boom"))
        })
        .build();

        // Not started yet: fallback.
        assert!(watcher.is_not_started());
        assert!(watcher.result().is_empty());

        watcher.start();
        watcher.wait().await;
        assert!(watcher.is_faulted());
        assert!(watcher.result().is_empty(), "fault keeps the fallback");
    }

    #[tokio::test]
    async fn configured_fallback_wins_over_default() {
        let watcher: ValueWatcher<u64> = ValueWatcher::builder(|| async {
            Err(TaskError::Canceled)
        })
        .fallback(42)
        .hot()
        .build();

        watcher.wait().await;
        assert!(watcher.is_canceled());
        assert_eq!(watcher.result(), 42);
    }

    #[tokio::test]
    async fn observes_spawned_handle_with_value() {
        let handle = tokio::spawn(async { Ok(String::from("done")) });
        let watcher = ValueWatcher::observe(handle);
        watcher.wait().await;
        assert_eq!(watcher.result(), "done");
    }

    #[tokio::test]
    async fn success_callback_fires_exactly_once() {
        let fired = Arc::new(AtomicUsize::new(0));
        let watcher = {
            let fired = fired.clone();
            ValueWatcher::<u8>::builder(|| async { Ok(7) })
                .on_success(move |_, _| {
                    fired.fetch_add(1, Ordering::SeqCst);
                })
                .build()
        };

        watcher.start();
        watcher.start();
        watcher.wait().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
