//! # Fluent observer construction.
//!
//! [`WatcherBuilder`] and [`ValueWatcherBuilder`] accumulate the optional
//! configuration — callbacks, name, hot/cold, worker isolation, the
//! reclassification override, a per-instance reporter — and produce the
//! observer with a single terminal [`build`](WatcherBuilder::build).
//!
//! Pure assembly, no algorithmic content: the builders only accept a
//! deferred factory, which makes the handle-vs-factory exclusivity a
//! structural fact rather than a runtime check.
//!
//! ## Rules
//! - Builders are **cold by default**: the factory does not run until
//!   [`start`](crate::Watch::start). Opt into hot with
//!   [`hot`](WatcherBuilder::hot).
//! - No invariants beyond what the constructors already enforce.
//!
//! ## Example
//! ```rust
//! use taskwatch::{TaskError, Watch, Watcher};
//!
//! # async fn demo() {
//! let watcher = Watcher::builder(|| async { Ok::<_, TaskError>(()) })
//!     .name("warmup")
//!     .on_completed(|w| println!("done: {}", w.status().as_label()))
//!     .build();
//!
//! watcher.start();
//! watcher.wait().await;
//! # }
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;

use crate::error::TaskError;
use crate::reporting::ErrorReporter;
use crate::watch::core::{BoxFactory, WatchCore, Work};
use crate::watch::options::WatchOptions;
use crate::watch::value::ValueWatcher;
use crate::watch::watch::Watch;
use crate::watch::watcher::Watcher;

/// Builder for the no-result [`Watcher`].
pub struct WatcherBuilder {
    factory: BoxFactory<()>,
    opts: WatchOptions<()>,
}

impl WatcherBuilder {
    pub(crate) fn new<F, Fut>(factory: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        Self {
            factory: Box::new(move || factory().boxed()),
            opts: WatchOptions { hot: false, ..WatchOptions::default() },
        }
    }

    /// Sets the diagnostic label.
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.opts.name = Some(name.into());
        self
    }

    /// Starts observation immediately at [`build`](Self::build).
    pub fn hot(mut self) -> Self {
        self.opts.hot = true;
        self
    }

    /// Spawns the deferred future onto its own tokio task when observed.
    pub fn isolated_worker(mut self) -> Self {
        self.opts.isolated_worker = true;
        self
    }

    /// Instance-level cancellation-reclassification override.
    ///
    /// Takes precedence over the global default; not calling this leaves
    /// the tri-state unset.
    pub fn canceled_as_faulted(mut self, reclassify: bool) -> Self {
        self.opts.canceled_as_faulted = Some(reclassify);
        self
    }

    /// Per-instance error reporter, overriding the process-wide default.
    pub fn error_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.opts.error_reporter = Some(reporter);
        self
    }

    /// Callback fired on any terminal state, before the outcome-specific one.
    pub fn on_completed(mut self, f: impl Fn(&dyn Watch) + Send + Sync + 'static) -> Self {
        self.opts.on_completed = Some(Arc::new(f));
        self
    }

    /// Callback fired when the derived terminal state is canceled.
    pub fn on_canceled(mut self, f: impl Fn(&dyn Watch) + Send + Sync + 'static) -> Self {
        self.opts.on_canceled = Some(Arc::new(f));
        self
    }

    /// Callback fired when the derived terminal state is faulted.
    pub fn on_faulted(mut self, f: impl Fn(&dyn Watch) + Send + Sync + 'static) -> Self {
        self.opts.on_faulted = Some(Arc::new(f));
        self
    }

    /// Callback fired on success; the no-result variant carries no payload.
    pub fn on_success(mut self, f: impl Fn(&dyn Watch) + Send + Sync + 'static) -> Self {
        self.opts.on_success = Some(Arc::new(move |watch, _: &()| f(watch)));
        self
    }

    /// Produces the watcher; hot builders begin observing here.
    pub fn build(self) -> Watcher {
        Watcher::from_core(WatchCore::create(Work::Factory(self.factory), self.opts, ()))
    }
}

/// Builder for the result-bearing [`ValueWatcher`].
pub struct ValueWatcherBuilder<T> {
    factory: BoxFactory<T>,
    opts: WatchOptions<T>,
    fallback: T,
}

impl<T: Send + Sync + 'static> ValueWatcherBuilder<T> {
    pub(crate) fn new<F, Fut>(factory: F) -> Self
    where
        T: Default,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
    {
        Self {
            factory: Box::new(move || factory().boxed()),
            opts: WatchOptions { hot: false, ..WatchOptions::default() },
            fallback: T::default(),
        }
    }

    /// Sets the diagnostic label.
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.opts.name = Some(name.into());
        self
    }

    /// Starts observation immediately at [`build`](Self::build).
    pub fn hot(mut self) -> Self {
        self.opts.hot = true;
        self
    }

    /// Spawns the deferred future onto its own tokio task when observed.
    pub fn isolated_worker(mut self) -> Self {
        self.opts.isolated_worker = true;
        self
    }

    /// Instance-level cancellation-reclassification override.
    pub fn canceled_as_faulted(mut self, reclassify: bool) -> Self {
        self.opts.canceled_as_faulted = Some(reclassify);
        self
    }

    /// Per-instance error reporter, overriding the process-wide default.
    pub fn error_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.opts.error_reporter = Some(reporter);
        self
    }

    /// Replaces the `T::default()` fallback returned by
    /// [`result`](ValueWatcher::result) before/without success.
    pub fn fallback(mut self, value: T) -> Self {
        self.fallback = value;
        self
    }

    /// Callback fired on any terminal state, before the outcome-specific one.
    pub fn on_completed(mut self, f: impl Fn(&dyn Watch) + Send + Sync + 'static) -> Self {
        self.opts.on_completed = Some(Arc::new(f));
        self
    }

    /// Callback fired when the derived terminal state is canceled.
    pub fn on_canceled(mut self, f: impl Fn(&dyn Watch) + Send + Sync + 'static) -> Self {
        self.opts.on_canceled = Some(Arc::new(f));
        self
    }

    /// Callback fired when the derived terminal state is faulted.
    pub fn on_faulted(mut self, f: impl Fn(&dyn Watch) + Send + Sync + 'static) -> Self {
        self.opts.on_faulted = Some(Arc::new(f));
        self
    }

    /// Callback fired on success with the produced value.
    pub fn on_success(mut self, f: impl Fn(&dyn Watch, &T) + Send + Sync + 'static) -> Self {
        self.opts.on_success = Some(Arc::new(f));
        self
    }

    /// Produces the watcher; hot builders begin observing here.
    pub fn build(self) -> ValueWatcher<T> {
        ValueWatcher::from_core(WatchCore::create(
            Work::Factory(self.factory),
            self.opts,
            self.fallback,
        ))
    }
}
