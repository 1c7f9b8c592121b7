//! # taskwatch
//!
//! **Taskwatch** is a completion observer for fire-and-forget async tasks.
//!
//! It wraps one asynchronous unit of work, tracks its terminal state
//! (succeeded, faulted, canceled), exposes that state as queryable
//! properties, and invokes user-supplied callbacks exactly once when the
//! work finishes — without ever letting a failure propagate to the caller.
//! Spawn sites that cannot (or do not want to) await — event handlers,
//! constructors, initialization paths — keep observability and safe error
//! handling.
//!
//! ## Architecture
//! ```text
//!  caller                         driver task (tokio::spawn)
//!  ──────                         ───────────────────────────
//!  Watcher::defer(factory) ──► ┌─────────────────────────────────────────┐
//!  Watcher::observe(handle)    │  resolve factory (sync panic → fault)   │
//!  builder().build()           │  await work  (inline or isolated task)  │
//!         │                    │      │                                  │
//!     start() (cold)           │      ▼                                  │
//!         │                    │  store raw outcome                      │
//!         ▼                    │  report fault/cancel ──► ErrorReporter  │
//!  status queries  ◄───────────│  report elapsed      ──► StatsReporter  │
//!  is_succeeded / is_faulted   │  dispatch callbacks (panic-isolated):   │
//!  is_canceled / error()       │    on_completed → one of on_canceled /  │
//!         │                    │    on_faulted / on_success              │
//!         ▼                    │  cancel `done` token                    │
//!  wait() ◄────────────────────┴─────────────────────────────────────────┘
//!  (always resolves, never fails)
//! ```
//!
//! ## Features
//! | Area            | Description                                              | Key types / traits                     |
//! |-----------------|----------------------------------------------------------|----------------------------------------|
//! | **Observation** | Track one task's terminal state; query it any time.      | [`Watcher`], [`ValueWatcher`]          |
//! | **Callbacks**   | Fixed-order, panic-isolated completion notifications.    | [`WatcherBuilder`], [`WatchOptions`]   |
//! | **Reporting**   | Pluggable error/stats sinks with late-bound defaults.    | [`ErrorReporter`], [`ReportingDefaults`] |
//! | **Defaulting**  | Safe placeholder before a real observer exists.          | [`NotStartedWatcher`], [`Watch`]       |
//! | **Errors**      | Typed errors for wrapped work and API misuse.            | [`TaskError`], [`WatchError`]          |
//!
//! ## Semantics
//! - **Hot vs. cold**: direct creation observes immediately; builders are
//!   cold until [`Watch::start`]. Starting twice never runs the factory
//!   twice.
//! - **Completion signal**: [`Watch::wait`] resolves once the task reaches
//!   any terminal state and never fails, whatever the outcome. The real
//!   outcome stays available through the status and error accessors.
//! - **Reclassification**: a cancelled task can be reported and dispatched
//!   as faulted, per instance (tri-state override) or process-wide
//!   ([`ReportingDefaults::set_canceled_as_faulted`]). Resolved at query
//!   time, never frozen at construction.
//!
//! ## Example
//! ```rust
//! use taskwatch::{TaskError, ValueWatcher, Watch};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let watcher = ValueWatcher::<Vec<u8>>::builder(|| async {
//!         // load something...
//!         Ok(vec![1, 2, 3])
//!     })
//!     .name("load-config")
//!     .on_success(|_, value| println!("loaded {} bytes", value.len()))
//!     .on_faulted(|w| eprintln!("load failed: {:?}", w.error_message()))
//!     .build();
//!
//!     watcher.start();      // cold builder: observation begins here
//!     watcher.wait().await; // never fails
//!     assert_eq!(watcher.result().len(), 3);
//! }
//! ```

mod error;
mod reporting;
mod watch;

// ---- Public re-exports ----

pub use error::{TaskError, WatchError};
pub use reporting::{
    DefaultsSnapshot, ErrorReporter, ReportingDefaults, StatsReporter, TraceReporter,
};
pub use watch::{
    CompletionHook, NotStartedWatcher, SuccessHook, ValueWatcher, ValueWatcherBuilder, Watch,
    WatchOptions, WatchStatus, Watcher, WatcherBuilder,
};
