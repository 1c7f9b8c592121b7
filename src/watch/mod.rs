//! # Task observation: core, variants, builders, placeholder.
//!
//! This module groups everything that watches one unit of work:
//! - [`Watch`] — object-safe capability trait (queries, `start`,
//!   `cancel_callbacks`, the `wait` completion signal)
//! - [`WatchStatus`] — derived status with reclassification folded in
//! - [`Watcher`] / [`ValueWatcher`] — concrete no-result / with-result
//!   observers over the shared internal core
//! - [`WatcherBuilder`] / [`ValueWatcherBuilder`] — fluent cold-by-default
//!   construction around a deferred factory
//! - [`WatchOptions`] — plain configuration for direct creation
//! - [`NotStartedWatcher`] — stateless placeholder for "no observer yet"
//!
//! Internal module:
//! - `core`: the state machine that awaits the work, stores the raw
//!   outcome, reports, and dispatches callbacks.

mod builder;
mod core;
mod options;
mod placeholder;
mod status;
mod value;
#[allow(clippy::module_inception)]
mod watch;
mod watcher;

pub use builder::{ValueWatcherBuilder, WatcherBuilder};
pub use options::{CompletionHook, SuccessHook, WatchOptions};
pub use placeholder::NotStartedWatcher;
pub use status::WatchStatus;
pub use value::ValueWatcher;
pub use watch::Watch;
pub use watcher::Watcher;
