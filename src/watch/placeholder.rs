//! # Stateless "no observer yet" placeholder.
//!
//! [`NotStartedWatcher`] implements the full [`Watch`] surface as a
//! permanent not-started observer. Call sites that need a default observer
//! before a real one exists hold `Arc<dyn Watch>` and seed it with this
//! value instead of special-casing an `Option`.
//!
//! ## Rules
//! - Query operations report the not-started defaults.
//! - Every mutating operation fails with [`WatchError::Placeholder`].
//! - [`wait`](Watch::wait) pends forever: the placeholder never starts, so
//!   it never completes.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{TaskError, WatchError};
use crate::watch::status::WatchStatus;
use crate::watch::watch::Watch;

/// Singleton-style placeholder observer; stateless and zero-sized.
///
/// ## Example
/// ```rust
/// use taskwatch::{NotStartedWatcher, Watch};
///
/// let slot: std::sync::Arc<dyn Watch> = NotStartedWatcher::arc();
/// assert!(slot.is_not_started());
/// assert!(slot.start().is_err());
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct NotStartedWatcher;

impl NotStartedWatcher {
    /// Returns the placeholder as a shared trait object.
    pub fn arc() -> Arc<dyn Watch> {
        Arc::new(NotStartedWatcher)
    }
}

#[async_trait]
impl Watch for NotStartedWatcher {
    fn name(&self) -> Option<&str> {
        None
    }

    fn status(&self) -> WatchStatus {
        WatchStatus::NotStarted
    }

    fn error(&self) -> Option<Arc<TaskError>> {
        None
    }

    fn start(&self) -> Result<(), WatchError> {
        Err(WatchError::Placeholder { op: "start" })
    }

    fn cancel_callbacks(&self) -> Result<(), WatchError> {
        Err(WatchError::Placeholder { op: "cancel_callbacks" })
    }

    async fn wait(&self) {
        std::future::pending::<()>().await
    }
}
