//! # Observed task status.
//!
//! [`WatchStatus`] is the derived, user-facing classification of a watched
//! task. It is never stored: observers keep the raw terminal outcome and
//! compute the status on demand, folding in the effective
//! cancellation-reclassification flag (instance override first, global
//! default otherwise).
//!
//! ```text
//! NotStarted ──► Running ──┬──► Succeeded
//!                          ├──► Faulted      (error, panic, or reclassified cancel)
//!                          └──► Canceled     (cancel, reclassification off)
//! ```

/// Derived status of a watched task.
///
/// Exactly one terminal variant holds once the task completes; before that
/// the status is [`NotStarted`](WatchStatus::NotStarted) or
/// [`Running`](WatchStatus::Running).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchStatus {
    /// Observation has not begun (cold observer before `start`).
    NotStarted,
    /// Observation is in flight; no terminal state yet.
    Running,
    /// The task completed without error or cancellation.
    Succeeded,
    /// The task failed, panicked, or was cancelled under reclassification.
    Faulted,
    /// The task was cancelled and reclassification is off.
    Canceled,
}

impl WatchStatus {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskwatch::WatchStatus;
    ///
    /// assert_eq!(WatchStatus::Succeeded.as_label(), "succeeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            WatchStatus::NotStarted => "not_started",
            WatchStatus::Running => "running",
            WatchStatus::Succeeded => "succeeded",
            WatchStatus::Faulted => "faulted",
            WatchStatus::Canceled => "canceled",
        }
    }

    /// Returns `true` once a terminal state has been reached.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WatchStatus::Succeeded | WatchStatus::Faulted | WatchStatus::Canceled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_classification() {
        assert!(!WatchStatus::NotStarted.is_terminal());
        assert!(!WatchStatus::Running.is_terminal());
        assert!(WatchStatus::Succeeded.is_terminal());
        assert!(WatchStatus::Faulted.is_terminal());
        assert!(WatchStatus::Canceled.is_terminal());
    }
}
