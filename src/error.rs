//! Error types used by the taskwatch observer and wrapped tasks.
//!
//! This module defines two main error enums:
//!
//! - [`TaskError`] — terminal errors produced by the wrapped unit of work.
//! - [`WatchError`] — misuse of the observation API itself.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for
//! logging/metrics. [`TaskError`] additionally exposes [`TaskError::detail`]
//! (the inner message, without the variant prefix) and
//! [`TaskError::is_cancellation`].

use std::any::Any;

use thiserror::Error;

/// # Errors produced by the wrapped unit of work.
///
/// A watched future resolves to `Result<T, TaskError>`. Returning
/// [`TaskError::Canceled`] marks a cooperative cancellation; any other
/// variant is a fault. Panics inside the wrapped work (or its factory)
/// are caught by the observer and surface as [`TaskError::Panicked`].
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TaskError {
    /// Task execution failed with an application error.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Task (or its deferred factory) panicked; the payload was caught.
    #[error("task panicked: {error}")]
    Panicked {
        /// Panic payload rendered as a string.
        error: String,
    },

    /// Task was cancelled before producing a value.
    #[error("task has been canceled")]
    Canceled,
}

impl TaskError {
    /// Convenience constructor for [`TaskError::Fail`].
    ///
    /// # Example
    /// ```
    /// use taskwatch::TaskError;
    ///
    /// let err = TaskError::fail("boom");
    /// assert_eq!(err.detail(), Some("boom"));
    /// ```
    pub fn fail(error: impl Into<String>) -> Self {
        TaskError::Fail { error: error.into() }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskwatch::TaskError;
    ///
    /// assert_eq!(TaskError::Canceled.as_label(), "task_canceled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Panicked { .. } => "task_panicked",
            TaskError::Canceled => "task_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Fail { error } => format!("error: {error}"),
            TaskError::Panicked { error } => format!("panic: {error}"),
            TaskError::Canceled => "task has been canceled".to_string(),
        }
    }

    /// Returns the inner message without the variant prefix, if any.
    ///
    /// `None` for [`TaskError::Canceled`], which carries no payload.
    pub fn detail(&self) -> Option<&str> {
        match self {
            TaskError::Fail { error } | TaskError::Panicked { error } => Some(error),
            TaskError::Canceled => None,
        }
    }

    /// Returns `true` for the cancellation variant.
    ///
    /// The observer uses this to classify terminal state; everything else
    /// becomes a fault.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, TaskError::Canceled)
    }
}

/// # Errors produced by the observation API.
///
/// Real observers never fail their mutating operations; only the
/// [`NotStartedWatcher`](crate::NotStartedWatcher) placeholder does, by
/// definition.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum WatchError {
    /// A mutating operation was invoked on the stateless placeholder.
    #[error("placeholder observer does not support `{op}`")]
    Placeholder {
        /// Name of the rejected operation (e.g. `"start"`).
        op: &'static str,
    },
}

impl WatchError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            WatchError::Placeholder { .. } => "watch_placeholder",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            WatchError::Placeholder { op } => {
                format!("placeholder observer rejected `{op}`")
            }
        }
    }
}

/// Renders a caught panic payload as a string.
///
/// Downcasts the common payload shapes (`&'static str`, `String`) and falls
/// back to a fixed message otherwise.
pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fail_keeps_inner_message() {
        let err = TaskError::fail("Fault");
        assert_eq!(err.detail(), Some("Fault"));
        assert_eq!(err.as_message(), "error: Fault");
        assert!(!err.is_cancellation());
    }

    #[test]
    fn canceled_has_no_detail() {
        assert_eq!(TaskError::Canceled.detail(), None);
        assert!(TaskError::Canceled.is_cancellation());
    }

    #[test]
    fn labels_are_stable() {
        assert_eq!(TaskError::fail("x").as_label(), "task_failed");
        assert_eq!(
            TaskError::Panicked { error: "x".into() }.as_label(),
            "task_panicked"
        );
        assert_eq!(
            WatchError::Placeholder { op: "start" }.as_label(),
            "watch_placeholder"
        );
    }

    #[test]
    fn panic_message_downcasts_common_payloads() {
        assert_eq!(panic_message(Box::new("static")), "static");
        assert_eq!(panic_message(Box::new(String::from("owned"))), "owned");
        assert_eq!(panic_message(Box::new(42_u8)), "unknown panic");
    }
}
