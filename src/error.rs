//! Error types used by the dispatch core and its listeners.
//!
//! This module defines two main error enums:
//!
//! - [`RegistrationError`] — errors raised while binding listeners to event kinds.
//! - [`DispatchError`] — errors raised while delivering or queuing events.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.
//! Listener failures are boxed as [`BoxError`] and wrapped with the failing
//! listener and event kind before reaching the caller.

use thiserror::Error;

/// Boxed error returned by a failing listener.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// # Errors produced while registering listeners.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// The same (owner, event kind, handler) triple is already subscribed and
    /// the manager is configured with [`DuplicatePolicy::Reject`](crate::DuplicatePolicy::Reject).
    #[error("listener {listener} is already subscribed to {event}")]
    Duplicate {
        /// Event kind name.
        event: &'static str,
        /// Listener label (`Owner::handler`).
        listener: String,
    },

    /// The owner was dropped before its listener could be bound.
    #[error("owner of {listener} was dropped before binding to {event}")]
    OwnerDropped {
        /// Event kind name.
        event: &'static str,
        /// Listener label (`Owner::handler`).
        listener: String,
    },
}

impl RegistrationError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use evbus::RegistrationError;
    ///
    /// let err = RegistrationError::Duplicate { event: "Tick", listener: "App::on_tick".into() };
    /// assert_eq!(err.as_label(), "registration_duplicate");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RegistrationError::Duplicate { .. } => "registration_duplicate",
            RegistrationError::OwnerDropped { .. } => "registration_owner_dropped",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RegistrationError::Duplicate { event, listener } => {
                format!("duplicate: listener={listener} event={event}")
            }
            RegistrationError::OwnerDropped { event, listener } => {
                format!("owner dropped: listener={listener} event={event}")
            }
        }
    }
}

/// # Errors produced while delivering events.
///
/// A failing listener stops the current dispatch pass; listeners after it are
/// not invoked. During a queue drain the remaining queued events stay queued
/// for the next cycle.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A listener returned an error.
    #[error("listener {listener} failed on {event}: {source}")]
    ListenerFailed {
        /// Event kind name.
        event: &'static str,
        /// Listener label.
        listener: String,
        /// The error returned by the listener.
        #[source]
        source: BoxError,
    },

    /// A listener panicked (only reported when `Config::catch_panics` is set).
    #[error("listener {listener} panicked on {event}: {info}")]
    ListenerPanicked {
        /// Event kind name.
        event: &'static str,
        /// Listener label.
        listener: String,
        /// Panic payload rendered as text.
        info: String,
    },

    /// The pending queue of the kind reached `Config::queue_capacity`.
    #[error("queue of {event} is full (capacity {capacity})")]
    QueueFull {
        /// Event kind name.
        event: &'static str,
        /// The configured capacity.
        capacity: usize,
    },
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use evbus::DispatchError;
    ///
    /// let err = DispatchError::QueueFull { event: "Quit", capacity: 8 };
    /// assert_eq!(err.as_label(), "dispatch_queue_full");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::ListenerFailed { .. } => "dispatch_listener_failed",
            DispatchError::ListenerPanicked { .. } => "dispatch_listener_panicked",
            DispatchError::QueueFull { .. } => "dispatch_queue_full",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DispatchError::ListenerFailed {
                event,
                listener,
                source,
            } => format!("failed: listener={listener} event={event} error={source}"),
            DispatchError::ListenerPanicked {
                event,
                listener,
                info,
            } => format!("panicked: listener={listener} event={event} info={info}"),
            DispatchError::QueueFull { event, capacity } => {
                format!("queue full: event={event} capacity={capacity}")
            }
        }
    }

    /// Name of the event kind the failure happened on.
    pub fn event(&self) -> &'static str {
        match self {
            DispatchError::ListenerFailed { event, .. }
            | DispatchError::ListenerPanicked { event, .. }
            | DispatchError::QueueFull { event, .. } => event,
        }
    }

    /// Label of the failing listener, if a listener caused the failure.
    pub fn listener(&self) -> Option<&str> {
        match self {
            DispatchError::ListenerFailed { listener, .. }
            | DispatchError::ListenerPanicked { listener, .. } => Some(listener),
            DispatchError::QueueFull { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listener_failed_keeps_source() {
        let err = DispatchError::ListenerFailed {
            event: "Tick",
            listener: "App::on_tick".into(),
            source: "boom".into(),
        };
        assert_eq!(err.event(), "Tick");
        assert_eq!(err.listener(), Some("App::on_tick"));
        assert_eq!(
            std::error::Error::source(&err).map(|s| s.to_string()),
            Some("boom".to_string())
        );
        assert_eq!(err.to_string(), "listener App::on_tick failed on Tick: boom");
    }

    #[test]
    fn test_queue_full_has_no_listener() {
        let err = DispatchError::QueueFull {
            event: "Quit",
            capacity: 2,
        };
        assert_eq!(err.listener(), None);
        assert_eq!(err.as_message(), "queue full: event=Quit capacity=2");
    }

    #[test]
    fn test_registration_labels() {
        let dup = RegistrationError::Duplicate {
            event: "Tick",
            listener: "A::b".into(),
        };
        let gone = RegistrationError::OwnerDropped {
            event: "Tick",
            listener: "A::b".into(),
        };
        assert_eq!(dup.as_label(), "registration_duplicate");
        assert_eq!(gone.as_label(), "registration_owner_dropped");
        assert_eq!(gone.as_message(), "owner dropped: listener=A::b event=Tick");
    }
}
