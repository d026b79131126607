//! # Manager configuration.
//!
//! Provides [`Config`] centralized settings for an [`EventManager`](crate::EventManager).
//!
//! ## Sentinel values
//! - `queue_capacity = 0` → unbounded pending queues

/// What subscribing an already-bound (owner, event kind, handler) triple does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Keep the existing subscription and return its id.
    #[default]
    Ignore,
    /// Fail with [`RegistrationError::Duplicate`](crate::RegistrationError::Duplicate).
    Reject,
}

/// Configuration of one event manager.
///
/// ## Field semantics
/// - `duplicate_policy`: handling of repeated owner-bound subscriptions
/// - `queue_capacity`: maximum pending events per kind (`0` = unbounded)
/// - `catch_panics`: report listener panics as errors instead of unwinding
///
/// ## Notes
/// All fields are public. Prefer the helper accessors over checking the `0`
/// sentinel directly.
#[derive(Clone, Debug)]
pub struct Config {
    /// Policy for repeated (owner, event kind, handler) subscriptions.
    ///
    /// Free closures are never considered duplicates; each call to
    /// `subscribe` creates a new listener.
    pub duplicate_policy: DuplicatePolicy,

    /// Maximum number of pending events per kind.
    ///
    /// - `0` = unbounded
    /// - `n > 0` = `queue` fails with `DispatchError::QueueFull` once `n`
    ///   events of that kind are pending
    pub queue_capacity: usize,

    /// Converts a panicking listener into `DispatchError::ListenerPanicked`.
    ///
    /// When `false` the panic unwinds through `send`/`process_queues`.
    pub catch_panics: bool,
}

impl Config {
    /// Returns the per-kind queue limit as an `Option`.
    ///
    /// - `None` → unbounded
    /// - `Some(n)` → at most `n` pending events per kind
    #[inline]
    pub fn queue_limit(&self) -> Option<usize> {
        if self.queue_capacity == 0 {
            None
        } else {
            Some(self.queue_capacity)
        }
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `duplicate_policy = DuplicatePolicy::Ignore` (idempotent subscribe)
    /// - `queue_capacity = 0` (unbounded)
    /// - `catch_panics = false` (panics unwind to the caller)
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::default(),
            queue_capacity: 0,
            catch_panics: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity_is_unbounded() {
        let cfg = Config::default();
        assert_eq!(cfg.queue_limit(), None);

        let cfg = Config {
            queue_capacity: 4,
            ..Config::default()
        };
        assert_eq!(cfg.queue_limit(), Some(4));
    }

    #[test]
    fn test_default_policy_is_idempotent() {
        assert_eq!(Config::default().duplicate_policy, DuplicatePolicy::Ignore);
        assert!(!Config::default().catch_panics);
    }
}
