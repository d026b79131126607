//! Listener identity and handler return values.

use std::fmt;

use crate::error::BoxError;

/// Identifier of a subscribed listener, unique within one manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

impl ListenerId {
    /// Raw numeric value (allocation order).
    #[inline]
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// Return value of a listener.
///
/// Implemented for `()` (infallible listeners) and for `Result<(), E>` where
/// `E` converts into [`BoxError`]. An `Err` stops the current dispatch pass
/// and reaches the caller as [`DispatchError::ListenerFailed`](crate::DispatchError::ListenerFailed).
pub trait HandlerOutcome {
    /// Converts the value into the dispatch result.
    fn into_result(self) -> Result<(), BoxError>;
}

impl HandlerOutcome for () {
    #[inline]
    fn into_result(self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl<E: Into<BoxError>> HandlerOutcome for Result<(), E> {
    #[inline]
    fn into_result(self) -> Result<(), BoxError> {
        self.map_err(Into::into)
    }
}
