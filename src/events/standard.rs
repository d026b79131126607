//! # Standard event kinds for application loops.
//!
//! - [`Tick`]: trigger raised once per iteration of an application-level loop.
//! - [`Quit`]: asks an application-level loop to stop.

use std::sync::Arc;
use std::time::Instant;

use super::Event;

/// Event raised by an application-level event loop.
///
/// `Tick` is a trigger: every pending queue is drained right after the tick
/// listeners ran.
#[derive(Clone, Debug)]
pub struct Tick {
    /// Loop iteration counter (starting from 0).
    pub frame: u64,
    /// When the tick was created.
    pub at: Instant,
}

impl Tick {
    /// Creates a tick for the given loop iteration.
    pub fn new(frame: u64) -> Self {
        Self {
            frame,
            at: Instant::now(),
        }
    }
}

impl Default for Tick {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Event for Tick {
    const TRIGGER: bool = true;
}

/// Event raised to quit an application-level event loop.
#[derive(Clone, Debug, Default)]
pub struct Quit {
    /// Optional human-readable reason.
    pub reason: Option<Arc<str>>,
}

impl Quit {
    /// Creates a quit request without a reason.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

impl Event for Quit {}
