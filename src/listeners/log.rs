//! # LogWriter — event tracer
//!
//! A minimal listener that reports delivered events through `tracing`.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! INFO evbus::listeners::log: [tick] frame=12
//! INFO evbus::listeners::log: [quit] reason=Some("user")
//! INFO evbus::listeners::log: [event] kind="Saved" payload=Saved { path: "a.txt" }
//! ```

use std::fmt::Debug;

use crate::core::EventManager;
use crate::events::{Event, Quit, Tick};
use crate::listeners::ListenerId;

/// Event writer listener.
///
/// Attach it to trace the standard kinds, or call [`LogWriter::watch`] for
/// any other kind implementing `Debug`.
#[derive(Default, Debug)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Subscribes a tracing listener for kind `E`.
    pub fn watch<E: Event + Debug>(manager: &EventManager) -> ListenerId {
        manager.subscribe(|ev: &E| {
            tracing::info!(kind = E::name(), payload = ?ev, "[event]");
        })
    }

    fn on_tick(&self, tick: &Tick) {
        tracing::info!(frame = tick.frame, "[tick]");
    }

    fn on_quit(&self, quit: &Quit) {
        tracing::info!(reason = ?quit.reason, "[quit]");
    }
}

crate::listener_table! {
    LogWriter {
        Tick => on_tick,
        Quit => on_quit,
    }
}
