//! # evbus
//!
//! **evbus** is a small, single-threaded publish/subscribe core for
//! event-driven applications such as game loops, console tools and
//! simulations.
//!
//! Every event kind is a Rust type. Each kind owns an ordered list of
//! listeners and a FIFO queue of pending events. Events are either **sent**
//! (delivered immediately) or **queued** (delivered when the queues are
//! drained). Sending a **trigger** kind, such as [`Tick`], drains every queue.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  Controller  │   │ Application  │   │   closure    │
//!     │(Listener impl│   │(Listener impl│   │ (subscribe)  │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼ attach           ▼ attach           ▼ subscribe
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  EventManager (facade, cloneable handle)                          │
//! │  - Registry (one channel per kind, first-reference order)         │
//! │  - Config (duplicate policy, queue capacity, panic handling)      │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!  │Channel<Tick> │   │Channel<Quit> │   │ Channel<...> │
//!  │ listeners [] │   │ listeners [] │   │ listeners [] │
//!  │ pending   [] │   │ pending   [] │   │ pending   [] │
//!  └──────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! ### Delivery
//! ```text
//! send(ev) ──► snapshot listeners of kind ──► call each in subscription order
//!                 │                               └─ Err ─► stop, return DispatchError
//!                 └─ kind is trigger? ──► process_queues()
//!
//! queue(ev) ──► pending.push_back(ev)         (no listener runs)
//!
//! process_queues()
//!   ├─► phase 1: take every pending queue, kinds in first-reference order
//!   ├─► phase 2: deliver oldest first, kind by kind
//!   │       └─ Err ─► undelivered events return to the front of their queues
//!   └─► events queued meanwhile wait for the next drain
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                         |
//! |-------------------|---------------------------------------------------------------|--------------------------------------------|
//! | **Events**        | Event kinds, trigger kinds, standard loop events.             | [`Event`], [`EventExt`], [`Tick`], [`Quit`] |
//! | **Dispatch**      | Send, queue, drain, reset; isolated or thread-default managers.| [`EventManager`]                           |
//! | **Registration**  | Declarative method bindings attached per instance.            | [`Listener`], [`ListenerTable`], [`Attached`] |
//! | **Errors**        | Typed registration and dispatch errors.                       | [`RegistrationError`], [`DispatchError`]   |
//! | **Configuration** | Duplicate policy, queue capacity, panic handling.             | [`Config`], [`DuplicatePolicy`]            |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::cell::Cell;
//! use evbus::{listener_table, EventManager, Quit, Tick};
//!
//! struct App { running: Cell<bool>, frames: Cell<u64> }
//!
//! impl App {
//!     fn on_tick(&self, tick: &Tick) { self.frames.set(tick.frame); }
//!     fn on_quit(&self, _: &Quit) { self.running.set(false); }
//! }
//!
//! listener_table! {
//!     App {
//!         Tick => on_tick,
//!         Quit => on_quit,
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = EventManager::default();
//!     let app = manager.attach(App { running: Cell::new(true), frames: Cell::new(0) })?;
//!
//!     let mut frame = 0;
//!     while app.running.get() {
//!         frame += 1;
//!         if frame == 3 {
//!             // Delivered by this frame's tick, right after `on_tick`.
//!             manager.queue(Quit::new().with_reason("done"))?;
//!         }
//!         manager.send(Tick::new(frame))?;
//!     }
//!
//!     assert_eq!(app.frames.get(), 3);
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod listeners;

// ---- Public re-exports ----

pub use crate::core::{Config, DuplicatePolicy, EventManager};
pub use error::{BoxError, DispatchError, RegistrationError};
pub use events::{Event, EventExt, EventKey, Quit, Tick};
pub use listeners::{
    Attached, HandlerOutcome, Listener, ListenerId, ListenerTable, ListenerTableBuilder,
};

// Optional: expose a simple built-in tracing listener (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use listeners::LogWriter;
