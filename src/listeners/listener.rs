//! # Listener capability.
//!
//! A type implementing [`Listener`] owns a static [`ListenerTable`] and can be
//! attached to a manager in one call: every recorded method is subscribed,
//! bound to that instance.
//!
//! ## Example
//! ```rust
//! use std::cell::Cell;
//! use evbus::{listener_table, EventManager, Quit, Tick};
//!
//! struct Clock { frame: Cell<u64> }
//!
//! impl Clock {
//!     fn on_tick(&self, tick: &Tick) { self.frame.set(tick.frame); }
//! }
//!
//! listener_table! {
//!     Clock {
//!         Tick => on_tick,
//!     }
//! }
//!
//! let manager = EventManager::default();
//! let a = manager.attach(Clock { frame: Cell::new(0) }).unwrap();
//! let b = manager.attach(Clock { frame: Cell::new(0) }).unwrap();
//!
//! manager.send(Tick::new(4)).unwrap();
//! assert_eq!((a.frame.get(), b.frame.get()), (4, 4));
//! ```

use super::ListenerTable;

/// Types whose methods subscribe themselves when attached to a manager.
///
/// Usually implemented through [`listener_table!`](crate::listener_table).
pub trait Listener: Sized + 'static {
    /// The per-type table, built once.
    fn listener_table() -> &'static ListenerTable<Self>;
}

/// Implements [`Listener`] for a non-generic type from a list of
/// `EventKind => method` pairs.
///
/// The table is built on first use and cached in a `static`.
///
/// ```rust
/// use evbus::{listener_table, Listener, Quit, Tick};
///
/// struct App;
///
/// impl App {
///     fn on_tick(&self, _: &Tick) {}
///     fn on_quit(&self, _: &Quit) -> Result<(), String> { Ok(()) }
/// }
///
/// listener_table! {
///     App {
///         Tick => on_tick,
///         Quit => on_quit,
///     }
/// }
///
/// assert_eq!(App::listener_table().len(), 2);
/// ```
#[macro_export]
macro_rules! listener_table {
    ($owner:ty { $($event:ty => $method:ident),* $(,)? }) => {
        impl $crate::Listener for $owner {
            fn listener_table() -> &'static $crate::ListenerTable<Self> {
                static TABLE: ::std::sync::OnceLock<$crate::ListenerTable<$owner>> =
                    ::std::sync::OnceLock::new();
                TABLE.get_or_init(|| {
                    $crate::ListenerTable::<$owner>::builder()
                        $(.on::<$event, _>(::core::stringify!($method), <$owner>::$method))*
                        .build()
                })
            }
        }
    };
}
