//! # Declarative listener registration.
//!
//! Owners declare which of their methods handle which event kinds in a
//! [`ListenerTable`]; attaching an owner to a manager subscribes every
//! declared method, bound to that owner.
//!
//! ## Architecture
//! ```text
//! type definition:   listener_table! { App { Tick => on_tick, Quit => on_quit } }
//!                          │  (built once, cached in a static)
//!                          ▼
//!                    ListenerTable<App>  [(Tick, "on_tick"), (Quit, "on_quit")]
//!                          │
//! construction:      manager.attach(App::new())
//!                          ├──► bind(Weak<App>, on_tick) ──► Channel<Tick>
//!                          └──► bind(Weak<App>, on_quit) ──► Channel<Quit>
//!                          ▼
//!                    Attached<App>  (dispose / drop → unsubscribe all)
//! ```
//!
//! Two equivalent forms:
//! - **Capability**: implement [`Listener`] (via [`listener_table!`](crate::listener_table))
//!   and call [`EventManager::attach`](crate::EventManager::attach).
//! - **External table**: build a [`ListenerTable`] for any type and call
//!   [`EventManager::attach_with`](crate::EventManager::attach_with).

mod attached;
mod handler;
mod listener;
#[cfg(feature = "logging")]
mod log;
mod table;

pub use attached::Attached;
pub use handler::{HandlerOutcome, ListenerId};
pub use listener::Listener;
#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use table::{ListenerTable, ListenerTableBuilder};
