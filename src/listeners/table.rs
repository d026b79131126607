//! # Listener tables: declarative method-to-kind bindings.
//!
//! A [`ListenerTable<T>`] records, once per owner type, which methods of `T`
//! handle which event kinds. Building a table subscribes nothing; applying it
//! to an owner (see [`EventManager::attach`](crate::EventManager::attach))
//! binds every recorded method to that owner.
//!
//! ## Example
//! ```rust
//! use std::cell::Cell;
//! use evbus::{EventManager, ListenerTable, Quit, Tick};
//!
//! struct Game { frames: Cell<u64>, running: Cell<bool> }
//!
//! impl Game {
//!     fn on_tick(&self, tick: &Tick) { self.frames.set(tick.frame); }
//!     fn on_quit(&self, _: &Quit) { self.running.set(false); }
//! }
//!
//! let table = ListenerTable::<Game>::builder()
//!     .on("on_tick", Game::on_tick)
//!     .on("on_quit", Game::on_quit)
//!     .build();
//! assert_eq!(table.len(), 2);
//!
//! let manager = EventManager::default();
//! let game = std::rc::Rc::new(Game { frames: Cell::new(0), running: Cell::new(true) });
//! let game = manager.attach_with(game, &table).unwrap();
//!
//! manager.send(Tick::new(7)).unwrap();
//! assert_eq!(game.frames.get(), 7);
//! ```

use std::fmt;
use std::rc::{Rc, Weak};

use crate::core::Registry;
use crate::error::RegistrationError;
use crate::events::{Event, EventKey};

use super::{HandlerOutcome, ListenerId};

type BindFn<T> =
    Box<dyn Fn(&Registry, &Weak<T>) -> Result<(ListenerId, bool), RegistrationError> + Send + Sync>;

/// One recorded (event kind, method) pair.
struct Binding<T> {
    event: EventKey,
    handler: &'static str,
    bind: BindFn<T>,
}

/// Per-type table of methods bound to event kinds.
///
/// Tables hold only function pointers and are `Send + Sync`, so they can live
/// in a `static` (see [`listener_table!`](crate::listener_table)).
pub struct ListenerTable<T> {
    bindings: Vec<Binding<T>>,
}

impl<T: 'static> ListenerTable<T> {
    /// Starts an empty table.
    pub fn builder() -> ListenerTableBuilder<T> {
        ListenerTableBuilder {
            bindings: Vec::new(),
        }
    }

    /// Number of recorded bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// True if no binding is recorded.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Recorded (event kind, method name) pairs, in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (EventKey, &'static str)> + '_ {
        self.bindings.iter().map(|b| (b.event, b.handler))
    }

    /// Binds every recorded method of `owner`, in declaration order.
    ///
    /// Returns the bindings created by this call; bindings that already
    /// existed (ignored duplicates) are not included. On error every binding
    /// created by this call is removed again.
    pub(crate) fn apply(
        &self,
        registry: &Registry,
        owner: &Rc<T>,
    ) -> Result<Vec<(EventKey, ListenerId)>, RegistrationError> {
        let weak = Rc::downgrade(owner);
        let mut created = Vec::with_capacity(self.bindings.len());

        for binding in &self.bindings {
            match (binding.bind)(registry, &weak) {
                Ok((id, true)) => created.push((binding.event, id)),
                Ok((_, false)) => {}
                Err(err) => {
                    for (event, id) in &created {
                        registry.unsubscribe_key(event, *id);
                    }
                    return Err(err);
                }
            }
        }
        Ok(created)
    }
}

impl<T> fmt::Debug for ListenerTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.bindings.iter().map(|b| (b.event.name(), b.handler)))
            .finish()
    }
}

/// Builder for [`ListenerTable`].
pub struct ListenerTableBuilder<T> {
    bindings: Vec<Binding<T>>,
}

impl<T: 'static> ListenerTableBuilder<T> {
    /// Records `method` as the handler of kind `E`.
    ///
    /// `handler` is the method name; it labels the listener in errors and
    /// identifies the binding for duplicate detection.
    pub fn on<E, R>(mut self, handler: &'static str, method: fn(&T, &E) -> R) -> Self
    where
        E: Event,
        R: HandlerOutcome + 'static,
    {
        self.bindings.push(Binding {
            event: EventKey::of::<E>(),
            handler,
            bind: Box::new(move |registry: &Registry, owner: &Weak<T>| {
                registry
                    .bind(owner, handler, method)
                    .map(|bound| (bound.id, bound.fresh))
            }),
        });
        self
    }

    /// Finishes the table.
    pub fn build(self) -> ListenerTable<T> {
        ListenerTable {
            bindings: self.bindings,
        }
    }
}
