//! # EventManager - the public dispatch facade.
//!
//! [`EventManager`] is a cheap, cloneable handle over one registry of event
//! kinds. Every clone shares the same listeners and queues; separate
//! managers are fully isolated from each other.
//!
//! ## Architecture
//! ```text
//! application ──► EventManager ──► Registry ──► Channel<Tick>  (listeners, pending)
//!                 (clone = handle)             ├► Channel<Quit>
//!                                              └► Channel<...>
//!
//! EventManager::global() ──► thread-local default manager
//!                            (used by EventExt: `Tick::new(0).send()`)
//! ```
//!
//! ## Threading
//! The core is single-threaded: a manager is neither `Send` nor `Sync`, and
//! every delivery runs synchronously on the calling thread. The default
//! manager returned by [`EventManager::global`] is per thread.
//!
//! ## Example
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use evbus::{EventManager, Quit, Tick};
//!
//! let manager = EventManager::default();
//! let quits = Rc::new(Cell::new(0));
//!
//! let q = Rc::clone(&quits);
//! manager.subscribe(move |_: &Quit| q.set(q.get() + 1));
//!
//! manager.queue(Quit::new()).unwrap();
//! assert_eq!(quits.get(), 0);
//!
//! // Tick is a trigger: it drains the queue.
//! manager.send(Tick::new(1)).unwrap();
//! assert_eq!(quits.get(), 1);
//! ```

use std::rc::{Rc, Weak};

use super::config::Config;
use super::registry::Registry;
use crate::error::{DispatchError, RegistrationError};
use crate::events::{Event, EventKey};
use crate::listeners::{Attached, HandlerOutcome, Listener, ListenerId, ListenerTable};

thread_local! {
    static GLOBAL: EventManager = EventManager::default();
}

/// Facade over one registry of event kinds.
#[derive(Clone)]
pub struct EventManager {
    registry: Rc<Registry>,
}

impl EventManager {
    /// Creates a manager with its own, empty registry.
    pub fn new(config: Config) -> Self {
        Self {
            registry: Rc::new(Registry::new(config)),
        }
    }

    /// Returns the default manager of the current thread.
    ///
    /// All calls on the same thread return handles to the same registry.
    pub fn global() -> Self {
        GLOBAL.with(EventManager::clone)
    }

    /// Configuration this manager was created with.
    pub fn config(&self) -> &Config {
        self.registry.config()
    }

    /// Subscribes a free listener to kind `E`.
    ///
    /// Listeners run in subscription order. Each call creates a new
    /// listener, even for an equivalent closure.
    pub fn subscribe<E, F, R>(&self, listener: F) -> ListenerId
    where
        E: Event,
        F: Fn(&E) -> R + 'static,
        R: HandlerOutcome + 'static,
    {
        self.registry.subscribe(listener)
    }

    /// Binds one method of a shared owner to kind `E`.
    ///
    /// The listener keeps `owner` weakly: once the owner is dropped the
    /// listener is skipped and removed. `handler` names the method and
    /// identifies the binding for duplicate detection.
    ///
    /// # Errors
    /// - [`RegistrationError::OwnerDropped`] if `owner` is already gone.
    /// - [`RegistrationError::Duplicate`] if the binding exists and the
    ///   manager uses [`DuplicatePolicy::Reject`](crate::DuplicatePolicy::Reject).
    pub fn bind<T, E, R>(
        &self,
        owner: &Weak<T>,
        handler: &'static str,
        method: fn(&T, &E) -> R,
    ) -> Result<ListenerId, RegistrationError>
    where
        T: 'static,
        E: Event,
        R: HandlerOutcome + 'static,
    {
        self.registry
            .bind(owner, handler, method)
            .map(|bound| bound.id)
    }

    /// Removes a listener from kind `E`; returns `false` if it was absent.
    pub fn unsubscribe<E: Event>(&self, id: ListenerId) -> bool {
        self.registry.unsubscribe::<E>(id)
    }

    /// Delivers `event` immediately to every listener of `E`.
    ///
    /// When `E` is a trigger, every pending queue is drained afterwards.
    ///
    /// # Errors
    /// The first failing listener stops the pass and its error is returned;
    /// listeners after it are not invoked.
    pub fn send<E: Event>(&self, event: E) -> Result<(), DispatchError> {
        self.registry.send(event)
    }

    /// Appends `event` to the pending queue of `E` without invoking listeners.
    ///
    /// # Errors
    /// [`DispatchError::QueueFull`] when `Config::queue_capacity` is reached.
    pub fn queue<E: Event>(&self, event: E) -> Result<(), DispatchError> {
        self.registry.queue(event)
    }

    /// Drains every pending queue without sending a trigger.
    ///
    /// Returns the number of events delivered. Events queued while draining
    /// are kept for the next call.
    pub fn process_queues(&self) -> Result<usize, DispatchError> {
        self.registry.process_queues()
    }

    /// Forgets every kind, listener and pending event of this manager.
    pub fn reset(&self) {
        self.registry.reset();
    }

    /// Moves `value` into shared ownership and subscribes its listener table.
    pub fn attach<T: Listener>(&self, value: T) -> Result<Attached<T>, RegistrationError> {
        self.attach_rc(Rc::new(value))
    }

    /// Subscribes the listener table of an already shared object.
    pub fn attach_rc<T: Listener>(&self, owner: Rc<T>) -> Result<Attached<T>, RegistrationError> {
        self.attach_with(owner, T::listener_table())
    }

    /// Subscribes `table` for `owner`, without requiring `T: Listener`.
    ///
    /// On failure, bindings created by this call are rolled back.
    pub fn attach_with<T: 'static>(
        &self,
        owner: Rc<T>,
        table: &ListenerTable<T>,
    ) -> Result<Attached<T>, RegistrationError> {
        let bindings = table.apply(&self.registry, &owner)?;
        Ok(Attached::new(owner, bindings, Rc::downgrade(&self.registry)))
    }

    /// Snapshot of the listener ids of `E`, in delivery order.
    pub fn listeners_of<E: Event>(&self) -> Vec<ListenerId> {
        self.registry.listeners_of::<E>()
    }

    /// Number of pending events of `E`.
    pub fn pending<E: Event>(&self) -> usize {
        self.registry.pending::<E>()
    }

    /// Number of listeners of `E`.
    pub fn listener_count<E: Event>(&self) -> usize {
        self.registry.listener_count::<E>()
    }

    /// Referenced kinds, in the order their queues are drained.
    pub fn event_types(&self) -> Vec<EventKey> {
        self.registry.event_types()
    }

    /// True if both handles share the same registry.
    pub fn same_registry(&self, other: &EventManager) -> bool {
        Rc::ptr_eq(&self.registry, &other.registry)
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl std::fmt::Debug for EventManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventManager")
            .field("config", self.config())
            .field("event_types", &self.event_types())
            .finish()
    }
}
