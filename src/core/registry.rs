//! # Registry - per-kind listener lists and pending queues.
//!
//! The registry owns one [`Channel`] per event kind, created lazily the first
//! time the kind is referenced (subscribe, bind, send or queue) and
//! kept until [`Registry::reset`].
//!
//! ## Architecture
//! ```text
//! send(E)  ──► Channel<E>.dispatch(snapshot of listeners)
//!                 └─► E::TRIGGER ? process_queues()
//!
//! queue(E) ──► Channel<E>.pending.push_back(E)
//!
//! process_queues():
//!   phase 1: take every pending queue (first-reference order of kinds)
//!   phase 2: deliver each batch oldest first
//!              └─► on failure: rest of the batch and later batches go
//!                  back in front of their queues
//! ```
//!
//! ## Rules
//! - Kinds are drained in the order they were first referenced.
//! - Events queued during a drain wait for the next drain.
//! - A drain requested while another drain is running is skipped (reports 0).
//! - Listener ids are never reused within one registry, even across `reset`.

use std::any::{Any, TypeId};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::{Rc, Weak};

use super::channel::{AnyChannel, Call, Channel, Owner, PendingBatch, Slot};
use super::config::{Config, DuplicatePolicy};
use crate::error::{DispatchError, RegistrationError};
use crate::events::{short_type_name, Event, EventKey};
use crate::listeners::{HandlerOutcome, ListenerId};

/// Stored channel: the typed handle for lookups and the erased one for drains.
struct Entry {
    typed: Rc<dyn Any>,
    erased: Rc<dyn AnyChannel>,
}

/// Result of binding an owner method.
pub(crate) struct Bound {
    pub(crate) id: ListenerId,
    /// `false` when an identical binding already existed.
    pub(crate) fresh: bool,
}

/// Listener lists and pending queues of every referenced event kind.
pub(crate) struct Registry {
    config: Config,
    entries: RefCell<Vec<Entry>>,
    index: RefCell<HashMap<TypeId, usize>>,
    next_id: Cell<u64>,
    draining: Cell<bool>,
}

impl Registry {
    pub(crate) fn new(config: Config) -> Self {
        Self {
            config,
            entries: RefCell::new(Vec::new()),
            index: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
            draining: Cell::new(false),
        }
    }

    pub(crate) fn config(&self) -> &Config {
        &self.config
    }

    fn lookup<E: Event>(&self) -> Option<Rc<Channel<E>>> {
        let pos = *self.index.borrow().get(&TypeId::of::<E>())?;
        let typed = Rc::clone(&self.entries.borrow().get(pos)?.typed);
        typed.downcast::<Channel<E>>().ok()
    }

    /// Returns the channel of `E`, creating it on first reference.
    fn channel<E: Event>(&self) -> Rc<Channel<E>> {
        if let Some(channel) = self.lookup::<E>() {
            return channel;
        }

        let channel = Rc::new(Channel::<E>::new());
        let mut entries = self.entries.borrow_mut();
        self.index
            .borrow_mut()
            .insert(TypeId::of::<E>(), entries.len());
        entries.push(Entry {
            typed: channel.clone(),
            erased: channel.clone(),
        });
        tracing::trace!(event = E::name(), trigger = E::TRIGGER, "event kind registered");
        channel
    }

    fn erased(&self, key: &EventKey) -> Option<Rc<dyn AnyChannel>> {
        let pos = *self.index.borrow().get(&key.id())?;
        self.entries
            .borrow()
            .get(pos)
            .map(|entry| Rc::clone(&entry.erased))
    }

    fn allocate_id(&self) -> ListenerId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        ListenerId(id)
    }

    /// Appends a free listener to the listeners of `E`.
    pub(crate) fn subscribe<E, F, R>(&self, listener: F) -> ListenerId
    where
        E: Event,
        F: Fn(&E) -> R + 'static,
        R: HandlerOutcome + 'static,
    {
        let id = self.allocate_id();
        let call: Call<E> = Box::new(move |event: &E| Some(listener(event).into_result()));
        self.channel::<E>().insert(Slot {
            id,
            label: id.to_string(),
            owner: None,
            call,
        });
        tracing::trace!(event = E::name(), %id, "listener subscribed");
        id
    }

    /// Binds `method` of `owner` to the listeners of `E`.
    ///
    /// The listener holds `owner` weakly. Repeating the same (owner, `E`,
    /// `handler`) binding follows [`Config::duplicate_policy`].
    pub(crate) fn bind<T, E, R>(
        &self,
        owner: &Weak<T>,
        handler: &'static str,
        method: fn(&T, &E) -> R,
    ) -> Result<Bound, RegistrationError>
    where
        T: 'static,
        E: Event,
        R: HandlerOutcome + 'static,
    {
        let label = format!("{}::{}", short_type_name::<T>(), handler);
        let Some(strong) = owner.upgrade() else {
            return Err(RegistrationError::OwnerDropped {
                event: E::name(),
                listener: label,
            });
        };

        let channel = self.channel::<E>();
        let addr = Rc::as_ptr(&strong) as *const ();
        if let Some(id) = channel.find_bound(addr, handler) {
            return match self.config.duplicate_policy {
                DuplicatePolicy::Ignore => {
                    tracing::trace!(event = E::name(), listener = %label, "duplicate binding ignored");
                    Ok(Bound { id, fresh: false })
                }
                DuplicatePolicy::Reject => Err(RegistrationError::Duplicate {
                    event: E::name(),
                    listener: label,
                }),
            };
        }

        let id = self.allocate_id();
        let object: Weak<dyn Any> = Rc::downgrade(&strong) as Weak<dyn Any>;
        let target = owner.clone();
        let call: Call<E> = Box::new(move |event: &E| {
            target
                .upgrade()
                .map(|owner| method(&owner, event).into_result())
        });
        channel.insert(Slot {
            id,
            label,
            owner: Some(Owner { object, handler }),
            call,
        });
        tracing::trace!(event = E::name(), %id, handler, "method bound");
        Ok(Bound { id, fresh: true })
    }

    /// Removes listener `id` from kind `key`; `false` if absent.
    pub(crate) fn unsubscribe_key(&self, key: &EventKey, id: ListenerId) -> bool {
        let removed = self
            .erased(key)
            .is_some_and(|channel| channel.remove_listener(id));
        if removed {
            tracing::trace!(event = key.name(), %id, "listener unsubscribed");
        }
        removed
    }

    pub(crate) fn unsubscribe<E: Event>(&self, id: ListenerId) -> bool {
        self.unsubscribe_key(&EventKey::of::<E>(), id)
    }

    /// Snapshot of the listener ids of `E`, in delivery order.
    ///
    /// Lookups never register the kind, so they do not affect drain order.
    pub(crate) fn listeners_of<E: Event>(&self) -> Vec<ListenerId> {
        self.lookup::<E>()
            .map(|channel| channel.listener_ids())
            .unwrap_or_default()
    }

    /// Number of pending events of `E`.
    pub(crate) fn pending<E: Event>(&self) -> usize {
        self.lookup::<E>()
            .map_or(0, |channel| channel.pending_count())
    }

    /// Number of listeners of `E`.
    pub(crate) fn listener_count<E: Event>(&self) -> usize {
        self.lookup::<E>()
            .map_or(0, |channel| channel.listener_count())
    }

    /// Referenced kinds in first-reference (drain) order.
    pub(crate) fn event_types(&self) -> Vec<EventKey> {
        self.entries
            .borrow()
            .iter()
            .map(|entry| entry.erased.key())
            .collect()
    }

    /// Delivers `event` to the listeners of `E`; drains every queue when `E`
    /// is a trigger.
    pub(crate) fn send<E: Event>(&self, event: E) -> Result<(), DispatchError> {
        let invoked = self
            .channel::<E>()
            .dispatch(&event, self.config.catch_panics)?;
        tracing::trace!(event = E::name(), invoked, "event sent");

        if E::TRIGGER {
            self.process_queues()?;
        }
        Ok(())
    }

    /// Appends `event` to the pending queue of `E`.
    pub(crate) fn queue<E: Event>(&self, event: E) -> Result<(), DispatchError> {
        self.channel::<E>()
            .push(event, self.config.queue_limit())?;
        tracing::trace!(event = E::name(), "event queued");
        Ok(())
    }

    /// Drains every pending queue once; returns the number of events delivered.
    pub(crate) fn process_queues(&self) -> Result<usize, DispatchError> {
        if self.draining.get() {
            tracing::trace!("drain already in progress; nested drain skipped");
            return Ok(0);
        }
        let _guard = DrainGuard::enter(&self.draining);

        let channels: Vec<Rc<dyn AnyChannel>> = self
            .entries
            .borrow()
            .iter()
            .map(|entry| Rc::clone(&entry.erased))
            .collect();
        let taken: VecDeque<_> = channels
            .into_iter()
            .filter_map(|channel| channel.take_batch())
            .collect();
        if taken.is_empty() {
            return Ok(0);
        }
        tracing::debug!(kinds = taken.len(), "draining pending queues");

        let mut undelivered = Undelivered(taken);
        let mut delivered = 0;
        while let Some(batch) = undelivered.0.front_mut() {
            match batch.deliver(self.config.catch_panics) {
                Ok(n) => {
                    delivered += n;
                    undelivered.0.pop_front();
                }
                Err(err) => {
                    tracing::warn!(
                        event = batch.key().name(),
                        delivered,
                        "drain interrupted; undelivered events kept for next cycle"
                    );
                    return Err(err);
                }
            }
        }

        tracing::debug!(delivered, "drain complete");
        Ok(delivered)
    }

    /// Forgets every kind, listener and pending event.
    pub(crate) fn reset(&self) {
        let dropped = {
            let mut entries = self.entries.borrow_mut();
            self.index.borrow_mut().clear();
            std::mem::take(&mut *entries)
        };
        tracing::debug!(kinds = dropped.len(), "registry reset");
        // Channels are dropped outside the borrow; pending events may own
        // listeners' state that touches the registry on drop.
        drop(dropped);
    }
}

/// Batches of the running drain not yet fully delivered.
///
/// Dropping it, on an error return or while unwinding from a listener panic,
/// puts their events back in front of their queues.
struct Undelivered(VecDeque<Box<dyn PendingBatch>>);

impl Drop for Undelivered {
    fn drop(&mut self) {
        for batch in self.0.drain(..) {
            batch.restore();
        }
    }
}

/// Clears the drain flag when the drain ends, including by unwinding.
struct DrainGuard<'a>(&'a Cell<bool>);

impl<'a> DrainGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}
