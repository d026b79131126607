//! # Per-kind channel: ordered listeners and pending queue.
//!
//! A [`Channel<E>`] is created once per event kind inside a [`Registry`](super::Registry)
//! and lives until the registry is reset.
//!
//! ## Rules
//! - Listeners run in subscription order.
//! - `dispatch` iterates a **snapshot** of the listener list; subscribe or
//!   unsubscribe calls made by a running listener apply to the next dispatch.
//! - Owner-bound slots hold a weak reference; slots whose owner is gone are
//!   skipped and pruned after the pass.
//! - The pending queue is FIFO. A drain takes the whole queue at once
//!   ([`AnyChannel::take_batch`]); events queued afterwards wait for the next drain.

use std::any::Any;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use crate::error::{BoxError, DispatchError};
use crate::events::{Event, EventKey};
use crate::listeners::ListenerId;

/// Type-erased listener body. `None` means the owner was dropped.
pub(crate) type Call<E> = Box<dyn Fn(&E) -> Option<Result<(), BoxError>>>;

/// Owner identity of a bound listener.
pub(crate) struct Owner {
    pub(crate) object: Weak<dyn Any>,
    pub(crate) handler: &'static str,
}

impl Owner {
    fn is(&self, addr: *const (), handler: &'static str) -> bool {
        self.handler == handler
            && self.object.strong_count() > 0
            && self.object.as_ptr() as *const () == addr
    }
}

/// One subscribed listener.
pub(crate) struct Slot<E> {
    pub(crate) id: ListenerId,
    pub(crate) label: String,
    pub(crate) owner: Option<Owner>,
    pub(crate) call: Call<E>,
}

pub(crate) struct Channel<E: Event> {
    key: EventKey,
    listeners: RefCell<Vec<Rc<Slot<E>>>>,
    pending: RefCell<VecDeque<E>>,
}

impl<E: Event> Channel<E> {
    pub(crate) fn new() -> Self {
        Self {
            key: EventKey::of::<E>(),
            listeners: RefCell::new(Vec::new()),
            pending: RefCell::new(VecDeque::new()),
        }
    }

    pub(crate) fn insert(&self, slot: Slot<E>) {
        self.listeners.borrow_mut().push(Rc::new(slot));
    }

    /// Returns the live slot bound to (`addr`, `handler`), if any.
    pub(crate) fn find_bound(&self, addr: *const (), handler: &'static str) -> Option<ListenerId> {
        self.listeners
            .borrow()
            .iter()
            .find(|slot| slot.owner.as_ref().is_some_and(|o| o.is(addr, handler)))
            .map(|slot| slot.id)
    }

    pub(crate) fn remove(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|slot| slot.id != id);
        listeners.len() != before
    }

    pub(crate) fn listener_ids(&self) -> Vec<ListenerId> {
        self.listeners.borrow().iter().map(|slot| slot.id).collect()
    }

    fn snapshot(&self) -> Vec<Rc<Slot<E>>> {
        self.listeners.borrow().clone()
    }

    /// Delivers `event` to the current listener snapshot.
    ///
    /// Returns the number of listeners invoked. The first failure stops the pass.
    pub(crate) fn dispatch(&self, event: &E, catch_panics: bool) -> Result<usize, DispatchError> {
        let mut invoked = 0;
        let mut gone = Vec::new();
        let mut outcome = Ok(());

        for slot in self.snapshot() {
            match self.invoke(&slot, event, catch_panics) {
                Ok(true) => invoked += 1,
                Ok(false) => gone.push(slot.id),
                Err(err) => {
                    tracing::warn!(
                        event = self.key.name(),
                        listener = %slot.label,
                        error = %err.as_message(),
                        "listener failed; remaining listeners skipped"
                    );
                    outcome = Err(err);
                    break;
                }
            }
        }

        if !gone.is_empty() {
            tracing::trace!(
                event = self.key.name(),
                pruned = gone.len(),
                "pruned listeners of dropped owners"
            );
            self.listeners
                .borrow_mut()
                .retain(|slot| !gone.contains(&slot.id));
        }

        outcome.map(|()| invoked)
    }

    /// Runs one listener. `Ok(false)` means its owner is gone.
    fn invoke(
        &self,
        slot: &Slot<E>,
        event: &E,
        catch_panics: bool,
    ) -> Result<bool, DispatchError> {
        let result = if catch_panics {
            match panic::catch_unwind(AssertUnwindSafe(|| (slot.call)(event))) {
                Ok(result) => result,
                Err(payload) => {
                    return Err(DispatchError::ListenerPanicked {
                        event: self.key.name(),
                        listener: slot.label.clone(),
                        info: panic_message(payload.as_ref()),
                    });
                }
            }
        } else {
            (slot.call)(event)
        };

        match result {
            None => Ok(false),
            Some(Ok(())) => Ok(true),
            Some(Err(source)) => Err(DispatchError::ListenerFailed {
                event: self.key.name(),
                listener: slot.label.clone(),
                source,
            }),
        }
    }

    pub(crate) fn push(&self, event: E, limit: Option<usize>) -> Result<(), DispatchError> {
        let mut pending = self.pending.borrow_mut();
        if let Some(capacity) = limit {
            if pending.len() >= capacity {
                return Err(DispatchError::QueueFull {
                    event: self.key.name(),
                    capacity,
                });
            }
        }
        pending.push_back(event);
        Ok(())
    }

    /// Puts undelivered events back in front of the queue, keeping their order.
    fn restore(&self, items: VecDeque<E>) {
        let mut pending = self.pending.borrow_mut();
        for item in items.into_iter().rev() {
            pending.push_front(item);
        }
    }
}

/// Kind-independent view of a channel, used for drains and bulk operations.
pub(crate) trait AnyChannel {
    fn key(&self) -> EventKey;
    fn listener_count(&self) -> usize;
    fn pending_count(&self) -> usize;
    fn remove_listener(&self, id: ListenerId) -> bool;
    /// Takes every pending event; `None` when the queue is empty.
    fn take_batch(self: Rc<Self>) -> Option<Box<dyn PendingBatch>>;
}

impl<E: Event> AnyChannel for Channel<E> {
    fn key(&self) -> EventKey {
        self.key
    }

    fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        self.remove(id)
    }

    fn take_batch(self: Rc<Self>) -> Option<Box<dyn PendingBatch>> {
        let items = std::mem::take(&mut *self.pending.borrow_mut());
        if items.is_empty() {
            return None;
        }
        Some(Box::new(Batch {
            channel: self,
            items,
        }))
    }
}

/// Events of one kind taken from its queue at the start of a drain.
pub(crate) trait PendingBatch {
    fn key(&self) -> EventKey;
    /// Delivers the events oldest first. On failure the failing event is
    /// consumed and the rest stay in the batch.
    fn deliver(&mut self, catch_panics: bool) -> Result<usize, DispatchError>;
    /// Returns undelivered events to the front of the channel queue.
    fn restore(self: Box<Self>);
}

struct Batch<E: Event> {
    channel: Rc<Channel<E>>,
    items: VecDeque<E>,
}

impl<E: Event> PendingBatch for Batch<E> {
    fn key(&self) -> EventKey {
        self.channel.key
    }

    fn deliver(&mut self, catch_panics: bool) -> Result<usize, DispatchError> {
        let mut delivered = 0;
        while let Some(event) = self.items.pop_front() {
            self.channel.dispatch(&event, catch_panics)?;
            delivered += 1;
        }
        Ok(delivered)
    }

    fn restore(self: Box<Self>) {
        if !self.items.is_empty() {
            self.channel.restore(self.items);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Ping(u32);
    impl Event for Ping {}

    type Outcome = Option<Result<(), BoxError>>;

    fn slot(id: u64, call: Call<Ping>) -> Slot<Ping> {
        Slot {
            id: ListenerId(id),
            label: format!("listener#{id}"),
            owner: None,
            call,
        }
    }

    #[test]
    fn test_dispatch_counts_invoked_listeners() {
        let ch = Channel::<Ping>::new();
        let sum = Rc::new(Cell::new(0));
        for id in 0..3 {
            let sum = Rc::clone(&sum);
            ch.insert(slot(
                id,
                Box::new(move |p: &Ping| -> Outcome {
                    sum.set(sum.get() + p.0);
                    Some(Ok(()))
                }),
            ));
        }
        assert_eq!(ch.dispatch(&Ping(2), false).unwrap(), 3);
        assert_eq!(sum.get(), 6);
    }

    #[test]
    fn test_gone_owner_is_pruned() {
        let ch = Channel::<Ping>::new();
        ch.insert(slot(1, Box::new(|_: &Ping| -> Outcome { None })));
        ch.insert(slot(2, Box::new(|_: &Ping| -> Outcome { Some(Ok(())) })));

        assert_eq!(ch.dispatch(&Ping(0), false).unwrap(), 1);
        assert_eq!(ch.listener_ids(), vec![ListenerId(2)]);
    }

    #[test]
    fn test_caught_panic_becomes_error() {
        let ch = Channel::<Ping>::new();
        ch.insert(slot(7, Box::new(|_: &Ping| -> Outcome { panic!("kaboom") })));

        let err = ch.dispatch(&Ping(0), true).unwrap_err();
        match err {
            DispatchError::ListenerPanicked { listener, info, .. } => {
                assert_eq!(listener, "listener#7");
                assert_eq!(info, "kaboom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_push_respects_limit() {
        let ch = Channel::<Ping>::new();
        ch.push(Ping(1), Some(1)).unwrap();
        assert!(matches!(
            ch.push(Ping(2), Some(1)),
            Err(DispatchError::QueueFull { capacity: 1, .. })
        ));
        assert_eq!(ch.pending_count(), 1);
    }

    #[test]
    fn test_failed_batch_restores_rest_in_front() {
        let ch = Rc::new(Channel::<Ping>::new());
        ch.insert(slot(
            1,
            Box::new(|p: &Ping| -> Outcome {
                Some(if p.0 == 2 { Err("two".into()) } else { Ok(()) })
            }),
        ));
        for n in 1..=4 {
            ch.push(Ping(n), None).unwrap();
        }

        let mut batch = Rc::clone(&ch).take_batch().unwrap();
        ch.push(Ping(99), None).unwrap();

        assert!(batch.deliver(false).is_err());
        batch.restore();

        let order: Vec<u32> = ch.pending.borrow().iter().map(|p| p.0).collect();
        assert_eq!(order, vec![3, 4, 99]);
    }

    #[test]
    fn test_empty_queue_has_no_batch() {
        let ch = Rc::new(Channel::<Ping>::new());
        assert!(ch.take_batch().is_none());
    }
}
