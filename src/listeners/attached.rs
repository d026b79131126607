//! # Attached listeners.
//!
//! [`Attached<T>`] is returned when an owner is attached to a manager. It keeps
//! the owner alive and remembers the listeners bound for it.
//!
//! ## Rules
//! - `dispose()` unsubscribes every bound listener and hands the owner back.
//! - Dropping the guard unsubscribes as well.
//! - Listeners hold the owner weakly; if the owner is dropped some other way
//!   they are skipped and pruned on their next dispatch.

use std::fmt;
use std::ops::Deref;
use std::rc::{Rc, Weak};

use crate::core::Registry;
use crate::events::EventKey;

use super::ListenerId;

/// An owner whose methods are subscribed to a manager.
pub struct Attached<T: 'static> {
    owner: Rc<T>,
    bindings: Vec<(EventKey, ListenerId)>,
    registry: Weak<Registry>,
}

impl<T: 'static> Attached<T> {
    pub(crate) fn new(
        owner: Rc<T>,
        bindings: Vec<(EventKey, ListenerId)>,
        registry: Weak<Registry>,
    ) -> Self {
        Self {
            owner,
            bindings,
            registry,
        }
    }

    /// Shared handle to the owner.
    pub fn handle(&self) -> Rc<T> {
        Rc::clone(&self.owner)
    }

    /// Listeners bound by this attachment.
    pub fn bindings(&self) -> &[(EventKey, ListenerId)] {
        &self.bindings
    }

    /// Unsubscribes every bound listener and returns the owner.
    pub fn dispose(mut self) -> Rc<T> {
        self.detach();
        Rc::clone(&self.owner)
    }

    fn detach(&mut self) {
        let bindings = std::mem::take(&mut self.bindings);
        if bindings.is_empty() {
            return;
        }
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut removed = 0;
        for (event, id) in &bindings {
            if registry.unsubscribe_key(event, *id) {
                removed += 1;
            }
        }
        tracing::trace!(removed, "listeners detached");
    }
}

impl<T: 'static> Deref for Attached<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.owner
    }
}

impl<T: 'static> Drop for Attached<T> {
    fn drop(&mut self) {
        self.detach();
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Attached<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attached")
            .field("owner", &self.owner)
            .field("bindings", &self.bindings)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::events::{Quit, Tick};
    use crate::{listener_table, EventManager};
    use std::cell::Cell;

    #[derive(Default)]
    struct Watcher {
        ticks: Cell<u32>,
        quits: Cell<u32>,
    }

    impl Watcher {
        fn on_tick(&self, _: &Tick) {
            self.ticks.set(self.ticks.get() + 1);
        }

        fn on_quit(&self, _: &Quit) {
            self.quits.set(self.quits.get() + 1);
        }
    }

    listener_table! {
        Watcher {
            Tick => on_tick,
            Quit => on_quit,
        }
    }

    #[test]
    fn test_attach_subscribes_every_method() {
        let manager = EventManager::default();
        let watcher = manager.attach(Watcher::default()).unwrap();
        assert_eq!(watcher.bindings().len(), 2);

        manager.send(Quit::new()).unwrap();
        manager.send(Tick::new(0)).unwrap();
        assert_eq!(watcher.ticks.get(), 1);
        assert_eq!(watcher.quits.get(), 1);
    }

    #[test]
    fn test_dispose_unsubscribes() {
        let manager = EventManager::default();
        let watcher = manager.attach(Watcher::default()).unwrap();
        let owner = watcher.dispose();

        manager.send(Tick::new(0)).unwrap();
        assert_eq!(owner.ticks.get(), 0);
        assert_eq!(manager.listener_count::<Tick>(), 0);
        assert_eq!(manager.listener_count::<Quit>(), 0);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let manager = EventManager::default();
        drop(manager.attach(Watcher::default()).unwrap());
        assert!(manager.listeners_of::<Tick>().is_empty());
    }

    #[test]
    fn test_reattach_same_owner_keeps_single_listener() {
        let manager = EventManager::default();
        let first = manager.attach(Watcher::default()).unwrap();
        let second = manager.attach_rc(first.handle()).unwrap();
        assert!(second.bindings().is_empty());

        // Dropping the second attachment leaves the first one subscribed.
        drop(second);
        manager.send(Tick::new(0)).unwrap();
        assert_eq!(first.ticks.get(), 1);
    }

    #[test]
    fn test_guard_outliving_manager_is_harmless() {
        let manager = EventManager::default();
        let watcher = manager.attach(Watcher::default()).unwrap();
        drop(manager);
        drop(watcher);
    }
}
