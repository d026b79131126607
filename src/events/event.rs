//! # Event kinds.
//!
//! An event kind is any `'static` Rust type implementing [`Event`]. Each kind
//! owns, inside a manager, exactly one ordered listener list and one FIFO
//! pending queue (see [`EventManager`](crate::EventManager)).
//!
//! Kinds with [`Event::TRIGGER`] set are **trigger** kinds: after their own
//! listeners ran, sending one drains the pending queues of every kind.
//!
//! ## Example
//! ```rust
//! use evbus::{Event, EventManager};
//!
//! struct Saved { path: String }
//! impl Event for Saved {}
//!
//! struct Frame;
//! impl Event for Frame {
//!     const TRIGGER: bool = true;
//! }
//!
//! let manager = EventManager::default();
//! manager.subscribe(|ev: &Saved| println!("saved {}", ev.path));
//!
//! manager.queue(Saved { path: "a.txt".into() }).unwrap();
//! assert_eq!(manager.pending::<Saved>(), 1);
//!
//! manager.send(Frame).unwrap();
//! assert_eq!(manager.pending::<Saved>(), 0);
//! ```

use std::any::TypeId;
use std::fmt;

use crate::core::EventManager;
use crate::error::DispatchError;
use crate::listeners::{HandlerOutcome, ListenerId};

/// A kind of occurrence that can be sent, queued and listened to.
pub trait Event: 'static {
    /// Marks a trigger kind: delivering it also drains every pending queue.
    const TRIGGER: bool = false;

    /// Returns the kind name used in logs and errors.
    ///
    /// The default is the type name without its module path.
    fn name() -> &'static str {
        short_type_name::<Self>()
    }
}

/// Stable identifier of an event kind.
#[derive(Clone, Copy)]
pub struct EventKey {
    id: TypeId,
    name: &'static str,
    trigger: bool,
}

impl EventKey {
    /// Returns the key of kind `E`.
    #[inline]
    pub fn of<E: Event>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: E::name(),
            trigger: E::TRIGGER,
        }
    }

    #[inline]
    pub(crate) fn id(&self) -> TypeId {
        self.id
    }

    /// Kind name (see [`Event::name`]).
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the kind is a trigger.
    #[inline]
    pub fn is_trigger(&self) -> bool {
        self.trigger
    }
}

impl PartialEq for EventKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EventKey {}

impl std::hash::Hash for EventKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventKey")
            .field("name", &self.name)
            .field("trigger", &self.trigger)
            .finish()
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Kind-level shortcuts routed to the thread's default manager
/// ([`EventManager::global`]).
///
/// ```rust
/// use evbus::{Event, EventExt};
///
/// struct Ping;
/// impl Event for Ping {}
///
/// let id = Ping::subscribe(|_: &Ping| println!("pong"));
/// Ping.send().unwrap();
/// assert!(Ping::unsubscribe(id));
/// ```
pub trait EventExt: Event + Sized {
    /// Delivers `self` immediately to the listeners of its kind.
    fn send(self) -> Result<(), DispatchError> {
        EventManager::global().send(self)
    }

    /// Appends `self` to the pending queue of its kind.
    fn queue(self) -> Result<(), DispatchError> {
        EventManager::global().queue(self)
    }

    /// Subscribes a free listener to this kind.
    fn subscribe<F, R>(listener: F) -> ListenerId
    where
        F: Fn(&Self) -> R + 'static,
        R: HandlerOutcome + 'static,
    {
        EventManager::global().subscribe(listener)
    }

    /// Removes a listener from this kind; returns `false` if it was absent.
    fn unsubscribe(id: ListenerId) -> bool {
        EventManager::global().unsubscribe::<Self>(id)
    }
}

impl<E: Event> EventExt for E {}

/// Type name with its module path stripped (`a::b::Foo<a::Bar>` → `Foo<a::Bar>`).
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let head = full.find('<').unwrap_or(full.len());
    match full[..head].rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;
    impl Event for Plain {}

    struct Beat;
    impl Event for Beat {
        const TRIGGER: bool = true;
    }

    struct Named;
    impl Event for Named {
        fn name() -> &'static str {
            "named"
        }
    }

    struct Wrapper<T>(std::marker::PhantomData<T>);

    #[test]
    fn test_default_name_strips_module_path() {
        assert_eq!(Plain::name(), "Plain");
        assert_eq!(Named::name(), "named");
        assert!(short_type_name::<Wrapper<Plain>>().starts_with("Wrapper<"));
    }

    #[test]
    fn test_key_identity() {
        let a = EventKey::of::<Plain>();
        let b = EventKey::of::<Plain>();
        let c = EventKey::of::<Beat>();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(!a.is_trigger());
        assert!(c.is_trigger());
        assert_eq!(c.to_string(), "Beat");
    }
}
