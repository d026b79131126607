//! Dispatch core: registry, channels and the manager facade.
//!
//! The public API from this module is [`EventManager`] and its [`Config`].
//!
//! Internal modules:
//! - [`channel`]: per-kind ordered listeners and FIFO pending queue;
//! - [`registry`]: lazily created channels, delivery and two-phase drains;
//! - [`manager`]: the cloneable facade and the thread-local default manager;
//! - [`config`]: duplicate policy, queue capacity, panic handling.

mod channel;
mod config;
mod manager;
mod registry;

pub use config::{Config, DuplicatePolicy};
pub use manager::EventManager;

pub(crate) use registry::Registry;
