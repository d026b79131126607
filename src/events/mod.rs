//! Event kinds: the [`Event`] trait, kind keys and standard kinds.
//!
//! ## Contents
//! - [`Event`], [`EventKey`] kind definition and identity
//! - [`EventExt`] kind-level `send`/`queue`/`subscribe` on the default manager
//! - [`Tick`], [`Quit`] standard kinds for application loops

mod event;
mod standard;

pub(crate) use event::short_type_name;
pub use event::{Event, EventExt, EventKey};
pub use standard::{Quit, Tick};
