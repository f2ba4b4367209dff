//! Drawer - one collapsible panel of a cabinet.
//!
//! A [`Drawer`] tracks the committed open state of its panel. UI events
//! become open/close requests, which are debounced so that moving the
//! pointer from the trigger onto the contents (a leave followed at once by
//! an enter) does not make the panel flicker. When the debounce settles the
//! drawer asks its [`DrawerOwner`] to commit, and the owner calls back into
//! [`Drawer::open`].
//!
//! Open listeners see every commit attempt and may veto a close by
//! returning [`ListenerResponse::VetoClose`], e.g. while the drawer holds a
//! half-filled form.

mod events;
mod listeners;
mod owner;
mod state;

pub use listeners::{ListenerResponse, OpenListener};
pub use owner::{ConfigListener, DrawerOwner, SubscriptionId};
pub use state::Drawer;
