//! Collapsible panel groups.
//!
//! A [`Cabinet`] holds a row of [`Drawer`]s. Each drawer turns clicks and
//! hover transitions into debounced open/close requests; the cabinet
//! commits them according to its [`CabinetConfig`] and lets open listeners
//! veto a close.

pub mod cabinet;
pub mod config;
pub mod drawer;
pub mod event;
pub mod scheduler;

pub use cabinet::Cabinet;
pub use config::{CabinetConfig, CabinetOptions, ConfigError, DEFAULT_DEBOUNCE, Part, PartNames};
pub use drawer::{Drawer, DrawerOwner, ListenerResponse, SubscriptionId};
pub use event::{DrawerEvent, EventResult, HoverTarget, HoverTracker, Region};
pub use scheduler::{ManualScheduler, Scheduler, SchedulerError, TokioScheduler};

pub mod prelude {
    pub use crate::cabinet::Cabinet;
    pub use crate::config::{CabinetConfig, CabinetOptions, Part};
    pub use crate::drawer::{Drawer, ListenerResponse};
    pub use crate::event::{DrawerEvent, EventResult, HoverTarget, HoverTracker, Region};
    pub use crate::scheduler::{ManualScheduler, Scheduler, TokioScheduler};
}
