//! The contract between a drawer and the group that owns it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::CabinetConfig;

/// Receives each new configuration snapshot.
pub type ConfigListener = Arc<dyn Fn(Arc<CabinetConfig>) + Send + Sync>;

/// Identifies a config subscription so it can be removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Allocate a fresh, process-wide unique id.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

/// The group a drawer belongs to.
///
/// Drawers never commit their own debounced requests. They ask the owner,
/// which applies group rules and calls back into
/// [`Drawer::open`](super::Drawer::open).
pub trait DrawerOwner: Send + Sync {
    /// Request that the drawer at `index` be opened or closed.
    fn open_drawer(&self, index: usize, open: bool);

    /// Subscribe to configuration changes.
    ///
    /// Implementations deliver the current configuration to the listener
    /// immediately and then again on every change, until the returned
    /// subscription is removed.
    fn add_config_listener(&self, listener: ConfigListener) -> SubscriptionId;

    /// Stop delivering configuration to a listener.
    ///
    /// Returns `false` if the subscription was unknown or already removed.
    fn remove_config_listener(&self, id: SubscriptionId) -> bool;
}
