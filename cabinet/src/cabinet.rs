//! Cabinet - a group of drawers that share a configuration.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use log::{debug, trace, warn};

use crate::config::{CabinetConfig, CabinetOptions, ConfigError};
use crate::drawer::{ConfigListener, Drawer, DrawerOwner, SubscriptionId};
use crate::event::{DrawerEvent, EventResult};
use crate::scheduler::Scheduler;

struct CabinetShared {
    config: RwLock<Arc<CabinetConfig>>,
    config_listeners: Mutex<BTreeMap<SubscriptionId, ConfigListener>>,
    drawers: Mutex<BTreeMap<usize, Drawer>>,
    next_index: AtomicUsize,
    scheduler: Arc<dyn Scheduler>,
}

impl CabinetShared {
    fn config(&self) -> Arc<CabinetConfig> {
        let guard = self.config.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    fn lock_drawers(&self) -> MutexGuard<'_, BTreeMap<usize, Drawer>> {
        self.drawers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_listeners(&self) -> MutexGuard<'_, BTreeMap<SubscriptionId, ConfigListener>> {
        self.config_listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Drawers in index order. Taken so no lock is held while drawers
    /// notify their listeners.
    fn snapshot(&self) -> Vec<Drawer> {
        self.lock_drawers().values().cloned().collect()
    }
}

impl DrawerOwner for CabinetShared {
    fn open_drawer(&self, index: usize, open: bool) {
        let drawers = self.snapshot();
        let Some(target) = drawers.iter().find(|d| d.index() == index) else {
            warn!("[cabinet] open_drawer for unknown drawer {}", index);
            return;
        };
        let config = self.config();

        if open {
            if !config.allow_multiple_open {
                for other in drawers.iter().filter(|d| d.index() != index && d.is_open()) {
                    if !other.open(false) {
                        debug!(
                            "[cabinet] drawer {} stays closed, drawer {} vetoed its close",
                            index,
                            other.index()
                        );
                        return;
                    }
                }
            }
            target.open(true);
        } else {
            let open_count = drawers.iter().filter(|d| d.is_open()).count();
            if config.one_always_open && target.is_open() && open_count == 1 {
                debug!("[cabinet] drawer {} is the last open drawer", index);
                return;
            }
            target.open(false);
        }
    }

    fn add_config_listener(&self, listener: ConfigListener) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.lock_listeners().insert(id, Arc::clone(&listener));
        listener(self.config());
        id
    }

    fn remove_config_listener(&self, id: SubscriptionId) -> bool {
        self.lock_listeners().remove(&id).is_some()
    }
}

/// A group of drawers.
///
/// The cabinet owns the configuration and the drawers, and decides how a
/// drawer's request interacts with the others: by default opening a drawer
/// closes the rest, `allow_multiple_open` lifts that, and
/// `one_always_open` keeps the last open drawer from closing.
///
/// `Cabinet` is cheap to clone; clones share the same drawers.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use cabinet::{Cabinet, CabinetConfig};
/// use cabinet::scheduler::ManualScheduler;
///
/// let cabinet = Cabinet::new(CabinetConfig::default(), Arc::new(ManualScheduler::new()));
/// let first = cabinet.add_drawer();
/// let second = cabinet.add_drawer();
/// cabinet.disable_timers(true);
///
/// first.on_click();
/// second.on_click();
/// assert_eq!(cabinet.open_indices(), vec![1]);
/// ```
#[derive(Clone)]
pub struct Cabinet {
    shared: Arc<CabinetShared>,
}

impl Cabinet {
    pub fn new(config: CabinetConfig, scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            shared: Arc::new(CabinetShared {
                config: RwLock::new(Arc::new(config)),
                config_listeners: Mutex::new(BTreeMap::new()),
                drawers: Mutex::new(BTreeMap::new()),
                next_index: AtomicUsize::new(0),
                scheduler,
            }),
        }
    }

    /// The current configuration snapshot.
    pub fn config(&self) -> Arc<CabinetConfig> {
        self.shared.config()
    }

    /// Replace the configuration and push it to every listener.
    ///
    /// Part names are fixed when the cabinet is created; a config that
    /// renames any part is rejected and nothing is pushed.
    pub fn set_config(&self, config: CabinetConfig) -> Result<(), ConfigError> {
        let config = Arc::new(config);
        {
            let mut guard = self
                .shared
                .config
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            if guard.part_names() != config.part_names() {
                return Err(ConfigError::PartNamesFrozen);
            }
            *guard = Arc::clone(&config);
        }

        let listeners: Vec<ConfigListener> =
            self.shared.lock_listeners().values().cloned().collect();
        trace!("[cabinet] pushing config to {} listeners", listeners.len());
        for listener in listeners {
            listener(Arc::clone(&config));
        }
        Ok(())
    }

    /// Merge options into the current configuration.
    pub fn update_options(&self, options: CabinetOptions) -> Result<(), ConfigError> {
        let mut config = (*self.config()).clone();
        config.copy_options(options)?;
        self.set_config(config)
    }

    /// Subscribe to configuration changes. The listener is called
    /// immediately with the current configuration.
    pub fn add_config_listener<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(Arc<CabinetConfig>) + Send + Sync + 'static,
    {
        self.shared.add_config_listener(Arc::new(listener))
    }

    pub fn remove_config_listener(&self, id: SubscriptionId) -> bool {
        self.shared.remove_config_listener(id)
    }

    /// Number of live config subscriptions, drawers included.
    pub fn config_listener_count(&self) -> usize {
        self.shared.lock_listeners().len()
    }

    /// Add a drawer with the next free index.
    ///
    /// The drawer starts open if its index is listed in `opened`, or if
    /// `one_always_open` is set, no drawer is open yet and the index is not
    /// listed in `closed`.
    pub fn add_drawer(&self) -> Drawer {
        let index = self.shared.next_index.fetch_add(1, Ordering::SeqCst);
        let owner: Arc<dyn DrawerOwner> = self.shared.clone();
        let drawer = Drawer::new(&owner, index, Arc::clone(&self.shared.scheduler));
        self.shared.lock_drawers().insert(index, drawer.clone());

        let config = self.config();
        let starts_open = config.opened.contains(&index)
            || (config.one_always_open
                && !config.closed.contains(&index)
                && self.open_indices().is_empty());
        if starts_open {
            self.shared.open_drawer(index, true);
        }

        debug!("[cabinet] added drawer {}", index);
        drawer
    }

    /// Remove a drawer. Its pending request and its config subscription
    /// are dropped with it.
    pub fn remove_drawer(&self, index: usize) -> Option<Drawer> {
        let drawer = self.shared.lock_drawers().remove(&index)?;
        drawer.destroy();
        Some(drawer)
    }

    pub fn drawer(&self, index: usize) -> Option<Drawer> {
        self.shared.lock_drawers().get(&index).cloned()
    }

    /// All drawers in index order.
    pub fn drawers(&self) -> Vec<Drawer> {
        self.shared.snapshot()
    }

    pub fn len(&self) -> usize {
        self.shared.lock_drawers().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.lock_drawers().is_empty()
    }

    /// Indices of the open drawers, ascending.
    pub fn open_indices(&self) -> Vec<usize> {
        self.shared
            .snapshot()
            .iter()
            .filter(|d| d.is_open())
            .map(Drawer::index)
            .collect()
    }

    /// Commit an open state for a drawer, applying the group rules.
    pub fn open_drawer(&self, index: usize, open: bool) {
        self.shared.open_drawer(index, open);
    }

    /// Deliver a UI event to a drawer.
    pub fn dispatch(&self, index: usize, event: DrawerEvent) -> EventResult {
        match self.drawer(index) {
            Some(drawer) => drawer.handle_event(event),
            None => EventResult::Ignored,
        }
    }

    /// Enable or disable debouncing on every current drawer.
    pub fn disable_timers(&self, disabled: bool) {
        for drawer in self.shared.snapshot() {
            drawer.disable_timer(disabled);
        }
    }
}

impl std::fmt::Debug for Cabinet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cabinet")
            .field("drawers", &self.shared.snapshot())
            .field("config", &self.config())
            .finish()
    }
}
