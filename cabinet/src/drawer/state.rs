//! Drawer state and the debounced request algorithm.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use log::{debug, trace, warn};

use crate::config::CabinetConfig;
use crate::scheduler::{Scheduler, TaskId};

use super::listeners::{ListenerResponse, OpenListener, OpenListeners};
use super::owner::{DrawerOwner, SubscriptionId};

#[derive(Default)]
struct DrawerState {
    /// Latest snapshot pushed by the owner. Read-only.
    config: Arc<CabinetConfig>,
    /// Committed open state.
    is_open: bool,
    listeners: OpenListeners,
    /// Target of the debounce in flight, if any.
    requested: Option<bool>,
    pending_task: Option<TaskId>,
    /// Bumped on every request and on teardown. A timer only commits if
    /// the generation it was scheduled under is still current.
    generation: u64,
    timer_disabled: bool,
    destroyed: bool,
    subscription: Option<SubscriptionId>,
}

struct DrawerShared {
    index: usize,
    owner: Weak<dyn DrawerOwner>,
    scheduler: Arc<dyn Scheduler>,
    state: Mutex<DrawerState>,
}

impl DrawerShared {
    fn lock(&self) -> MutexGuard<'_, DrawerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for DrawerShared {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = state.pending_task.take() {
            self.scheduler.cancel(task);
        }
        if let (Some(id), Some(owner)) = (state.subscription.take(), self.owner.upgrade()) {
            owner.remove_config_listener(id);
        }
    }
}

/// One collapsible panel in a cabinet.
///
/// Turns clicks and hover transitions into debounced open/close requests,
/// asks its [`DrawerOwner`] to commit them, and gives open listeners a
/// chance to veto a close.
///
/// `Drawer` is a handle: clones share the same state, so the trigger and
/// the contents of a panel can each hold one.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use cabinet::{Cabinet, CabinetConfig, ListenerResponse};
/// use cabinet::scheduler::ManualScheduler;
///
/// let cabinet = Cabinet::new(CabinetConfig::default(), Arc::new(ManualScheduler::new()));
/// let drawer = cabinet.add_drawer();
/// drawer.disable_timer(true);
///
/// drawer.add_open_listener(|open| {
///     if open { ListenerResponse::Proceed } else { ListenerResponse::VetoClose }
/// });
///
/// drawer.on_click();
/// assert!(drawer.is_open());
///
/// // The listener refuses to let the drawer close.
/// drawer.on_click();
/// assert!(drawer.is_open());
/// ```
#[derive(Clone)]
pub struct Drawer {
    shared: Arc<DrawerShared>,
}

impl Drawer {
    /// Create a drawer at `index` and subscribe it to the owner's config.
    ///
    /// The drawer keeps a weak reference to the owner.
    pub fn new(owner: &Arc<dyn DrawerOwner>, index: usize, scheduler: Arc<dyn Scheduler>) -> Self {
        let drawer = Self {
            shared: Arc::new(DrawerShared {
                index,
                owner: Arc::downgrade(owner),
                scheduler,
                state: Mutex::new(DrawerState::default()),
            }),
        };

        let weak = Arc::downgrade(&drawer.shared);
        let listener = move |config: Arc<CabinetConfig>| {
            if let Some(shared) = weak.upgrade() {
                shared.lock().config = config;
            }
        };
        let subscription = owner.add_config_listener(Arc::new(listener));
        drawer.shared.lock().subscription = Some(subscription);

        drawer
    }

    pub fn index(&self) -> usize {
        self.shared.index
    }

    /// The latest configuration snapshot received from the owner.
    pub fn config(&self) -> Arc<CabinetConfig> {
        Arc::clone(&self.shared.lock().config)
    }

    /// The committed open state.
    pub fn is_open(&self) -> bool {
        self.shared.lock().is_open
    }

    /// The target of the debounce in flight, if any.
    pub fn pending_request(&self) -> Option<bool> {
        self.shared.lock().requested
    }

    pub fn is_destroyed(&self) -> bool {
        self.shared.lock().destroyed
    }

    pub fn listener_count(&self) -> usize {
        self.shared.lock().listeners.len()
    }

    /// Commit an open state.
    ///
    /// Sets the state, then notifies the open listeners. If a listener
    /// vetoes a close, the drawer is restored to open and `false` is
    /// returned. Listeners are called without any lock held and observe
    /// the candidate state through [`is_open`](Self::is_open).
    pub fn open(&self, open: bool) -> bool {
        let listeners = {
            let mut state = self.shared.lock();
            state.is_open = open;
            state.listeners.clone()
        };

        if listeners.notify(open) {
            debug!(
                "[drawer {}] {}",
                self.index(),
                if open { "opened" } else { "closed" }
            );
            return true;
        }

        debug!("[drawer {}] close vetoed", self.index());
        self.shared.lock().is_open = true;
        false
    }

    /// Add a listener notified on every commit attempt, in insertion order.
    pub fn add_open_listener<F>(&self, listener: F)
    where
        F: Fn(bool) -> ListenerResponse + Send + Sync + 'static,
    {
        let listener: OpenListener = Arc::new(listener);
        self.shared.lock().listeners.push(listener);
    }

    /// Add a listener that observes commits and never vetoes.
    pub fn add_open_observer<F>(&self, observer: F)
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.add_open_listener(move |open| {
            observer(open);
            ListenerResponse::Proceed
        });
    }

    /// Bypass debouncing: requests are forwarded to the owner immediately.
    ///
    /// Meant for deterministic tests.
    pub fn disable_timer(&self, disabled: bool) {
        self.shared.lock().timer_disabled = disabled;
    }

    /// Request an open state.
    ///
    /// Requests matching the debounce in flight, or the committed state
    /// when nothing is in flight, are dropped. Otherwise the request
    /// replaces any pending one and restarts the debounce timer; when it
    /// fires, the owner is asked to commit the latest request.
    pub fn request_open(&self, open: bool) {
        let (generation, delay, previous, timer_disabled) = {
            let mut state = self.shared.lock();
            if state.destroyed {
                trace!("[drawer {}] request after teardown ignored", self.index());
                return;
            }

            match state.requested {
                Some(pending) if pending == open => return,
                None if state.is_open == open => return,
                _ => {}
            }

            state.requested = Some(open);
            state.generation += 1;
            (
                state.generation,
                state.config.debounce,
                state.pending_task.take(),
                state.timer_disabled,
            )
        };

        if let Some(previous) = previous {
            self.shared.scheduler.cancel(previous);
        }

        if timer_disabled {
            self.fire(generation);
            return;
        }

        let weak = Arc::downgrade(&self.shared);
        let task = self.shared.scheduler.schedule(
            delay,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    Drawer { shared }.fire(generation);
                }
            }),
        );

        let stale = {
            let mut state = self.shared.lock();
            if state.generation == generation && state.requested.is_some() {
                state.pending_task = Some(task);
                false
            } else {
                true
            }
        };
        if stale {
            // Superseded while scheduling.
            self.shared.scheduler.cancel(task);
            return;
        }
        trace!(
            "[drawer {}] request {} scheduled in {:?}",
            self.index(),
            open,
            delay
        );
    }

    /// Forward the pending request to the owner.
    fn fire(&self, generation: u64) {
        let open = {
            let mut state = self.shared.lock();
            if state.destroyed || state.generation != generation {
                trace!("[drawer {}] stale timer ignored", self.index());
                return;
            }
            state.pending_task = None;

            let Some(open) = state.requested else { return };
            if open == state.is_open {
                // Hover jitter settled back on the committed state.
                state.requested = None;
                trace!("[drawer {}] request settled on current state", self.index());
                return;
            }
            open
        };

        match self.shared.owner.upgrade() {
            Some(owner) => owner.open_drawer(self.index(), open),
            None => warn!("[drawer {}] owner dropped, request discarded", self.index()),
        }

        let mut state = self.shared.lock();
        if state.generation == generation {
            state.requested = None;
        }
    }

    /// Cancel any pending request, unsubscribe from the owner's config and
    /// ignore all future requests.
    ///
    /// Called by the owner when the drawer is removed.
    pub fn destroy(&self) {
        let (pending, subscription) = {
            let mut state = self.shared.lock();
            state.destroyed = true;
            state.requested = None;
            state.generation += 1;
            (state.pending_task.take(), state.subscription.take())
        };

        if let Some(task) = pending {
            self.shared.scheduler.cancel(task);
        }
        if let (Some(id), Some(owner)) = (subscription, self.shared.owner.upgrade()) {
            owner.remove_config_listener(id);
        }
        debug!("[drawer {}] destroyed", self.index());
    }

    // -------------------------------------------------------------------------
    // UI events
    // -------------------------------------------------------------------------

    /// Toggle: request the opposite of the committed state.
    pub fn on_click(&self) {
        let open = self.is_open();
        self.request_open(!open);
    }

    pub fn on_hover_enter_trigger(&self) {
        if self.config().open_on_hover {
            self.request_open(true);
        }
    }

    pub fn on_hover_leave_trigger(&self) {
        if self.config().open_on_hover {
            self.request_open(false);
        }
    }

    /// Same as the trigger: moving from trigger to contents must not close
    /// the drawer.
    pub fn on_hover_enter_contents(&self) {
        self.on_hover_enter_trigger();
    }

    pub fn on_hover_leave_contents(&self) {
        self.on_hover_leave_trigger();
    }
}

impl std::fmt::Debug for Drawer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.lock();
        f.debug_struct("Drawer")
            .field("index", &self.shared.index)
            .field("is_open", &state.is_open)
            .field("requested", &state.requested)
            .field("timer_disabled", &state.timer_disabled)
            .field("destroyed", &state.destroyed)
            .finish()
    }
}
