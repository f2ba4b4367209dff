use std::sync::{Arc, Mutex};
use std::time::Duration;

use cabinet::drawer::{ConfigListener, DrawerOwner, SubscriptionId};
use cabinet::scheduler::{Task, TaskId};
use cabinet::{
    CabinetConfig, Drawer, DrawerEvent, EventResult, ListenerResponse, ManualScheduler, Region,
    Scheduler,
};

/// Owner that records every request and commits it straight back.
#[derive(Default)]
struct TestOwner {
    config: Mutex<Arc<CabinetConfig>>,
    listeners: Mutex<Vec<(SubscriptionId, ConfigListener)>>,
    requests: Mutex<Vec<(usize, bool)>>,
    drawer: Mutex<Option<Drawer>>,
}

impl TestOwner {
    fn set_config(&self, config: CabinetConfig) {
        let config = Arc::new(config);
        *self.config.lock().unwrap() = Arc::clone(&config);
        let listeners = self.listeners.lock().unwrap().clone();
        for (_, listener) in listeners {
            listener(Arc::clone(&config));
        }
    }

    fn requests(&self) -> Vec<(usize, bool)> {
        self.requests.lock().unwrap().clone()
    }

    fn subscriptions(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }
}

impl DrawerOwner for TestOwner {
    fn open_drawer(&self, index: usize, open: bool) {
        self.requests.lock().unwrap().push((index, open));
        let drawer = self.drawer.lock().unwrap().clone();
        if let Some(drawer) = drawer {
            drawer.open(open);
        }
    }

    fn add_config_listener(&self, listener: ConfigListener) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.listeners.lock().unwrap().push((id, Arc::clone(&listener)));
        let config = Arc::clone(&self.config.lock().unwrap());
        listener(config);
        id
    }

    fn remove_config_listener(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock().unwrap();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }
}

fn setup(config: CabinetConfig) -> (Arc<TestOwner>, Drawer, ManualScheduler) {
    let owner = Arc::new(TestOwner::default());
    *owner.config.lock().unwrap() = Arc::new(config);

    let scheduler = ManualScheduler::new();
    let dyn_owner: Arc<dyn DrawerOwner> = owner.clone();
    let drawer = Drawer::new(&dyn_owner, 0, Arc::new(scheduler.clone()));
    *owner.drawer.lock().unwrap() = Some(drawer.clone());

    (owner, drawer, scheduler)
}

fn record_commits(drawer: &Drawer) -> Arc<Mutex<Vec<bool>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    drawer.add_open_observer(move |open| sink.lock().unwrap().push(open));
    log
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

// ============================================================================
// Debounce
// ============================================================================

#[test]
fn test_requests_within_window_coalesce() {
    let (owner, drawer, scheduler) = setup(CabinetConfig::default());
    let commits = record_commits(&drawer);

    drawer.request_open(true);
    scheduler.advance(ms(2));
    drawer.request_open(false);
    scheduler.advance(ms(2));
    drawer.request_open(true);
    assert_eq!(scheduler.pending(), 1);

    // The last request restarted the timer at t=4.
    scheduler.advance(ms(4));
    assert!(owner.requests().is_empty());

    scheduler.advance(ms(1));
    assert_eq!(owner.requests(), vec![(0, true)]);
    assert_eq!(*commits.lock().unwrap(), vec![true]);
    assert!(drawer.is_open());
    assert_eq!(drawer.pending_request(), None);
}

#[test]
fn test_request_for_committed_state_is_noop() {
    let (owner, drawer, scheduler) = setup(CabinetConfig::default());
    let commits = record_commits(&drawer);

    drawer.request_open(false);

    assert_eq!(scheduler.pending(), 0);
    assert_eq!(drawer.pending_request(), None);
    scheduler.advance(ms(10));
    assert!(owner.requests().is_empty());
    assert!(commits.lock().unwrap().is_empty());
}

#[test]
fn test_request_matching_pending_does_not_restart_timer() {
    let (owner, drawer, scheduler) = setup(CabinetConfig::default());

    drawer.request_open(true);
    scheduler.advance(ms(3));
    drawer.request_open(true);
    assert_eq!(drawer.pending_request(), Some(true));

    scheduler.advance(ms(2));
    assert_eq!(owner.requests(), vec![(0, true)]);
}

#[test]
fn test_debounce_delay_comes_from_config() {
    let (owner, drawer, scheduler) = setup(CabinetConfig::default().with_debounce(ms(20)));

    drawer.request_open(true);
    scheduler.advance(ms(19));
    assert!(owner.requests().is_empty());

    scheduler.advance(ms(1));
    assert_eq!(owner.requests(), vec![(0, true)]);
}

#[test]
fn test_disabled_timer_commits_synchronously() {
    let (owner, drawer, scheduler) = setup(CabinetConfig::default());
    drawer.disable_timer(true);

    drawer.request_open(true);

    assert!(drawer.is_open());
    assert_eq!(scheduler.pending(), 0);
    assert_eq!(owner.requests(), vec![(0, true)]);
}

#[test]
fn test_disabling_timer_replaces_pending_request() {
    let (owner, drawer, scheduler) = setup(CabinetConfig::default());

    drawer.request_open(true);
    drawer.disable_timer(true);
    drawer.request_open(false);

    // The pending open was replaced by an immediate close of a closed drawer.
    assert_eq!(scheduler.pending(), 0);
    assert!(owner.requests().is_empty());
    assert!(!drawer.is_open());
}

// ============================================================================
// Veto
// ============================================================================

#[test]
fn test_veto_rolls_back_earlier_listeners() {
    let (_owner, drawer, _scheduler) = setup(CabinetConfig::default());

    let a = Arc::new(Mutex::new(Vec::new()));
    let c = Arc::new(Mutex::new(Vec::new()));
    let a_sink = Arc::clone(&a);
    let c_sink = Arc::clone(&c);
    drawer.add_open_observer(move |open| a_sink.lock().unwrap().push(open));
    drawer.add_open_listener(|open| {
        if open {
            ListenerResponse::Proceed
        } else {
            ListenerResponse::VetoClose
        }
    });
    drawer.add_open_observer(move |open| c_sink.lock().unwrap().push(open));
    assert_eq!(drawer.listener_count(), 3);

    assert!(drawer.open(true));
    a.lock().unwrap().clear();
    c.lock().unwrap().clear();

    assert!(!drawer.open(false));
    assert!(drawer.is_open());
    assert_eq!(*a.lock().unwrap(), vec![false, true]);
    assert!(c.lock().unwrap().is_empty());
}

#[test]
fn test_opening_cannot_be_vetoed() {
    let (_owner, drawer, _scheduler) = setup(CabinetConfig::default());
    drawer.add_open_listener(|_| ListenerResponse::VetoClose);

    assert!(drawer.open(true));
    assert!(drawer.is_open());
}

#[test]
fn test_vetoed_request_is_abandoned() {
    let (owner, drawer, scheduler) = setup(CabinetConfig::default());
    drawer.add_open_listener(|open| {
        if open {
            ListenerResponse::Proceed
        } else {
            ListenerResponse::VetoClose
        }
    });

    drawer.on_click();
    scheduler.advance(ms(5));
    assert!(drawer.is_open());

    drawer.on_click();
    scheduler.advance(ms(5));
    assert!(drawer.is_open());
    assert_eq!(drawer.pending_request(), None);
    assert_eq!(scheduler.pending(), 0);
    assert_eq!(owner.requests(), vec![(0, true), (0, false)]);
}

#[test]
fn test_listener_observes_candidate_state() {
    let (_owner, drawer, _scheduler) = setup(CabinetConfig::default());

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let handle = drawer.clone();
    drawer.add_open_observer(move |open| sink.lock().unwrap().push((open, handle.is_open())));

    drawer.open(true);
    drawer.open(false);
    assert_eq!(*seen.lock().unwrap(), vec![(true, true), (false, false)]);
}

// ============================================================================
// Teardown
// ============================================================================

#[test]
fn test_destroy_cancels_pending_request() {
    let (owner, drawer, scheduler) = setup(CabinetConfig::default());

    drawer.request_open(true);
    assert_eq!(scheduler.pending(), 1);

    assert_eq!(owner.subscriptions(), 1);
    drawer.destroy();
    assert_eq!(scheduler.pending(), 0);
    assert_eq!(drawer.pending_request(), None);
    assert_eq!(owner.subscriptions(), 0);

    scheduler.advance(ms(10));
    drawer.request_open(true);
    scheduler.advance(ms(10));

    assert!(owner.requests().is_empty());
    assert!(!drawer.is_open());
    assert!(drawer.is_destroyed());
}

#[test]
fn test_dropping_last_handle_cancels_timer() {
    let (owner, drawer, scheduler) = setup(CabinetConfig::default());

    drawer.request_open(true);
    *owner.drawer.lock().unwrap() = None;
    drop(drawer);

    assert_eq!(scheduler.pending(), 0);
    assert_eq!(owner.subscriptions(), 0);
    scheduler.advance(ms(10));
    assert!(owner.requests().is_empty());
}

/// Runs a hook from inside `schedule`, before the task id is handed back.
#[derive(Default)]
struct HookedScheduler {
    inner: ManualScheduler,
    on_schedule: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl Scheduler for HookedScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskId {
        let id = self.inner.schedule(delay, task);
        let hook = self.on_schedule.lock().unwrap().take();
        if let Some(hook) = hook {
            hook();
        }
        id
    }

    fn cancel(&self, id: TaskId) -> bool {
        self.inner.cancel(id)
    }
}

#[test]
fn test_timer_superseded_while_scheduling_is_cancelled() {
    let owner = Arc::new(TestOwner::default());
    let scheduler = Arc::new(HookedScheduler::default());
    let dyn_owner: Arc<dyn DrawerOwner> = owner.clone();
    let drawer = Drawer::new(&dyn_owner, 0, scheduler.clone());

    let handle = drawer.clone();
    *scheduler.on_schedule.lock().unwrap() = Some(Box::new(move || handle.destroy()));

    drawer.request_open(true);
    assert_eq!(scheduler.inner.pending(), 0);

    scheduler.inner.advance(ms(10));
    assert!(owner.requests().is_empty());
}

#[test]
fn test_request_discarded_when_owner_is_gone() {
    let (owner, drawer, scheduler) = setup(CabinetConfig::default());
    *owner.drawer.lock().unwrap() = None;
    drop(owner);

    drawer.request_open(true);
    scheduler.advance(ms(10));

    assert!(!drawer.is_open());
    assert_eq!(drawer.pending_request(), None);
}

// ============================================================================
// UI events
// ============================================================================

#[test]
fn test_click_toggles() {
    let (_owner, drawer, _scheduler) = setup(CabinetConfig::default());
    drawer.disable_timer(true);
    let commits = record_commits(&drawer);

    drawer.on_click();
    assert!(drawer.is_open());
    drawer.on_click();
    assert!(!drawer.is_open());
    assert_eq!(*commits.lock().unwrap(), vec![true, false]);
}

#[test]
fn test_hover_jitter_is_absorbed() {
    let (owner, drawer, scheduler) = setup(CabinetConfig::default().with_open_on_hover(true));
    let commits = record_commits(&drawer);

    drawer.on_hover_enter_trigger();
    scheduler.advance(ms(2));
    drawer.on_hover_leave_trigger();
    scheduler.advance(ms(10));

    assert!(!drawer.is_open());
    assert!(owner.requests().is_empty());
    assert!(commits.lock().unwrap().is_empty());
}

#[test]
fn test_moving_from_trigger_to_contents_keeps_drawer_open() {
    let (owner, drawer, scheduler) = setup(CabinetConfig::default().with_open_on_hover(true));

    drawer.on_hover_enter_trigger();
    scheduler.advance(ms(5));
    assert!(drawer.is_open());

    drawer.on_hover_leave_trigger();
    drawer.on_hover_enter_contents();
    scheduler.advance(ms(10));

    assert!(drawer.is_open());
    assert_eq!(owner.requests(), vec![(0, true)]);

    drawer.on_hover_leave_contents();
    scheduler.advance(ms(5));
    assert!(!drawer.is_open());
}

#[test]
fn test_hover_ignored_without_open_on_hover() {
    let (_owner, drawer, scheduler) = setup(CabinetConfig::default());

    assert_eq!(
        drawer.handle_event(DrawerEvent::PointerEnter(Region::Trigger)),
        EventResult::Ignored
    );
    drawer.on_hover_enter_contents();
    assert_eq!(scheduler.pending(), 0);

    assert_eq!(drawer.handle_event(DrawerEvent::Click), EventResult::Consumed);
    assert_eq!(scheduler.pending(), 1);
}

#[test]
fn test_config_push_replaces_snapshot() {
    let (owner, drawer, scheduler) = setup(CabinetConfig::default());
    assert!(!drawer.config().open_on_hover);

    owner.set_config(CabinetConfig::default().with_open_on_hover(true));
    assert!(drawer.config().open_on_hover);

    assert_eq!(
        drawer.handle_event(DrawerEvent::PointerEnter(Region::Contents)),
        EventResult::Consumed
    );
    scheduler.advance(ms(5));
    assert!(drawer.is_open());
}
