//! Deferred task service.
//!
//! Drawers debounce open/close requests through a [`Scheduler`]. Running
//! applications use [`TokioScheduler`]; tests drive a [`ManualScheduler`]
//! by hand so debounce windows are fully deterministic.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// A one-shot deferred callback.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Identifies a scheduled task so it can be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

impl TaskId {
    fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__task_{}", self.0)
    }
}

/// Schedules one-shot callbacks after a delay.
pub trait Scheduler: Send + Sync {
    /// Run `task` once after `delay` has elapsed.
    fn schedule(&self, delay: Duration, task: Task) -> TaskId;

    /// Cancel a task that has not fired yet.
    ///
    /// Returns `false` if the task already fired, was already cancelled,
    /// or was never scheduled by this scheduler.
    fn cancel(&self, id: TaskId) -> bool;
}

/// Errors raised while setting up a scheduler.
#[derive(Debug, Clone, Error)]
pub enum SchedulerError {
    /// `TokioScheduler::current()` was called outside a tokio runtime.
    #[error("No tokio runtime is running on this thread")]
    NoRuntime,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Tokio
// =============================================================================

/// Scheduler backed by tokio timers.
///
/// Each task is a spawned future that sleeps for its delay and then runs
/// the callback. Cancelling aborts the future. The scheduler is cheap to
/// clone; clones share the same task table.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
    tasks: Arc<Mutex<HashMap<TaskId, JoinHandle<()>>>>,
}

impl TokioScheduler {
    /// Create a scheduler on the runtime of the calling thread.
    pub fn current() -> Result<Self, SchedulerError> {
        let handle = Handle::try_current().map_err(|_| SchedulerError::NoRuntime)?;
        Ok(Self::with_handle(handle))
    }

    /// Create a scheduler that spawns onto the given runtime.
    pub fn with_handle(handle: Handle) -> Self {
        Self {
            handle,
            tasks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of tasks that have neither fired nor been cancelled.
    pub fn pending(&self) -> usize {
        lock(&self.tasks).len()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskId {
        let id = TaskId::new();
        let tasks = Arc::clone(&self.tasks);

        // Insert under the lock so the task cannot look itself up before
        // its entry exists.
        let mut guard = lock(&self.tasks);
        let join = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            let live = lock(&tasks).remove(&id).is_some();
            if live {
                task();
            }
        });
        guard.insert(id, join);
        log::trace!("[scheduler] {} scheduled in {:?}", id, delay);
        id
    }

    fn cancel(&self, id: TaskId) -> bool {
        match lock(&self.tasks).remove(&id) {
            Some(join) => {
                join.abort();
                log::trace!("[scheduler] {} cancelled", id);
                true
            }
            None => false,
        }
    }
}

// =============================================================================
// Manual
// =============================================================================

struct Scheduled {
    id: TaskId,
    deadline: Duration,
    task: Task,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    queue: Vec<Scheduled>,
}

/// Scheduler with a virtual clock that only moves when told to.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::time::Duration;
/// use cabinet::scheduler::{ManualScheduler, Scheduler};
///
/// let scheduler = ManualScheduler::new();
/// let fired = Arc::new(AtomicBool::new(false));
/// let flag = Arc::clone(&fired);
/// scheduler.schedule(Duration::from_millis(5), Box::new(move || flag.store(true, Ordering::SeqCst)));
///
/// scheduler.advance(Duration::from_millis(4));
/// assert!(!fired.load(Ordering::SeqCst));
/// scheduler.advance(Duration::from_millis(1));
/// assert!(fired.load(Ordering::SeqCst));
/// ```
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time, measured from creation.
    pub fn now(&self) -> Duration {
        lock(&self.inner).now
    }

    /// Number of tasks waiting to fire.
    pub fn pending(&self) -> usize {
        lock(&self.inner).queue.len()
    }

    /// Move the clock forward, running every task that becomes due.
    ///
    /// Tasks run in deadline order (ties in scheduling order) with the
    /// clock set to their deadline. Tasks scheduled by a running task fire
    /// in the same call if they fall inside the window. Returns the number
    /// of tasks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let mut ran = 0;

        loop {
            let next = {
                let mut state = lock(&self.inner);
                let due = state
                    .queue
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| s.deadline <= target)
                    .min_by_key(|(_, s)| (s.deadline, s.id))
                    .map(|(i, _)| i);

                match due {
                    Some(i) => {
                        let scheduled = state.queue.remove(i);
                        state.now = scheduled.deadline;
                        Some(scheduled)
                    }
                    None => {
                        state.now = target;
                        None
                    }
                }
            };

            let Some(scheduled) = next else { break };
            log::trace!("[scheduler] {} fired at {:?}", scheduled.id, scheduled.deadline);
            (scheduled.task)();
            ran += 1;
        }

        ran
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskId {
        let id = TaskId::new();
        let mut state = lock(&self.inner);
        let deadline = state.now + delay;
        state.queue.push(Scheduled { id, deadline, task });
        id
    }

    fn cancel(&self, id: TaskId) -> bool {
        let mut state = lock(&self.inner);
        let before = state.queue.len();
        state.queue.retain(|s| s.id != id);
        state.queue.len() != before
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock(&self.inner);
        f.debug_struct("ManualScheduler")
            .field("now", &state.now)
            .field("pending", &state.queue.len())
            .finish()
    }
}
