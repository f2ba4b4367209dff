//! Open listeners and the close veto protocol.

use std::sync::Arc;

/// A listener's answer to an open-state change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListenerResponse {
    /// Accept the change.
    #[default]
    Proceed,
    /// Block a close. Has no effect when the drawer is opening.
    VetoClose,
}

/// Called with the candidate open state on every commit attempt.
pub type OpenListener = Arc<dyn Fn(bool) -> ListenerResponse + Send + Sync>;

/// Ordered open listeners. Order decides which listeners are rolled back.
#[derive(Clone, Default)]
pub(crate) struct OpenListeners {
    listeners: Vec<OpenListener>,
}

impl OpenListeners {
    pub(crate) fn push(&mut self, listener: OpenListener) {
        self.listeners.push(listener);
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Notify every listener of the candidate state, in insertion order.
    ///
    /// When closing and a listener vetoes, the listeners notified before it
    /// are told `true` again and the remaining listeners are skipped.
    /// Returns `false` if the close was vetoed.
    pub(crate) fn notify(&self, open: bool) -> bool {
        for (i, listener) in self.listeners.iter().enumerate() {
            let response = listener(open);
            if !open && response == ListenerResponse::VetoClose {
                for previous in &self.listeners[..i] {
                    previous(true);
                }
                return false;
            }
        }
        true
    }
}
