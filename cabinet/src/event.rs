//! UI event vocabulary for drawers.
//!
//! The UI layer hit-tests pointer positions and reports which drawer part is
//! under the pointer. [`HoverTracker`] turns those reports into enter/leave
//! events that drawers understand.

/// The interactive regions of a drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Trigger,
    Contents,
}

/// An event delivered to a drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerEvent {
    /// The trigger was clicked or activated.
    Click,
    /// The pointer entered a region.
    PointerEnter(Region),
    /// The pointer left a region.
    PointerLeave(Region),
}

/// Result of handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was ignored, try other handlers.
    Ignored,
    /// Event was consumed, stop propagation.
    Consumed,
}

impl EventResult {
    pub fn is_handled(&self) -> bool {
        matches!(self, EventResult::Consumed)
    }
}

/// A drawer region under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HoverTarget {
    pub drawer: usize,
    pub region: Region,
}

impl HoverTarget {
    pub fn trigger(drawer: usize) -> Self {
        Self {
            drawer,
            region: Region::Trigger,
        }
    }

    pub fn contents(drawer: usize) -> Self {
        Self {
            drawer,
            region: Region::Contents,
        }
    }
}

/// Tracks which drawer region the pointer is over.
///
/// # Example
///
/// ```
/// use cabinet::event::{DrawerEvent, HoverTarget, HoverTracker, Region};
///
/// let mut tracker = HoverTracker::new();
/// tracker.update(Some(HoverTarget::trigger(0)));
///
/// let events = tracker.update(Some(HoverTarget::contents(0)));
/// assert_eq!(
///     events,
///     vec![
///         (0, DrawerEvent::PointerLeave(Region::Trigger)),
///         (0, DrawerEvent::PointerEnter(Region::Contents)),
///     ]
/// );
/// ```
#[derive(Debug, Default, Clone)]
pub struct HoverTracker {
    current: Option<HoverTarget>,
}

impl HoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<HoverTarget> {
        self.current
    }

    /// Record the region now under the pointer.
    ///
    /// Returns `(drawer index, event)` pairs in delivery order: the leave
    /// for the previous region, then the enter for the new one. Repeated
    /// reports of the same region produce nothing.
    pub fn update(&mut self, hovered: Option<HoverTarget>) -> Vec<(usize, DrawerEvent)> {
        if hovered == self.current {
            return Vec::new();
        }

        let mut events = Vec::with_capacity(2);
        if let Some(previous) = self.current {
            events.push((previous.drawer, DrawerEvent::PointerLeave(previous.region)));
        }
        if let Some(next) = hovered {
            events.push((next.drawer, DrawerEvent::PointerEnter(next.region)));
        }

        log::trace!("[hover] {:?} -> {:?}", self.current, hovered);
        self.current = hovered;
        events
    }
}
