//! Event routing for drawers.

use crate::event::{DrawerEvent, EventResult, Region};

use super::Drawer;

impl Drawer {
    /// Route a UI event to the matching handler.
    ///
    /// Pointer events are ignored while hover-to-open is disabled.
    pub fn handle_event(&self, event: DrawerEvent) -> EventResult {
        match event {
            DrawerEvent::Click => {
                self.on_click();
                EventResult::Consumed
            }
            DrawerEvent::PointerEnter(_) | DrawerEvent::PointerLeave(_)
                if !self.config().open_on_hover =>
            {
                EventResult::Ignored
            }
            DrawerEvent::PointerEnter(Region::Trigger) => {
                self.on_hover_enter_trigger();
                EventResult::Consumed
            }
            DrawerEvent::PointerEnter(Region::Contents) => {
                self.on_hover_enter_contents();
                EventResult::Consumed
            }
            DrawerEvent::PointerLeave(Region::Trigger) => {
                self.on_hover_leave_trigger();
                EventResult::Consumed
            }
            DrawerEvent::PointerLeave(Region::Contents) => {
                self.on_hover_leave_contents();
                EventResult::Consumed
            }
        }
    }
}
