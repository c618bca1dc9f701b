use std::sync::{Mutex, PoisonError};

use super::broadcaster::RenderEvent;

/// Depth-1 mailbox between the broadcaster and one renderer.
///
/// Writes replace the whole event, so a reader sees either the previous
/// event or the newest one, never a mix. Undelivered events are
/// overwritten: the renderer only cares about the latest target.
#[derive(Debug, Default)]
pub struct EventSlot {
    latest: Mutex<Option<RenderEvent>>,
}

impl EventSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever is waiting with `event`
    pub fn publish(&self, event: RenderEvent) {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(event);
    }

    /// Remove and return the waiting event, if any
    pub fn take(&self) -> Option<RenderEvent> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Look at the waiting event without consuming it
    pub fn peek(&self) -> Option<RenderEvent> {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
