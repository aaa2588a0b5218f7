use crate::action::InputEvent;
use std::collections::VecDeque;

/// FIFO of events collected between ticks.
///
/// Input sources push as events arrive; the run loop drains everything once
/// per tick. Nothing is dropped.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: VecDeque<InputEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        tracing::trace!(%event, "input event queued");
        self.pending.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every pending event in arrival order.
    pub fn drain(&mut self) -> impl Iterator<Item = InputEvent> + '_ {
        self.pending.drain(..)
    }
}

impl Extend<InputEvent> for EventQueue {
    fn extend<I: IntoIterator<Item = InputEvent>>(&mut self, iter: I) {
        for event in iter {
            self.push(event);
        }
    }
}
