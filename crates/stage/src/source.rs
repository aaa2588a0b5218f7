use cubescape_input::{parse_script, EventQueue, InputEvent, ParseEventError};
use std::collections::VecDeque;

/// Supplies the events for one tick.
pub trait EventSource {
    /// Events that arrived since the previous call, in order.
    fn poll_events(&mut self) -> Vec<InputEvent>;
}

impl EventSource for EventQueue {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        self.drain().collect()
    }
}

/// Replays a fixed script, one step per tick, then goes idle.
///
/// Each step holds at most one event; `None` is an idle tick.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEvents {
    steps: VecDeque<Option<InputEvent>>,
}

impl ScriptedEvents {
    pub fn new(steps: impl IntoIterator<Item = Option<InputEvent>>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
        }
    }

    /// Parse a comma-separated script such as `next,,camera:near,quit`.
    pub fn parse(script: &str) -> Result<Self, ParseEventError> {
        Ok(Self::new(parse_script(script)?))
    }

    /// Steps not yet replayed.
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

impl EventSource for ScriptedEvents {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        self.steps.pop_front().flatten().into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_yields_one_step_per_poll() {
        let mut source = ScriptedEvents::parse("next,,quit").unwrap();
        assert_eq!(source.remaining(), 3);
        assert_eq!(source.poll_events(), vec![InputEvent::NextScene]);
        assert!(source.poll_events().is_empty());
        assert_eq!(source.poll_events(), vec![InputEvent::Quit]);
        assert!(source.poll_events().is_empty());
        assert_eq!(source.remaining(), 0);
    }

    #[test]
    fn queue_drains_everything() {
        let mut queue = EventQueue::new();
        queue.push(InputEvent::RaiseRateCap);
        queue.push(InputEvent::NextScene);
        assert_eq!(
            queue.poll_events(),
            vec![InputEvent::RaiseRateCap, InputEvent::NextScene]
        );
        assert!(queue.poll_events().is_empty());
    }

    #[test]
    fn bad_script_is_rejected() {
        assert!(ScriptedEvents::parse("next,jump").is_err());
    }
}
