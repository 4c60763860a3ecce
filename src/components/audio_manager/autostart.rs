//! First-interaction gating for background music.

use std::cell::Cell;

/// Everything that may kick off the single autoplay attempt of a page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionTrigger {
    Scroll,
    PointerMove,
    TouchStart,
    Click,
    KeyDown,
    Timeout,
}

impl InteractionTrigger {
    /// Triggers delivered as document events. `Timeout` comes from a timer instead.
    pub const LISTENED: [InteractionTrigger; 5] = [
        InteractionTrigger::Scroll,
        InteractionTrigger::PointerMove,
        InteractionTrigger::TouchStart,
        InteractionTrigger::Click,
        InteractionTrigger::KeyDown,
    ];

    pub fn event_name(self) -> Option<&'static str> {
        match self {
            InteractionTrigger::Scroll => Some("scroll"),
            InteractionTrigger::PointerMove => Some("pointermove"),
            InteractionTrigger::TouchStart => Some("touchstart"),
            InteractionTrigger::Click => Some("click"),
            InteractionTrigger::KeyDown => Some("keydown"),
            InteractionTrigger::Timeout => None,
        }
    }

    /// Inverse of `event_name` for the listened triggers.
    pub fn from_event_name(name: &str) -> Option<Self> {
        Self::LISTENED
            .into_iter()
            .find(|trigger| trigger.event_name() == Some(name))
    }
}

/// Shared by a group of one-shot listeners: only the first `fire` returns true.
#[derive(Debug, Default)]
pub struct OneShotLatch {
    fired: Cell<bool>,
}

impl OneShotLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fire(&self) -> bool {
        !self.fired.replace(true)
    }

    #[allow(dead_code)]
    pub fn has_fired(&self) -> bool {
        self.fired.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_lets_exactly_one_listener_through() {
        let latch = OneShotLatch::new();
        assert!(!latch.has_fired());
        let passed = InteractionTrigger::LISTENED
            .iter()
            .filter(|_| latch.fire())
            .count();
        assert_eq!(passed, 1);
        assert!(latch.has_fired());
    }

    #[test]
    fn only_the_timer_has_no_event_name() {
        for trigger in InteractionTrigger::LISTENED {
            assert!(trigger.event_name().is_some());
        }
        assert_eq!(InteractionTrigger::Timeout.event_name(), None);
        assert_eq!(InteractionTrigger::PointerMove.event_name(), Some("pointermove"));
    }

    #[test]
    fn event_names_map_back_to_triggers() {
        assert_eq!(
            InteractionTrigger::from_event_name("keydown"),
            Some(InteractionTrigger::KeyDown)
        );
        assert_eq!(InteractionTrigger::from_event_name("timeout"), None);
        assert_eq!(InteractionTrigger::from_event_name("wheel"), None);
    }
}
