//! Collaborator seam for audio and persistence
//!
//! The engine owns one sink and calls it synchronously; implementations must
//! return quickly and must not call back into the engine.

use crate::types::{FinalStats, GameEvent};

pub trait EventSink {
    /// Sound trigger or other notification
    fn on_event(&mut self, event: GameEvent);

    /// Final record when a game ends
    fn on_game_over(&mut self, _stats: &FinalStats) {}
}

/// Sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn on_event(&mut self, _event: GameEvent) {}
}

/// Collects events in order
impl EventSink for Vec<GameEvent> {
    fn on_event(&mut self, event: GameEvent) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn on_event(&mut self, event: GameEvent) {
        (**self).on_event(event);
    }

    fn on_game_over(&mut self, stats: &FinalStats) {
        (**self).on_game_over(stats);
    }
}
