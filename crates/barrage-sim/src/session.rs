//! Round/life tracking and the termination predicate.
//!
//! Score and round live here; lives live on the `Player` components so the
//! collision system can update them in place.

use hecs::World;
use tracing::info;

use barrage_core::components::Player;
use barrage_core::events::GameEvent;

/// Aggregate session state tracked by the engine.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Only increases, and only through `award`.
    pub score: u64,
    /// Starts at 1. Nothing advances it automatically.
    pub round: u32,
    terminal_emitted: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            score: 0,
            round: 1,
            terminal_emitted: false,
        }
    }
}

impl SessionState {
    /// Credit the score value of one destroyed enemy.
    pub fn award(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    pub fn advance_round(&mut self) {
        self.round = self.round.saturating_add(1);
        info!(round = self.round, "round advanced");
    }

    pub fn is_terminated(&self) -> bool {
        self.terminal_emitted
    }

    /// Latch termination and emit the terminal event.
    ///
    /// Returns `true` only for the call that actually latched, so the event
    /// is emitted once no matter how many players drop to zero in one tick.
    pub fn terminate(&mut self, events: &mut Vec<GameEvent>) -> bool {
        if self.terminal_emitted {
            return false;
        }
        self.terminal_emitted = true;
        events.push(GameEvent::SessionTerminated {
            final_score: self.score,
        });
        info!(final_score = self.score, round = self.round, "session terminated");
        true
    }
}

/// Termination predicate: there is at least one player and none has lives left.
pub fn all_eliminated(world: &World) -> bool {
    let mut query = world.query::<&Player>();
    let mut players = query.iter().peekable();
    players.peek().is_some() && players.all(|(_, player)| player.lives == 0)
}
