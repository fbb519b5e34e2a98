//! One simulation step
//!
//! Motion, then collisions, then the level check. Nothing runs unless the
//! game is in the running phase.

use super::collision::{CollisionReport, resolve_collisions};
use super::motion::{MotionReport, update_motion};
use super::state::GameState;

/// Outcome of a step the game loop needs to act on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub motion: MotionReport,
    pub collisions: CollisionReport,
    /// New level, if the step changed it
    pub level_changed: Option<u32>,
}

impl TickReport {
    /// Power-ups picked up this step
    pub fn power_ups_collected(&self) -> u32 {
        self.collisions.power_ups_collected
    }
}

/// Advance the game state by one step
pub fn tick(state: &mut GameState) -> TickReport {
    if !state.is_running() {
        return TickReport::default();
    }

    state.time_ticks += 1;

    let motion = update_motion(state);

    // Escaped enemies may have ended the game
    let collisions = if state.is_running() {
        resolve_collisions(state)
    } else {
        CollisionReport::default()
    };

    let level_changed = state.update_level();
    if let Some(level) = level_changed {
        log::info!("Level {} reached at score {}", level, state.score);
    }

    TickReport {
        motion,
        collisions,
        level_changed,
    }
}
