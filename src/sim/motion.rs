//! Linear motion and playfield exits

use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Entities that left the playfield during one motion pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionReport {
    pub bullets_expired: u32,
    pub enemies_escaped: u32,
    pub power_ups_missed: u32,
}

/// Advance every entity by one step
///
/// Escaped enemies cost the player health after all stores have moved, so
/// the penalty can end the game without skipping any entity.
pub fn update_motion(state: &mut GameState) -> MotionReport {
    let report = MotionReport {
        bullets_expired: move_bullets(state),
        enemies_escaped: move_enemies(state),
        power_ups_missed: move_power_ups(state),
    };

    for _ in 0..report.enemies_escaped {
        state.decrease_player_health(ESCAPE_PENALTY);
    }

    report
}

/// Move bullets up; drop those past the top edge
fn move_bullets(state: &mut GameState) -> u32 {
    let step = state.playfield.height * BULLET_SPEED_FRACTION;
    let events = &mut state.events;
    let mut expired = 0;

    state.bullets.retain_mut(|bullet| {
        bullet.pos.y -= step;
        if bullet.pos.y < 0.0 {
            events.push(GameEvent::Removed { id: bullet.id });
            expired += 1;
            false
        } else {
            events.push(GameEvent::Moved {
                id: bullet.id,
                pos: bullet.pos,
            });
            true
        }
    });

    expired
}

/// Move enemies down at their kind's speed; drop those past the bottom edge
fn move_enemies(state: &mut GameState) -> u32 {
    let height = state.playfield.height;
    let base = height * ENEMY_SPEED_FRACTION;
    let mut escaped = 0;

    let events = &mut state.events;
    state.enemies.retain_mut(|enemy| {
        enemy.pos.y += base * enemy.kind.speed_factor();
        if enemy.pos.y > height {
            events.push(GameEvent::Removed { id: enemy.id });
            escaped += 1;
            false
        } else {
            events.push(GameEvent::Moved {
                id: enemy.id,
                pos: enemy.pos,
            });
            true
        }
    });

    escaped
}

/// Move power-ups down; drop missed ones without penalty
fn move_power_ups(state: &mut GameState) -> u32 {
    let height = state.playfield.height;
    let mut missed = 0;

    let events = &mut state.events;
    state.power_ups.retain_mut(|power_up| {
        power_up.pos.y += POWER_UP_FALL_PX;
        if power_up.pos.y > height {
            events.push(GameEvent::Removed { id: power_up.id });
            missed += 1;
            false
        } else {
            events.push(GameEvent::Moved {
                id: power_up.id,
                pos: power_up.pos,
            });
            true
        }
    });

    missed
}
