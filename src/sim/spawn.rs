//! Entity spawning
//!
//! Each function creates one entity and is a no-op unless the game is running.
//! When they fire is decided by the timers in `sim::schedule`.

use glam::Vec2;
use rand::Rng;

use super::state::{Bullet, EntityId, EntityKind, Enemy, EnemyKind, GameEvent, GameState, PowerUp};

/// Random x for a box of `width` at the top edge
fn random_top_x(state: &mut GameState, width: f32) -> f32 {
    let span = (state.playfield.width - width).max(0.0);
    state.rng().random::<f32>() * span
}

/// Fire one bullet from the centre of the player's top edge
pub fn spawn_bullet(state: &mut GameState) -> Option<EntityId> {
    if !state.is_running() {
        return None;
    }

    let size = state.sizes.bullet;
    let player = state.player.rect();
    let pos = Vec2::new(player.center_x() - size.x / 2.0, player.top());

    let id = state.next_entity_id();
    let bullet = Bullet { id, pos, size };
    state.emit(GameEvent::Spawned {
        id,
        kind: EntityKind::Bullet,
        rect: bullet.rect(),
        health: 0,
    });
    state.bullets.push(bullet);
    Some(id)
}

/// Drop one enemy in at a random spot along the top edge
pub fn spawn_enemy(state: &mut GameState) -> Option<EntityId> {
    if !state.is_running() {
        return None;
    }

    let kind = if state.enemy_variety {
        let roll = state.rng().random::<f32>();
        EnemyKind::from_roll(roll)
    } else {
        EnemyKind::Normal
    };

    let size = state.sizes.enemy;
    let x = random_top_x(state, size.x);
    let id = state.next_entity_id();
    let enemy = Enemy {
        id,
        kind,
        pos: Vec2::new(x, 0.0),
        size,
        health: kind.initial_health(),
    };
    log::debug!("Spawned {} enemy {} at x={:.0}", kind.as_str(), id, x);
    state.emit(GameEvent::Spawned {
        id,
        kind: EntityKind::Enemy(kind),
        rect: enemy.rect(),
        health: enemy.health,
    });
    state.enemies.push(enemy);
    Some(id)
}

/// Drop one power-up in at a random spot along the top edge
pub fn spawn_power_up(state: &mut GameState) -> Option<EntityId> {
    if !state.is_running() {
        return None;
    }

    let size = state.sizes.power_up;
    let x = random_top_x(state, size.x);
    let id = state.next_entity_id();
    let power_up = PowerUp {
        id,
        pos: Vec2::new(x, 0.0),
        size,
    };
    log::debug!("Spawned power-up {} at x={:.0}", id, x);
    state.emit(GameEvent::Spawned {
        id,
        kind: EntityKind::PowerUp,
        rect: power_up.rect(),
        health: 0,
    });
    state.power_ups.push(power_up);
    Some(id)
}
