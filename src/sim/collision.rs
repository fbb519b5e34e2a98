//! Collision resolution between bullets, enemies, power-ups and the player
//!
//! Every pass scans first and removes afterwards, so no entity is skipped or
//! handled twice while a store shrinks.

use super::geometry::is_colliding;
use super::state::{EntityId, GameEvent, GameState};
use crate::consts::*;

/// What happened during one collision pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Bullets consumed by a hit
    pub bullet_hits: u32,
    /// Enemies whose health reached zero
    pub enemies_destroyed: Vec<EntityId>,
    /// Enemies that rammed the player
    pub player_hits: u32,
    /// Power-ups picked up by the player
    pub power_ups_collected: u32,
}

/// Resolve all collisions for one step, in order:
/// bullets vs enemies, enemies vs player, power-ups vs player
pub fn resolve_collisions(state: &mut GameState) -> CollisionReport {
    let mut report = CollisionReport::default();
    resolve_bullet_hits(state, &mut report);
    resolve_player_hits(state, &mut report);
    // The end state stays frozen once contact ends the game
    if state.is_running() {
        resolve_power_up_pickups(state, &mut report);
    }
    report
}

/// Each bullet damages the first live enemy it overlaps and is consumed
fn resolve_bullet_hits(state: &mut GameState, report: &mut CollisionReport) {
    let mut spent: Vec<EntityId> = Vec::new();
    let mut points: u64 = 0;

    for bullet in &state.bullets {
        let bullet_rect = bullet.rect();
        let Some(enemy) = state
            .enemies
            .iter_mut()
            .find(|e| e.is_alive() && is_colliding(&bullet_rect, &e.rect()))
        else {
            continue;
        };

        spent.push(bullet.id);
        enemy.health -= BULLET_DAMAGE;
        if enemy.is_alive() {
            state.events.push(GameEvent::EnemyDamaged {
                id: enemy.id,
                health: enemy.health,
            });
        } else {
            report.enemies_destroyed.push(enemy.id);
            points += enemy.kind.score_value();
        }
    }

    if spent.is_empty() {
        return;
    }
    report.bullet_hits = spent.len() as u32;

    state.bullets.retain(|b| !spent.contains(&b.id));
    state.enemies.retain(|e| e.is_alive());
    for &id in spent.iter().chain(report.enemies_destroyed.iter()) {
        state.emit(GameEvent::Removed { id });
    }

    if points > 0 {
        state.increase_score(points);
    }
}

/// Enemies touching the player are destroyed and hurt the player
fn resolve_player_hits(state: &mut GameState, report: &mut CollisionReport) {
    let player_rect = state.player.rect();
    let rammed: Vec<EntityId> = state
        .enemies
        .iter()
        .filter(|e| is_colliding(&player_rect, &e.rect()))
        .map(|e| e.id)
        .collect();

    if rammed.is_empty() {
        return;
    }

    state.enemies.retain(|e| !rammed.contains(&e.id));
    for &id in &rammed {
        state.emit(GameEvent::Removed { id });
        state.decrease_player_health(CONTACT_PENALTY);
    }
    report.player_hits = rammed.len() as u32;
}

/// Power-ups touching the player are consumed
fn resolve_power_up_pickups(state: &mut GameState, report: &mut CollisionReport) {
    let player_rect = state.player.rect();
    let collected: Vec<EntityId> = state
        .power_ups
        .iter()
        .filter(|p| is_colliding(&player_rect, &p.rect()))
        .map(|p| p.id)
        .collect();

    if collected.is_empty() {
        return;
    }

    state.power_ups.retain(|p| !collected.contains(&p.id));
    for &id in &collected {
        state.emit(GameEvent::Removed { id });
    }
    report.power_ups_collected = collected.len() as u32;
}
