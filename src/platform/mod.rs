//! Platform abstraction layer
//!
//! The game core only produces `GameEvent`s. A `Presenter` mirrors them:
//! - `HeadlessPresenter` keeps a summary (native runner, tests)
//! - `web::DomPresenter` drives DOM elements (browser only)

use std::collections::HashMap;

use serde::Serialize;

use crate::sim::{EntityId, EntityKind, GameEvent};

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Consumer of the game event stream
pub trait Presenter {
    fn apply(&mut self, event: &GameEvent);
}

/// Totals of a presented run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub events: u64,
    pub runs_started: u32,
    pub bullets_spawned: u32,
    pub enemies_spawned: u32,
    pub power_ups_spawned: u32,
    pub enemy_hits: u32,
    /// Entities currently on screen
    pub live_entities: usize,
    pub score: u64,
    pub health: i32,
    pub level: u32,
    pub multiplier: u32,
    pub final_score: Option<u64>,
}

/// Presenter without a display
#[derive(Debug, Default)]
pub struct HeadlessPresenter {
    summary: RunSummary,
    live: HashMap<EntityId, EntityKind>,
    /// Keep every event as a JSON line
    record: bool,
    lines: Vec<String>,
}

impl HeadlessPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Presenter that also records every event as JSON
    pub fn recording() -> Self {
        Self {
            record: true,
            ..Self::default()
        }
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Kind of a live entity
    pub fn entity(&self, id: EntityId) -> Option<EntityKind> {
        self.live.get(&id).copied()
    }
}

impl Presenter for HeadlessPresenter {
    fn apply(&mut self, event: &GameEvent) {
        self.summary.events += 1;

        match event {
            GameEvent::Started => {
                self.summary.runs_started += 1;
                self.summary.final_score = None;
            }
            GameEvent::Spawned { id, kind, .. } => {
                match kind {
                    EntityKind::Bullet => self.summary.bullets_spawned += 1,
                    EntityKind::Enemy(_) => self.summary.enemies_spawned += 1,
                    EntityKind::PowerUp => self.summary.power_ups_spawned += 1,
                }
                self.live.insert(*id, *kind);
            }
            GameEvent::Removed { id } => {
                if self.live.remove(id).is_none() {
                    log::warn!("Removed unknown entity {}", id);
                }
            }
            GameEvent::EnemyDamaged { .. } => self.summary.enemy_hits += 1,
            GameEvent::ScoreChanged(score) => self.summary.score = *score,
            GameEvent::HealthChanged(health) => self.summary.health = *health,
            GameEvent::LevelChanged(level) => self.summary.level = *level,
            GameEvent::MultiplierChanged(multiplier) => self.summary.multiplier = *multiplier,
            GameEvent::Ended { final_score } => {
                log::info!("Game over, final score {}", final_score);
                self.summary.final_score = Some(*final_score);
            }
            GameEvent::Moved { .. } | GameEvent::PlayerMoved { .. } => {}
        }
        self.summary.live_entities = self.live.len();

        if self.record {
            match serde_json::to_string(event) {
                Ok(line) => self.lines.push(line),
                Err(e) => log::warn!("Failed to encode event: {}", e),
            }
        }
    }
}
