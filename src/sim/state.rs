//! Game state and core simulation types
//!
//! Score, health and level bookkeeping lives on `GameState`; everything the
//! presentation layer must mirror is queued as a `GameEvent`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::{Playfield, Rect};
use crate::consts::*;
use crate::settings::{EntitySizes, Settings};

/// Unique id of a bullet, enemy or power-up within a run
pub type EntityId = u32;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start screen, nothing spawns
    NotStarted,
    /// Active gameplay
    Running,
    /// Player health reached zero; frozen until restart
    Ended,
}

/// Enemy tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Normal,
    Fast,
    Boss,
}

impl EnemyKind {
    /// Pick a kind from a uniform roll in [0, 1): 60% normal, 30% fast, 10% boss
    pub fn from_roll(roll: f32) -> Self {
        if roll < 0.6 {
            EnemyKind::Normal
        } else if roll < 0.9 {
            EnemyKind::Fast
        } else {
            EnemyKind::Boss
        }
    }

    pub fn initial_health(&self) -> i32 {
        match self {
            EnemyKind::Normal => 30,
            EnemyKind::Fast => 20,
            EnemyKind::Boss => 100,
        }
    }

    /// Multiplier on the base enemy fall speed
    pub fn speed_factor(&self) -> f32 {
        match self {
            EnemyKind::Normal => 1.0,
            EnemyKind::Fast => 1.5,
            EnemyKind::Boss => 0.7,
        }
    }

    /// Points awarded on destruction (before the score multiplier)
    pub fn score_value(&self) -> u64 {
        match self {
            EnemyKind::Normal | EnemyKind::Fast => 10,
            EnemyKind::Boss => 30,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Normal => "normal",
            EnemyKind::Fast => "fast",
            EnemyKind::Boss => "boss",
        }
    }
}

/// Type tag carried by spawn events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Bullet,
    Enemy(EnemyKind),
    PowerUp,
}

/// A player bullet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: EntityId,
    pub pos: Vec2,
    pub size: Vec2,
}

impl Bullet {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// A descending enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub health: i32,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

/// A descending score-multiplier pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: EntityId,
    pub pos: Vec2,
    pub size: Vec2,
}

impl PowerUp {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Player {
    /// Player placed at its starting spot: centred, 80% down the playfield
    pub fn new(size: Vec2, playfield: &Playfield) -> Self {
        let pos = Vec2::new(
            playfield.width / 2.0 - size.x / 2.0,
            playfield.height * 0.8,
        );
        Self {
            pos: playfield.clamp_box(pos, size),
            size,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// Changes the presentation layer mirrors, in the order they happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Spawned {
        id: EntityId,
        kind: EntityKind,
        rect: Rect,
        /// Enemy health, 0 for other kinds
        health: i32,
    },
    Moved { id: EntityId, pos: Vec2 },
    Removed { id: EntityId },
    EnemyDamaged { id: EntityId, health: i32 },
    PlayerMoved { pos: Vec2 },
    ScoreChanged(u64),
    HealthChanged(i32),
    LevelChanged(u32),
    MultiplierChanged(u32),
    Ended { final_score: u64 },
}

/// Level reached at a given score
#[inline]
pub fn level_for_score(score: u64) -> u32 {
    (score / POINTS_PER_LEVEL + 1) as u32
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub score: u64,
    /// May dip below zero on the tick that ends the game
    pub player_health: i32,
    pub level: u32,
    /// 1 normally, 2 while a power-up window is open
    pub multiplier: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub playfield: Playfield,
    pub sizes: EntitySizes,
    /// Spawn normal/fast/boss enemies instead of normal only
    pub enemy_variety: bool,
    pub player: Player,
    /// Active bullets (insertion order)
    pub bullets: Vec<Bullet>,
    /// Active enemies (insertion order)
    pub enemies: Vec<Enemy>,
    /// Active power-ups (insertion order)
    pub power_ups: Vec<PowerUp>,
    rng: Pcg32,
    /// Pending presentation events (split-borrowed by the motion and collision passes)
    pub(crate) events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
    starting_health: i32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, settings: &Settings, playfield: Playfield) -> Self {
        Self {
            seed,
            phase: GamePhase::NotStarted,
            score: 0,
            player_health: settings.starting_health,
            level: 1,
            multiplier: 1,
            time_ticks: 0,
            playfield,
            sizes: settings.sizes,
            enemy_variety: settings.enemy_variety,
            player: Player::new(settings.sizes.player, &playfield),
            bullets: Vec::new(),
            enemies: Vec::new(),
            power_ups: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
            starting_health: settings.starting_health,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Queue an event for the presentation layer
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events queued since the last drain
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Enter the running phase and publish the initial HUD values
    ///
    /// The player starts from the centre of the current playfield.
    pub fn begin(&mut self) {
        self.phase = GamePhase::Running;
        self.player = Player::new(self.sizes.player, &self.playfield);
        self.emit(GameEvent::Started);
        self.emit(GameEvent::ScoreChanged(self.score));
        self.emit(GameEvent::HealthChanged(self.player_health));
        self.emit(GameEvent::LevelChanged(self.level));
        self.emit(GameEvent::MultiplierChanged(self.multiplier));
        self.emit(GameEvent::PlayerMoved {
            pos: self.player.pos,
        });
    }

    /// Drop every entity and reset counters for a fresh run
    ///
    /// Removal events for the old entities stay queued ahead of anything
    /// the new run emits.
    pub fn reset(&mut self, seed: u64) {
        let stale: Vec<EntityId> = self
            .bullets
            .iter()
            .map(|b| b.id)
            .chain(self.enemies.iter().map(|e| e.id))
            .chain(self.power_ups.iter().map(|p| p.id))
            .collect();
        for id in stale {
            self.emit(GameEvent::Removed { id });
        }
        self.bullets.clear();
        self.enemies.clear();
        self.power_ups.clear();

        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.phase = GamePhase::NotStarted;
        self.score = 0;
        self.player_health = self.starting_health;
        self.level = 1;
        self.multiplier = 1;
        self.time_ticks = 0;
        self.player = Player::new(self.sizes.player, &self.playfield);
    }

    /// Add points, scaled by the active multiplier
    pub fn increase_score(&mut self, amount: u64) {
        self.score += amount * self.multiplier as u64;
        self.emit(GameEvent::ScoreChanged(self.score));
    }

    /// Remove player health; returns true if this call ended the game
    pub fn decrease_player_health(&mut self, amount: i32) -> bool {
        self.player_health -= amount;
        self.emit(GameEvent::HealthChanged(self.player_health));

        if self.player_health <= 0 && self.phase == GamePhase::Running {
            self.phase = GamePhase::Ended;
            self.emit(GameEvent::Ended {
                final_score: self.score,
            });
            log::info!("Game over with score {}", self.score);
            return true;
        }
        false
    }

    /// Set the score multiplier (no-op if unchanged)
    pub fn set_multiplier(&mut self, multiplier: u32) {
        if self.multiplier != multiplier {
            self.multiplier = multiplier;
            self.emit(GameEvent::MultiplierChanged(multiplier));
        }
    }

    /// Recompute the level from the score; returns the new level if it changed
    pub fn update_level(&mut self) -> Option<u32> {
        let level = level_for_score(self.score);
        if level == self.level {
            return None;
        }
        self.level = level;
        self.emit(GameEvent::LevelChanged(level));
        Some(level)
    }

    /// Move the player so its centre sits on `point`, kept inside the playfield
    pub fn move_player_to(&mut self, point: Vec2) {
        let size = self.player.size;
        let pos = self.playfield.clamp_box(point - size / 2.0, size);
        if pos != self.player.pos {
            self.player.pos = pos;
            self.emit(GameEvent::PlayerMoved { pos });
        }
    }

    /// Resize the playfield, pulling the player back inside it
    pub fn set_playfield(&mut self, playfield: Playfield) {
        self.playfield = playfield;
        let pos = playfield.clamp_box(self.player.pos, self.player.size);
        if pos != self.player.pos {
            self.player.pos = pos;
            self.emit(GameEvent::PlayerMoved { pos });
        }
    }
}
