//! Sky Shooter - a browser arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, collisions, spawning, game state)
//! - `game`: Frame-driven game loop driver and timers
//! - `platform`: Presentation boundary (headless and DOM presenters)
//! - `media`: Background video/music control
//! - `settings`: Variant presets and feature flags

pub mod game;
#[cfg(target_arch = "wasm32")]
pub mod media;
pub mod platform;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use settings::{GameVariant, Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Minimum elapsed time between simulation steps (~60 Hz)
    pub const SIM_STEP_MS: f64 = 16.0;
    /// Maximum timer firings handled per frame to prevent spiral of death
    pub const MAX_CATCH_UP: u32 = 8;

    /// Spawner intervals
    pub const BULLET_INTERVAL_MS: f64 = 200.0;
    pub const ENEMY_BASE_INTERVAL_MS: f64 = 1000.0;
    pub const POWER_UP_INTERVAL_MS: f64 = 15_000.0;
    /// Length of the score multiplier window
    pub const MULTIPLIER_DURATION_MS: f64 = 10_000.0;

    /// Bullets climb 1% of the playfield height per step
    pub const BULLET_SPEED_FRACTION: f32 = 0.01;
    /// Enemies fall 0.5% of the playfield height per step (before kind factor)
    pub const ENEMY_SPEED_FRACTION: f32 = 0.005;
    /// Power-ups fall 2 px every 50 ms
    pub const POWER_UP_FALL_PX: f32 = 0.64;

    /// Player health at the start of a run
    pub const STARTING_HEALTH: i32 = 100;
    /// Damage a single bullet deals to an enemy
    pub const BULLET_DAMAGE: i32 = 10;
    /// Health lost when an enemy leaves through the bottom edge
    pub const ESCAPE_PENALTY: i32 = 10;
    /// Health lost when an enemy touches the player
    pub const CONTACT_PENALTY: i32 = 20;

    /// Score needed per level
    pub const POINTS_PER_LEVEL: u64 = 100;
    /// Score multiplier while a power-up is active
    pub const BOOSTED_MULTIPLIER: u32 = 2;

    /// Music volume after the game ends
    pub const GAME_OVER_VOLUME: f64 = 0.5;
}
