//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only enters through timestamps passed in by the caller
//! - Seeded RNG only
//! - Stable iteration order (store insertion order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod geometry;
pub mod motion;
pub mod schedule;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{CollisionReport, resolve_collisions};
pub use geometry::{Playfield, Rect, is_colliding};
pub use motion::{MotionReport, update_motion};
pub use schedule::{OneShotTimer, RepeatingTimer, Timers, enemy_interval_ms};
pub use spawn::{spawn_bullet, spawn_enemy, spawn_power_up};
pub use state::{
    Bullet, Enemy, EnemyKind, EntityId, EntityKind, GameEvent, GamePhase, GameState, Player,
    PowerUp, level_for_score,
};
pub use tick::{TickReport, tick};
