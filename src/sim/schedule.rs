//! Cancellable timers driven by frame timestamps
//!
//! Timers never run callbacks themselves: the game loop polls them with the
//! current time and acts on the number of firings that came due.

use crate::consts::MAX_CATCH_UP;
use crate::settings::Settings;

/// A periodic timer, armed by `start` and disarmed by `cancel`
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatingTimer {
    interval_ms: f64,
    next_due: Option<f64>,
}

impl RepeatingTimer {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            next_due: None,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Arm the timer; the first firing is one interval after `now`
    pub fn start(&mut self, now: f64) {
        self.next_due = Some(now + self.interval_ms);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// Change the interval and restart the countdown from `now`
    pub fn reschedule(&mut self, interval_ms: f64, now: f64) {
        self.interval_ms = interval_ms;
        self.start(now);
    }

    /// Number of firings due at `now` (at most `MAX_CATCH_UP`)
    ///
    /// Firings beyond the cap are dropped rather than replayed later.
    pub fn poll(&mut self, now: f64) -> u32 {
        let Some(mut due) = self.next_due else {
            return 0;
        };

        let mut fired = 0;
        while due <= now && fired < MAX_CATCH_UP {
            due += self.interval_ms;
            fired += 1;
        }
        if due <= now {
            // Still behind after the cap: skip ahead instead of spiralling
            due = now + self.interval_ms;
        }
        self.next_due = Some(due);
        fired
    }
}

/// A timer that fires once per arming
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OneShotTimer {
    due: Option<f64>,
}

impl OneShotTimer {
    pub fn is_armed(&self) -> bool {
        self.due.is_some()
    }

    /// Arm (or re-arm, replacing any pending deadline) for `due`
    pub fn arm(&mut self, due: f64) {
        self.due = Some(due);
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    /// True exactly once, on the first poll at or after the deadline
    pub fn poll(&mut self, now: f64) -> bool {
        match self.due {
            Some(due) if due <= now => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}

/// Enemy spawn interval for a level
pub fn enemy_interval_ms(base_ms: f64, level: u32, level_scaling: bool) -> f64 {
    if level_scaling {
        base_ms / (level.max(1) as f64).sqrt()
    } else {
        base_ms
    }
}

/// Spawner and multiplier timers owned by the game loop
#[derive(Debug, Clone)]
pub struct Timers {
    pub bullets: RepeatingTimer,
    pub enemies: RepeatingTimer,
    /// Only armed when power-ups are enabled
    pub power_ups: RepeatingTimer,
    pub multiplier_reset: OneShotTimer,
    enemy_base_ms: f64,
    level_scaling: bool,
    power_ups_enabled: bool,
}

impl Timers {
    pub fn new(settings: &Settings) -> Self {
        Self {
            bullets: RepeatingTimer::new(settings.bullet_interval_ms),
            enemies: RepeatingTimer::new(settings.enemy_interval_ms),
            power_ups: RepeatingTimer::new(settings.power_up_interval_ms),
            multiplier_reset: OneShotTimer::default(),
            enemy_base_ms: settings.enemy_interval_ms,
            level_scaling: settings.level_scaling,
            power_ups_enabled: settings.power_ups,
        }
    }

    /// Arm every spawner for a run at `level`
    pub fn start_all(&mut self, now: f64, level: u32) {
        self.bullets.start(now);
        let interval = enemy_interval_ms(self.enemy_base_ms, level, self.level_scaling);
        self.enemies.reschedule(interval, now);
        if self.power_ups_enabled {
            self.power_ups.start(now);
        }
        self.multiplier_reset.cancel();
    }

    /// Disarm every timer, including a pending multiplier reset
    pub fn cancel_all(&mut self) {
        self.bullets.cancel();
        self.enemies.cancel();
        self.power_ups.cancel();
        self.multiplier_reset.cancel();
    }

    /// Re-arm the enemy spawner for a new level
    pub fn on_level_changed(&mut self, level: u32, now: f64) {
        let interval = enemy_interval_ms(self.enemy_base_ms, level, self.level_scaling);
        if interval != self.enemies.interval_ms() {
            log::debug!("Enemy interval for level {}: {:.0} ms", level, interval);
            self.enemies.reschedule(interval, now);
        }
    }

    pub fn any_armed(&self) -> bool {
        self.bullets.is_armed()
            || self.enemies.is_armed()
            || self.power_ups.is_armed()
            || self.multiplier_reset.is_armed()
    }
}
