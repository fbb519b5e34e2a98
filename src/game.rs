//! Game loop driver
//!
//! Owns the simulation state, the spawner timers and the frame rate limiter.
//! The platform layer calls `frame` on every display refresh and forwards
//! pointer input; everything else happens here.

use glam::Vec2;

use crate::consts::*;
use crate::platform::Presenter;
use crate::settings::Settings;
use crate::sim::{
    GameEvent, GamePhase, GameState, Playfield, TickReport, Timers, spawn_bullet, spawn_enemy,
    spawn_power_up, tick,
};

/// Game instance holding all state
#[derive(Debug, Clone)]
pub struct Game {
    settings: Settings,
    state: GameState,
    timers: Timers,
    /// Timestamp of the last simulation step (or of the first frame)
    last_step_ms: Option<f64>,
    /// A touch gesture is in progress
    touching: bool,
}

impl Game {
    pub fn new(settings: Settings, playfield: Playfield, seed: u64) -> Self {
        let state = GameState::new(seed, &settings, playfield);
        let timers = Timers::new(&settings);
        Self {
            settings,
            state,
            timers,
            last_step_ms: None,
            touching: false,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable state access for scripted scenarios
    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    /// Leave the start screen; returns false if the game already started
    pub fn start(&mut self, now: f64) -> bool {
        if self.state.phase != GamePhase::NotStarted {
            log::warn!("Start ignored in phase {:?}", self.state.phase);
            return false;
        }
        self.begin_run(now);
        log::info!("Game started (seed {})", self.state.seed);
        true
    }

    /// Start a fresh run after game over; returns false unless the game ended
    pub fn restart(&mut self, now: f64, seed: u64) -> bool {
        if self.state.phase != GamePhase::Ended {
            log::warn!("Restart ignored in phase {:?}", self.state.phase);
            return false;
        }
        self.state.reset(seed);
        self.begin_run(now);
        log::info!("Game restarted with seed: {}", seed);
        true
    }

    fn begin_run(&mut self, now: f64) {
        self.touching = false;
        self.last_step_ms = Some(now);
        self.state.begin();
        self.timers.start_all(now, self.state.level);
    }

    /// Frame callback: fire due timers, then run at most one simulation step
    pub fn frame(&mut self, now: f64) {
        let last = *self.last_step_ms.get_or_insert(now);

        if self.state.is_running() {
            self.fire_timers(now);
        }

        if now - last > SIM_STEP_MS {
            if self.state.is_running() {
                let report = tick(&mut self.state);
                self.after_step(&report, now);
            }
            self.last_step_ms = Some(now);
        }

        if self.state.phase == GamePhase::Ended && self.timers.any_armed() {
            self.timers.cancel_all();
        }
    }

    fn fire_timers(&mut self, now: f64) {
        if self.timers.multiplier_reset.poll(now) {
            self.state.set_multiplier(1);
            log::debug!("Score multiplier expired");
        }

        for _ in 0..self.timers.bullets.poll(now) {
            spawn_bullet(&mut self.state);
        }
        for _ in 0..self.timers.enemies.poll(now) {
            spawn_enemy(&mut self.state);
        }
        for _ in 0..self.timers.power_ups.poll(now) {
            spawn_power_up(&mut self.state);
        }
    }

    fn after_step(&mut self, report: &TickReport, now: f64) {
        if !self.state.is_running() {
            return;
        }

        if report.power_ups_collected() > 0 {
            self.activate_multiplier(now);
        }
        if let Some(level) = report.level_changed {
            self.timers.on_level_changed(level, now);
        }
    }

    /// Double score gains for the multiplier window, measured from `now`
    ///
    /// A second activation inside the window restarts it instead of stacking.
    pub fn activate_multiplier(&mut self, now: f64) {
        if !self.state.is_running() {
            return;
        }
        self.state.set_multiplier(BOOSTED_MULTIPLIER);
        self.timers
            .multiplier_reset
            .arm(now + self.settings.multiplier_duration_ms);
        log::debug!("Score multiplier active until {:.0}", now + self.settings.multiplier_duration_ms);
    }

    /// Playfield resized by the presentation layer
    pub fn set_playfield(&mut self, playfield: Playfield) {
        self.state.set_playfield(playfield);
    }

    /// Mouse/pointer moved to playfield-relative coordinates
    pub fn pointer_moved(&mut self, point: Option<(f32, f32)>) {
        if !self.state.is_running() {
            return;
        }
        let Some((x, y)) = point else {
            return;
        };
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        self.state.move_player_to(Vec2::new(x, y));
    }

    pub fn touch_start(&mut self, point: Option<(f32, f32)>) {
        self.touching = true;
        self.pointer_moved(point);
    }

    pub fn touch_move(&mut self, point: Option<(f32, f32)>) {
        if self.touching {
            self.pointer_moved(point);
        }
    }

    pub fn touch_end(&mut self) {
        self.touching = false;
    }

    /// Take all events queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    /// Hand queued events to the presentation layer
    pub fn present<P: Presenter + ?Sized>(&mut self, presenter: &mut P) {
        for event in self.state.drain_events() {
            presenter.apply(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GameVariant;
    use crate::sim::{Bullet, Enemy, EnemyKind, PowerUp};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn game(variant: GameVariant) -> Game {
        Game::new(
            Settings::from_preset(variant),
            Playfield::new(400.0, 600.0),
            2024,
        )
    }

    /// Run frames at 60 Hz from `from` (exclusive) up to `to` (inclusive)
    fn run_frames(game: &mut Game, from: f64, to: f64) -> f64 {
        let mut now = from;
        while now + FRAME_MS <= to {
            now += FRAME_MS;
            game.frame(now);
        }
        now
    }

    #[test]
    fn test_nothing_happens_before_start() {
        let mut game = game(GameVariant::Arcade);
        run_frames(&mut game, 0.0, 5_000.0);
        assert_eq!(game.phase(), GamePhase::NotStarted);
        assert!(game.state().bullets.is_empty());
        assert!(game.state().enemies.is_empty());
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_start_only_once() {
        let mut game = game(GameVariant::Arcade);
        assert!(game.start(0.0));
        assert!(!game.start(10.0));
        assert_eq!(game.phase(), GamePhase::Running);

        let events = game.drain_events();
        assert_eq!(events[0], GameEvent::Started);
        assert!(events.contains(&GameEvent::HealthChanged(100)));
        assert!(events.contains(&GameEvent::ScoreChanged(0)));
        assert!(events.contains(&GameEvent::LevelChanged(1)));
    }

    #[test]
    fn test_spawners_fire_while_running() {
        let mut game = game(GameVariant::Arcade);
        game.start(0.0);
        // Keep the player clear of the falling enemies
        game.state_mut().player.pos = Vec2::new(0.0, 550.0);
        game.state_mut().player_health = 1_000_000;
        run_frames(&mut game, 0.0, 1_100.0);

        let state = game.state();
        assert!(!state.bullets.is_empty());
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn test_rate_limiter_gates_steps() {
        let mut game = game(GameVariant::Classic);
        game.start(0.0);

        game.frame(10.0);
        assert_eq!(game.state().time_ticks, 0);
        game.frame(16.0);
        assert_eq!(game.state().time_ticks, 0);
        game.frame(16.5);
        assert_eq!(game.state().time_ticks, 1);
        // A long stall still runs a single step
        game.frame(500.0);
        assert_eq!(game.state().time_ticks, 2);
        game.frame(510.0);
        assert_eq!(game.state().time_ticks, 2);
    }

    #[test]
    fn test_pointer_moves_player_inside_playfield() {
        let mut game = game(GameVariant::Classic);
        game.pointer_moved(Some((100.0, 100.0)));
        assert_eq!(game.state().player.pos, Vec2::new(175.0, 480.0));

        game.start(0.0);
        game.pointer_moved(Some((100.0, 100.0)));
        assert_eq!(game.state().player.pos, Vec2::new(75.0, 75.0));

        game.pointer_moved(Some((-50.0, 9_999.0)));
        assert_eq!(game.state().player.pos, Vec2::new(0.0, 550.0));

        game.pointer_moved(None);
        game.pointer_moved(Some((f32::NAN, 10.0)));
        assert_eq!(game.state().player.pos, Vec2::new(0.0, 550.0));
    }

    #[test]
    fn test_touch_moves_only_while_touching() {
        let mut game = game(GameVariant::Classic);
        game.start(0.0);

        game.touch_move(Some((100.0, 100.0)));
        assert_eq!(game.state().player.pos, Vec2::new(175.0, 480.0));

        game.touch_start(Some((200.0, 200.0)));
        assert_eq!(game.state().player.pos, Vec2::new(175.0, 175.0));
        game.touch_move(Some((300.0, 300.0)));
        assert_eq!(game.state().player.pos, Vec2::new(275.0, 275.0));

        game.touch_end();
        game.touch_move(Some((100.0, 100.0)));
        assert_eq!(game.state().player.pos, Vec2::new(275.0, 275.0));
    }

    /// Kill a 10-health enemy at score 95 on the first step, crossing into level 2
    fn score_level_up(game: &mut Game) {
        game.start(0.0);
        let state = game.state_mut();
        state.score = 95;
        let enemy = state.next_entity_id();
        state.enemies.push(Enemy {
            id: enemy,
            kind: EnemyKind::Normal,
            pos: Vec2::new(100.0, 100.0),
            size: Vec2::new(40.0, 40.0),
            health: 10,
        });
        let bullet = state.next_entity_id();
        state.bullets.push(Bullet {
            id: bullet,
            pos: Vec2::new(110.0, 120.0),
            size: Vec2::new(5.0, 15.0),
        });
        game.frame(17.0);
    }

    #[test]
    fn test_level_up_reschedules_enemy_spawner() {
        let mut arcade = game(GameVariant::Arcade);
        score_level_up(&mut arcade);
        assert_eq!(arcade.state().level, 2);
        let expected = ENEMY_BASE_INTERVAL_MS / 2f64.sqrt();
        assert!((arcade.timers().enemies.interval_ms() - expected).abs() < 1e-9);
        // Countdown restarts from the step that changed the level
        let mut timers = arcade.timers().clone();
        assert_eq!(timers.enemies.poll(17.0 + expected - 1.0), 0);
        assert_eq!(timers.enemies.poll(17.0 + expected), 1);

        let mut classic = game(GameVariant::Classic);
        score_level_up(&mut classic);
        assert_eq!(classic.state().level, 2);
        assert_eq!(classic.timers().enemies.interval_ms(), ENEMY_BASE_INTERVAL_MS);
    }

    #[test]
    fn test_multiplier_window_restarts_on_second_pickup() {
        let mut game = game(GameVariant::Arcade);
        game.start(0.0);
        game.state_mut().player_health = 1_000_000;

        game.activate_multiplier(0.0);
        assert_eq!(game.state().multiplier, 2);
        game.frame(5_000.0);
        game.activate_multiplier(5_000.0);
        assert_eq!(game.state().multiplier, 2);

        // The first window would have closed at 10 s
        game.frame(12_000.0);
        assert_eq!(game.state().multiplier, 2);
        game.frame(14_999.0);
        assert_eq!(game.state().multiplier, 2);
        game.frame(15_000.0);
        assert_eq!(game.state().multiplier, 1);

        let changes: Vec<_> = game
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::MultiplierChanged(_)))
            .collect();
        assert_eq!(
            changes,
            vec![
                GameEvent::MultiplierChanged(1),
                GameEvent::MultiplierChanged(2),
                GameEvent::MultiplierChanged(1)
            ]
        );
    }

    #[test]
    fn test_power_up_pickup_activates_multiplier() {
        let mut game = game(GameVariant::Arcade);
        game.start(0.0);
        let player = game.state().player.rect();
        let state = game.state_mut();
        let id = state.next_entity_id();
        state.power_ups.push(PowerUp {
            id,
            pos: player.pos,
            size: Vec2::new(30.0, 30.0),
        });

        game.frame(17.0);
        assert_eq!(game.state().multiplier, 2);
        assert!(game.timers().multiplier_reset.is_armed());
        assert!(game.state().power_ups.is_empty());
    }

    #[test]
    fn test_game_over_cancels_timers_and_freezes() {
        let mut game = game(GameVariant::Arcade);
        game.start(0.0);
        game.activate_multiplier(0.0);

        let player = game.state().player.rect();
        let state = game.state_mut();
        state.player_health = 20;
        let id = state.next_entity_id();
        state.enemies.push(Enemy {
            id,
            kind: EnemyKind::Normal,
            pos: player.pos,
            size: Vec2::new(40.0, 40.0),
            health: 30,
        });

        game.frame(17.0);
        assert_eq!(game.phase(), GamePhase::Ended);
        assert!(!game.timers().any_armed());
        assert_eq!(game.state().multiplier, 2);

        let frozen_ticks = game.state().time_ticks;
        let bullets = game.state().bullets.len();
        run_frames(&mut game, 17.0, 5_000.0);
        assert_eq!(game.state().time_ticks, frozen_ticks);
        assert_eq!(game.state().bullets.len(), bullets);

        let endings = game
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::Ended { .. }))
            .count();
        assert_eq!(endings, 1);
    }

    #[test]
    fn test_health_scenario_through_the_loop() {
        let mut game = game(GameVariant::Classic);
        game.start(0.0);
        game.state_mut().player.pos = Vec2::new(0.0, 550.0);

        let push_escaping = |game: &mut Game, x: f32| {
            let state = game.state_mut();
            let id = state.next_entity_id();
            state.enemies.push(Enemy {
                id,
                kind: EnemyKind::Normal,
                pos: Vec2::new(x, 599.0),
                size: Vec2::new(40.0, 40.0),
                health: 30,
            });
        };

        for _ in 0..3 {
            push_escaping(&mut game, 300.0);
        }
        game.frame(17.0);
        assert_eq!(game.state().player_health, 70);
        assert_eq!(game.phase(), GamePhase::Running);

        let mut now = 17.0;
        while game.phase() == GamePhase::Running {
            push_escaping(&mut game, 300.0);
            // And one enemy right on top of the player
            let player = game.state().player.rect();
            let state = game.state_mut();
            let id = state.next_entity_id();
            state.enemies.push(Enemy {
                id,
                kind: EnemyKind::Normal,
                pos: player.pos,
                size: Vec2::new(40.0, 40.0),
                health: 30,
            });
            now += 17.0;
            game.frame(now);
        }

        assert!(game.state().player_health <= 0);
        let endings = game
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::Ended { .. }))
            .count();
        assert_eq!(endings, 1);
    }

    #[test]
    fn test_restart_clears_everything() {
        let mut game = game(GameVariant::Arcade);
        assert!(!game.restart(0.0, 1));

        game.start(0.0);
        game.state_mut().player.pos = Vec2::new(0.0, 550.0);
        let end = run_frames(&mut game, 0.0, 3_000.0);
        game.activate_multiplier(end);
        game.state_mut().score = 250;
        game.state_mut().decrease_player_health(1_000);
        game.frame(end + 17.0);
        assert_eq!(game.phase(), GamePhase::Ended);
        assert!(!game.timers().any_armed());
        assert!(!game.state().bullets.is_empty());
        game.drain_events();

        assert!(game.restart(10_000.0, 99));
        let state = game.state();
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.bullets.is_empty() && state.enemies.is_empty() && state.power_ups.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.player_health, 100);
        assert_eq!(state.level, 1);
        assert_eq!(state.multiplier, 1);
        assert!(game.timers().bullets.is_armed());
        assert!(!game.timers().multiplier_reset.is_armed());

        let events = game.drain_events();
        let started = events.iter().position(|e| *e == GameEvent::Started).unwrap();
        assert!(events[..started].iter().all(|e| matches!(e, GameEvent::Removed { .. })));
        assert!(started > 0);

        // Spawning resumes
        game.state_mut().player.pos = Vec2::new(0.0, 550.0);
        run_frames(&mut game, 10_000.0, 10_500.0);
        assert!(!game.state().bullets.is_empty());
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = game(GameVariant::Arcade);
        let mut b = game(GameVariant::Arcade);
        for g in [&mut a, &mut b] {
            g.start(0.0);
            g.state_mut().player_health = 1_000_000;
            run_frames(g, 0.0, 20_000.0);
        }
        assert_eq!(a.state().score, b.state().score);
        assert_eq!(a.state().enemies.len(), b.state().enemies.len());
        assert_eq!(a.drain_events(), b.drain_events());
    }
}
