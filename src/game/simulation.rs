//! Simulation - Engine phase machine and tick entry point
//!
//! Wraps a session in the Idle/Playing/terminal phase machine, loads and
//! persists the high score, and reports engine statistics. The engine
//! owns no timer: the host calls `tick` on its own schedule, and each
//! tick runs to completion before the next may begin.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::game::config::{CarColor, Difficulty, GameConfig};
use crate::game::presenter::Presenter;
use crate::game::session::{Direction, GameSession, GameSnapshot, TickOutcome};
use crate::game::settings::{SettingsStore, KEY_CAR_COLOR, KEY_DIFFICULTY, KEY_HIGH_SCORE};

/// Engine phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Idle,
    Playing,
    GameOver,
    OutOfFuel,
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    Collision,
    OutOfFuel,
}

/// Terminal event handed to the host when a run ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameOverReport {
    pub final_score: i32,
    pub cars_dodged: u32,
    pub high_score: i32,
    pub cause: GameOverCause,
}

/// Engine statistics for a host debug HUD.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStats {
    pub tick_interval_ms: u64,
    pub ticks: u64,
    pub avg_tick_time_ms: f32,
    pub entity_count: u32,
    pub phase: GamePhase,
}

/// Main game engine.
pub struct GameEngine {
    /// Current phase
    phase: GamePhase,
    /// Active session (if any)
    session: Option<GameSession>,
    /// Injected preference/high-score store
    settings: Box<dyn SettingsStore>,
    /// Best score across sessions, monotonic
    high_score: i32,
    /// Report for the last finished run
    report: Option<GameOverReport>,
    /// Accumulated tick execution times for averaging
    tick_times: Vec<f32>,
}

impl GameEngine {
    /// Create an engine over the given settings store.
    pub fn new(settings: Box<dyn SettingsStore>) -> Self {
        let high_score = settings.get_int(KEY_HIGH_SCORE, 0);

        Self {
            phase: GamePhase::Idle,
            session: None,
            settings,
            high_score,
            report: None,
            tick_times: Vec::with_capacity(60),
        }
    }

    /// Difficulty currently selected in the settings store.
    pub fn difficulty(&self) -> Difficulty {
        Difficulty::from_setting(&self.settings.get_string(KEY_DIFFICULTY, "Easy"))
    }

    /// Car color currently selected in the settings store.
    pub fn car_color(&self) -> CarColor {
        CarColor::from_setting(&self.settings.get_string(KEY_CAR_COLOR, "Blue"))
    }

    /// Begin a run with settings-derived difficulty.
    pub fn start(&mut self, presenter: &mut dyn Presenter, seed: u64) {
        let config = GameConfig::for_difficulty(self.difficulty()).with_seed(seed);
        self.start_with_config(presenter, config);
    }

    /// Begin a run with an explicit config.
    pub fn start_with_config(&mut self, presenter: &mut dyn Presenter, config: GameConfig) {
        presenter.set_car_sprite(self.car_color());
        log::info!(
            "run started: {:?}, tick interval {} ms",
            config.difficulty,
            config.tick_interval_ms
        );

        self.session = Some(GameSession::new(config));
        self.report = None;
        self.phase = GamePhase::Playing;
    }

    /// Re-enter Playing after a terminal phase. All mutable state is
    /// re-initialized and the car sprite re-applied.
    pub fn reset(&mut self, presenter: &mut dyn Presenter, seed: u64) {
        self.start(presenter, seed);
    }

    /// Abandon the current run and return to Idle.
    pub fn stop(&mut self, presenter: &mut dyn Presenter) {
        if let Some(session) = &mut self.session {
            session.clear_entities(presenter);
        }

        self.phase = GamePhase::Idle;
        self.session = None;
        self.report = None;
        self.tick_times.clear();
        log::info!("engine stopped");
    }

    /// Advance one timer interval and return the post-tick snapshot.
    ///
    /// Outside the Playing phase this only reports the current state.
    pub fn tick(&mut self, presenter: &mut dyn Presenter) -> Option<GameSnapshot> {
        if self.phase != GamePhase::Playing {
            return self.session.as_ref().map(|s| s.snapshot());
        }

        let tick_start = Instant::now();

        let outcome = match &mut self.session {
            Some(session) => session.tick(presenter),
            None => return None,
        };

        // Record tick time
        let tick_time = tick_start.elapsed().as_secs_f32() * 1000.0;
        self.tick_times.push(tick_time);
        if self.tick_times.len() > 60 {
            self.tick_times.remove(0);
        }

        match outcome {
            TickOutcome::Continue => {}
            TickOutcome::Collision => self.finish(GameOverCause::Collision, presenter),
            TickOutcome::OutOfFuel => self.finish(GameOverCause::OutOfFuel, presenter),
        }

        self.session.as_ref().map(|s| s.snapshot())
    }

    /// Forward a move request to the active session. Ignored outside
    /// the Playing phase.
    pub fn move_player(&mut self, direction: Direction, presenter: &mut dyn Presenter) {
        if self.phase != GamePhase::Playing {
            return;
        }

        if let Some(session) = &mut self.session {
            session.move_player(direction, presenter);
        }
    }

    /// Get the current snapshot without advancing the simulation.
    pub fn snapshot(&self) -> Option<GameSnapshot> {
        self.session.as_ref().map(|s| s.snapshot())
    }

    /// Get the terminal report for the last finished run.
    pub fn report(&self) -> Option<&GameOverReport> {
        self.report.as_ref()
    }

    /// Get engine statistics.
    pub fn stats(&self) -> EngineStats {
        let avg_tick_time = if self.tick_times.is_empty() {
            0.0
        } else {
            self.tick_times.iter().sum::<f32>() / self.tick_times.len() as f32
        };

        EngineStats {
            tick_interval_ms: self
                .session
                .as_ref()
                .map(|s| s.config().tick_interval_ms)
                .unwrap_or(0),
            ticks: self.session.as_ref().map(|s| s.tick_counter()).unwrap_or(0),
            avg_tick_time_ms: avg_tick_time,
            entity_count: self
                .session
                .as_ref()
                .map(|s| s.entities().len() as u32)
                .unwrap_or(0),
            phase: self.phase,
        }
    }

    /// Current engine phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Best score across sessions.
    pub fn high_score(&self) -> i32 {
        self.high_score
    }

    /// Read access to the injected settings store.
    pub fn settings(&self) -> &dyn SettingsStore {
        self.settings.as_ref()
    }

    /// Write access to the injected settings store (preference pages).
    pub fn settings_mut(&mut self) -> &mut dyn SettingsStore {
        self.settings.as_mut()
    }

    /// Test hook: mutable access to the active session.
    pub fn debug_session_mut(&mut self) -> Option<&mut GameSession> {
        self.session.as_mut()
    }

    fn finish(&mut self, cause: GameOverCause, presenter: &mut dyn Presenter) {
        let Some(session) = &mut self.session else {
            return;
        };

        let final_score = session.score();
        let cars_dodged = session.cars_dodged();

        if final_score > self.high_score {
            self.high_score = final_score;
            self.settings.set_int(KEY_HIGH_SCORE, final_score);
        }

        session.clear_entities(presenter);

        self.report = Some(GameOverReport {
            final_score,
            cars_dodged,
            high_score: self.high_score,
            cause,
        });
        self.phase = match cause {
            GameOverCause::Collision => GamePhase::GameOver,
            GameOverCause::OutOfFuel => GamePhase::OutOfFuel,
        };

        log::info!(
            "run over ({:?}): score {}, cars dodged {}, best {}",
            cause,
            final_score,
            cars_dodged,
            self.high_score
        );
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new(Box::new(crate::game::settings::MemoryStore::new()))
    }
}
