//! Traffic Escape - Lane-Based Dodge Game Core
//!
//! Provides the tick-driven simulation behind the game: enemy and jerry
//! can spawning, lane movement, collision detection, fuel and score
//! accounting, and the game-over phase machine.
//!
//! The crate owns no timer, window, or storage. A host drives
//! [`GameEngine::tick`] from its own periodic timer and plugs in two
//! seams: a [`Presenter`] for the view layer and a [`SettingsStore`] for
//! persisted preferences and the high score.

pub mod game;

pub use game::config::{CarColor, Difficulty, GameConfig};
pub use game::entity::{
    lane_offset, Entity, EntityFlags, EntityKind, EntitySnapshot, LANE_COUNT, PLAYER_ROW, SPAWN_ROW,
};
pub use game::presenter::{Easing, NullPresenter, Presenter};
pub use game::session::{Direction, FuelBand, GameSession, GameSnapshot, TickOutcome};
pub use game::settings::{
    JsonFileStore, MemoryStore, SettingsStore, KEY_CAR_COLOR, KEY_DIFFICULTY, KEY_HIGH_SCORE,
};
pub use game::simulation::{EngineStats, GameEngine, GameOverCause, GameOverReport, GamePhase};
