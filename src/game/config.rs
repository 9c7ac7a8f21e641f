//! Config - Difficulty, car color, and per-session parameters
//!
//! Difficulty picks the timer interval and the spawn denominators;
//! car color only selects the player sprite.

use serde::{Deserialize, Serialize};

/// Selected difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Value written to the settings store.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }

    /// Parse a stored value; anything unrecognized falls back to Easy.
    pub fn from_setting(value: &str) -> Self {
        match value {
            "Medium" => Self::Medium,
            "Hard" => Self::Hard,
            _ => Self::Easy,
        }
    }
}

/// Cosmetic player car color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarColor {
    Blue,
    Red,
    Green,
}

impl CarColor {
    /// Value written to the settings store.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blue => "Blue",
            Self::Red => "Red",
            Self::Green => "Green",
        }
    }

    /// Parse a stored value; anything unrecognized falls back to Blue.
    pub fn from_setting(value: &str) -> Self {
        match value {
            "Red" => Self::Red,
            "Green" => Self::Green,
            _ => Self::Blue,
        }
    }

    /// Sprite asset shown for this color.
    pub fn sprite_asset(self) -> &'static str {
        match self {
            Self::Red => "redplayercar.png",
            Self::Green => "greenplayercar.png",
            Self::Blue => "newplayercar.png",
        }
    }
}

/// Read-only configuration for one game session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Difficulty the other fields were derived from
    pub difficulty: Difficulty,
    /// Milliseconds between ticks of the external timer
    pub tick_interval_ms: u64,
    /// 1-in-N enemy spawn chance per tick; 0 disables enemy spawns
    pub enemy_spawn_chance: u32,
    /// 1-in-N jerry can spawn chance per tick; 0 disables pickup spawns
    pub pickup_spawn_chance: u32,
    /// Seed for the session's spawn rolls
    pub seed: u64,
}

impl GameConfig {
    /// Build the config for a difficulty level.
    ///
    /// Harder levels tick faster and trade enemy density for fuel scarcity.
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let (tick_interval_ms, enemy_spawn_chance, pickup_spawn_chance) = match difficulty {
            Difficulty::Easy => (450, 10, 10),
            Difficulty::Medium => (350, 8, 12),
            Difficulty::Hard => (250, 5, 15),
        };

        Self {
            difficulty,
            tick_interval_ms,
            enemy_spawn_chance,
            pickup_spawn_chance,
            seed: 7,
        }
    }

    /// Replace the session seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::Easy)
    }
}
