//! Session - One run of the traffic simulation
//!
//! Holds all mutable state for a single game and applies the per-tick
//! update: spawn rolls, entity descent, collision and pickup detection,
//! score and fuel accounting. The session exposes no scheduling; an
//! external timer calls `tick` once per interval.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::game::config::GameConfig;
use crate::game::entity::{
    lane_offset, Entity, EntityKind, EntitySnapshot, LANE_COUNT, PLAYER_ROW,
};
use crate::game::presenter::{Easing, Presenter};

/// Direction of a player move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

/// What a tick resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Keep the timer running
    Continue,
    /// Player hit an enemy car
    Collision,
    /// Fuel ran dry
    OutOfFuel,
}

/// Fuel gauge banding for the host's fuel bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuelBand {
    Ok,
    Low,
    Critical,
}

impl FuelBand {
    pub fn for_level(fuel: f64) -> Self {
        if fuel > 50.0 {
            Self::Ok
        } else if fuel > 25.0 {
            Self::Low
        } else {
            Self::Critical
        }
    }
}

/// One run of the game, from a fresh road to a terminal outcome.
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    rng: StdRng,
    entities: Vec<Entity>,
    next_entity_id: u32,
    player_lane: u8,
    /// Lateral offset of the player's lane, kept in lockstep with
    /// `player_lane`. Collision geometry compares against this, never
    /// against the in-flight slide animation.
    player_offset: f64,
    fuel: f64,
    score: i32,
    pickup_bonus: i32,
    cars_dodged: u32,
    tick_counter: u64,
}

impl GameSession {
    /// Fuel drained per second of play, in percent.
    const FUEL_CONSUMPTION_RATE: f64 = 2.0;
    /// Fuel restored by one jerry can, in percent.
    const FUEL_PER_PICKUP: f64 = 10.0;
    /// Score granted for collecting a jerry can.
    const PICKUP_SCORE_BONUS: i32 = 20;
    /// Lateral distance below which a same-row entity touches the player.
    const COLLISION_THRESHOLD_PX: f64 = 50.0;
    /// Duration of the player's lane-change slide.
    const MOVE_DURATION_MS: u32 = 200;

    /// Lane the player starts in (center).
    pub const STARTING_LANE: u8 = 1;
    /// Fuel the player starts with.
    pub const STARTING_FUEL: f64 = 100.0;

    /// Create a fresh session for the given config.
    pub fn new(config: GameConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            entities: Vec::new(),
            next_entity_id: 0,
            player_lane: Self::STARTING_LANE,
            player_offset: 0.0,
            fuel: Self::STARTING_FUEL,
            score: 0,
            pickup_bonus: 0,
            cars_dodged: 0,
            tick_counter: 0,
        }
    }

    /// Advance the simulation by one timer interval.
    ///
    /// A collision terminates the tick immediately; entities after the
    /// colliding one are not advanced and fuel does not decay.
    pub fn tick(&mut self, presenter: &mut dyn Presenter) -> TickOutcome {
        self.tick_counter += 1;

        if self.roll_spawn(self.config.enemy_spawn_chance) {
            self.spawn(EntityKind::Enemy, presenter);
        }
        if self.roll_spawn(self.config.pickup_spawn_chance) {
            self.spawn(EntityKind::Pickup, presenter);
        }

        let width = presenter.viewport_width();

        // Enemies descend on their divisor ticks, but the collision check
        // runs every tick: the player may have moved into a waiting enemy.
        for i in 0..self.entities.len() {
            if self.entities[i].kind != EntityKind::Enemy {
                continue;
            }

            if self.tick_counter % self.entities[i].speed_divisor == 0 {
                if self.entities[i].row < PLAYER_ROW {
                    self.entities[i].row += 1;
                    presenter.set_entity_position(
                        self.entities[i].id,
                        self.entities[i].lane,
                        self.entities[i].row,
                    );
                } else {
                    self.entities[i].flags.off_track = true;
                }
            }

            if self.touches_player(&self.entities[i], width) {
                return TickOutcome::Collision;
            }
        }

        // Jerry cans fall one row every tick.
        for i in 0..self.entities.len() {
            if self.entities[i].kind != EntityKind::Pickup {
                continue;
            }

            if self.entities[i].row < PLAYER_ROW {
                self.entities[i].row += 1;
                presenter.set_entity_position(
                    self.entities[i].id,
                    self.entities[i].lane,
                    self.entities[i].row,
                );
            } else {
                self.entities[i].flags.off_track = true;
            }

            if !self.entities[i].flags.collected && self.touches_player(&self.entities[i], width) {
                self.fuel = (self.fuel + Self::FUEL_PER_PICKUP).min(100.0);
                self.pickup_bonus += Self::PICKUP_SCORE_BONUS;
                self.entities[i].flags.collected = true;
                log::debug!(
                    "jerry can #{} collected, fuel {:.0}%",
                    self.entities[i].id,
                    self.fuel
                );
            }
        }

        self.sweep_removed(presenter);

        self.score = self.compute_score();

        self.fuel -= Self::FUEL_CONSUMPTION_RATE * (self.config.tick_interval_ms as f64 / 1000.0);
        if self.fuel <= 0.0 {
            self.fuel = 0.0;
            return TickOutcome::OutOfFuel;
        }

        TickOutcome::Continue
    }

    /// Move the player one lane left or right. No-op at the road edges.
    pub fn move_player(&mut self, direction: Direction, presenter: &mut dyn Presenter) {
        let lane = match direction {
            Direction::Left if self.player_lane > 0 => self.player_lane - 1,
            Direction::Right if self.player_lane < LANE_COUNT - 1 => self.player_lane + 1,
            _ => return,
        };

        self.player_lane = lane;
        self.player_offset = lane_offset(lane, presenter.viewport_width());
        presenter.animate_player_to(self.player_offset, Self::MOVE_DURATION_MS, Easing::CubicOut);
    }

    /// Drop every active entity, taking the host sprites down with them.
    pub fn clear_entities(&mut self, presenter: &mut dyn Presenter) {
        for entity in self.entities.drain(..) {
            presenter.remove_entity(entity.id);
        }
    }

    /// Get a compact snapshot for rendering/IPC transfer.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            score: self.score,
            cars_dodged: self.cars_dodged,
            fuel: self.fuel,
            fuel_band: FuelBand::for_level(self.fuel),
            elapsed_seconds: self.elapsed_seconds(),
            player_lane: self.player_lane,
            player_offset: self.player_offset,
            entities: self.entities.iter().map(EntitySnapshot::from).collect(),
        }
    }

    /// In-game seconds, derived from the tick count and timer interval.
    pub fn elapsed_seconds(&self) -> u64 {
        self.tick_counter * self.config.tick_interval_ms / 1000
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn cars_dodged(&self) -> u32 {
        self.cars_dodged
    }

    pub fn fuel(&self) -> f64 {
        self.fuel
    }

    pub fn player_lane(&self) -> u8 {
        self.player_lane
    }

    pub fn player_offset(&self) -> f64 {
        self.player_offset
    }

    pub fn tick_counter(&self) -> u64 {
        self.tick_counter
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    fn roll_spawn(&mut self, chance: u32) -> bool {
        chance > 0 && self.rng.gen_range(0..chance) == 0
    }

    fn spawn(&mut self, kind: EntityKind, presenter: &mut dyn Presenter) {
        let lane = self.rng.gen_range(0..LANE_COUNT);
        let speed_divisor = match kind {
            EntityKind::Enemy => self.rng.gen_range(1..=3),
            EntityKind::Pickup => 1,
        };

        let entity = Entity::new(self.next_entity_id, kind, lane, speed_divisor);
        self.next_entity_id += 1;
        presenter.set_entity_position(entity.id, entity.lane, entity.row);
        log::debug!("{:?} #{} spawned in lane {}", kind, entity.id, lane);
        self.entities.push(entity);
    }

    fn touches_player(&self, entity: &Entity, viewport_width: f64) -> bool {
        entity.row == PLAYER_ROW
            && (lane_offset(entity.lane, viewport_width) - self.player_offset).abs()
                < Self::COLLISION_THRESHOLD_PX
    }

    /// Remove marked entities; an enemy that left the road counts as dodged.
    fn sweep_removed(&mut self, presenter: &mut dyn Presenter) {
        let mut kept = Vec::with_capacity(self.entities.len());

        for entity in std::mem::take(&mut self.entities) {
            if entity.marked() {
                if entity.kind == EntityKind::Enemy {
                    self.cars_dodged += 1;
                }
                presenter.remove_entity(entity.id);
            } else {
                kept.push(entity);
            }
        }

        self.entities = kept;
    }

    fn compute_score(&self) -> i32 {
        self.cars_dodged as i32 * 10 + self.elapsed_seconds() as i32 + self.pickup_bonus
    }
}

/// Test hooks: stage exact board states without going through the RNG.
impl GameSession {
    /// Place an entity at an arbitrary lane and row; returns its ID.
    pub fn debug_place(&mut self, kind: EntityKind, lane: u8, row: u8, speed_divisor: u64) -> u32 {
        let mut entity = Entity::new(self.next_entity_id, kind, lane, speed_divisor);
        entity.row = row;
        self.next_entity_id += 1;
        let id = entity.id;
        self.entities.push(entity);
        id
    }

    pub fn debug_set_fuel(&mut self, fuel: f64) {
        self.fuel = fuel.clamp(0.0, Self::STARTING_FUEL);
    }

    pub fn debug_set_cars_dodged(&mut self, cars_dodged: u32) {
        self.cars_dodged = cars_dodged;
    }

    pub fn debug_set_pickup_bonus(&mut self, pickup_bonus: i32) {
        self.pickup_bonus = pickup_bonus;
    }

    pub fn debug_set_tick_counter(&mut self, tick_counter: u64) {
        self.tick_counter = tick_counter;
    }
}

/// Compact game state for rendering/IPC transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub score: i32,
    pub cars_dodged: u32,
    pub fuel: f64,
    pub fuel_band: FuelBand,
    pub elapsed_seconds: u64,
    pub player_lane: u8,
    pub player_offset: f64,
    pub entities: Vec<EntitySnapshot>,
}
