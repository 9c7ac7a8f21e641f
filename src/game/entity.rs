//! Entity - Enemy cars and jerry cans descending the road
//!
//! Each entity occupies exactly one lane and one row. Enemies carry a
//! speed divisor that staggers their descent so the road never fills with
//! an unavoidable wall; jerry cans fall one row every tick.

use serde::{Deserialize, Serialize};

/// Number of lanes on the road (left, center, right).
pub const LANE_COUNT: u8 = 3;
/// Row entities spawn into, at the top of the road.
pub const SPAWN_ROW: u8 = 0;
/// Row the player's car sits on, at the bottom of the road.
pub const PLAYER_ROW: u8 = 7;

/// Kind of moving entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Enemy,
    Pickup,
}

/// Entity removal flags.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EntityFlags {
    /// Ran past the player's row without interacting.
    pub off_track: bool,
    /// Jerry can grabbed by the player this tick.
    pub collected: bool,
}

/// One enemy car or jerry can on the road.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Unique entity ID, used to address the host's sprite
    pub id: u32,
    pub kind: EntityKind,
    /// Lane in [0, LANE_COUNT)
    pub lane: u8,
    /// Row in [SPAWN_ROW, PLAYER_ROW]
    pub row: u8,
    /// Enemies advance a row only when `tick % speed_divisor == 0`;
    /// 1 = fast, 3 = slow. Pickups always carry 1.
    pub speed_divisor: u64,
    /// Removal flags
    pub flags: EntityFlags,
}

impl Entity {
    /// Create an entity at the spawn row.
    pub fn new(id: u32, kind: EntityKind, lane: u8, speed_divisor: u64) -> Self {
        Self {
            id,
            kind,
            lane,
            row: SPAWN_ROW,
            speed_divisor,
            flags: EntityFlags::default(),
        }
    }

    /// Whether the entity is due for removal at the end of the tick.
    pub fn marked(&self) -> bool {
        self.flags.off_track || self.flags.collected
    }
}

/// Lateral pixel offset of a lane's center relative to the road center.
///
/// Left = -d, center = 0, right = +d, where d is 0.65 of one lane's width
/// so the car stays visually inside its lane.
pub fn lane_offset(lane: u8, viewport_width: f64) -> f64 {
    (viewport_width / LANE_COUNT as f64) * 0.65 * (lane as f64 - 1.0)
}

/// Compact entity state for rendering/IPC transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: u32,
    pub kind: EntityKind,
    pub lane: u8,
    pub row: u8,
}

impl From<&Entity> for EntitySnapshot {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            kind: entity.kind,
            lane: entity.lane,
            row: entity.row,
        }
    }
}
