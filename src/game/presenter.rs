//! Presenter - Commands the simulation issues to the host's view layer
//!
//! The core owns no rendering. It places entity sprites on the lane grid,
//! asks for the player car to slide between lanes, and reads the road
//! width for lane-offset geometry; the host does the rest.

use crate::game::config::CarColor;

/// Easing curve for the player's lateral slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    CubicOut,
}

/// Host view-layer contract.
///
/// `animate_player_to` is fire-and-forget: the simulation never waits for
/// the slide to finish and collision geometry uses its own lane offsets.
pub trait Presenter {
    /// Place an entity's sprite on the lane grid.
    fn set_entity_position(&mut self, id: u32, lane: u8, row: u8);

    /// Take an entity's sprite down.
    fn remove_entity(&mut self, id: u32);

    /// Slide the player car to a lateral offset from the road center.
    fn animate_player_to(&mut self, offset_x: f64, duration_ms: u32, easing: Easing);

    /// Current width of the road area in pixels.
    fn viewport_width(&self) -> f64;

    /// Swap the player car sprite for the selected color.
    fn set_car_sprite(&mut self, color: CarColor);
}

/// Headless presenter: fixed viewport width, all commands discarded.
#[derive(Debug, Clone)]
pub struct NullPresenter {
    viewport_width: f64,
}

impl NullPresenter {
    pub fn new(viewport_width: f64) -> Self {
        Self { viewport_width }
    }
}

impl Default for NullPresenter {
    fn default() -> Self {
        Self::new(300.0)
    }
}

impl Presenter for NullPresenter {
    fn set_entity_position(&mut self, _id: u32, _lane: u8, _row: u8) {}

    fn remove_entity(&mut self, _id: u32) {}

    fn animate_player_to(&mut self, _offset_x: f64, _duration_ms: u32, _easing: Easing) {}

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn set_car_sprite(&mut self, _color: CarColor) {}
}
