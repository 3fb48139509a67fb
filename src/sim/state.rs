//! Simulation state for a single episode
//!
//! Plain data. Owned by one episode, advanced only by `tick::advance`.

use std::fmt;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::settings::RinkSettings;

/// Physical state of one episode (x, z plane)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Always within the settings' arena bounds
    pub goalie_position: Vec2,
    /// Unbounded; leaving the rink is how a miss is detected
    pub puck_position: Vec2,
    pub puck_velocity: Vec2,
    /// Steps taken so far this episode
    pub step_count: u32,
}

impl SimulationState {
    /// Spawn a fresh episode: goalie at the origin, puck on the far side
    /// shooting forward with a random lateral component drawn from `rng`.
    pub fn spawn<R: Rng>(settings: &RinkSettings, rng: &mut R) -> Self {
        let spread = settings.puck_lateral_spread;
        let lateral = if spread > 0.0 {
            rng.random_range(-spread..=spread)
        } else {
            0.0
        };

        Self {
            goalie_position: Vec2::ZERO,
            puck_position: settings.puck_spawn,
            puck_velocity: Vec2::new(settings.puck_forward_speed, lateral),
            step_count: 0,
        }
    }

    /// Euclidean distance between goalie and puck
    #[inline]
    pub fn separation(&self) -> f32 {
        self.puck_position.distance(self.goalie_position)
    }
}

impl fmt::Display for SimulationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Step {}: Goalie at ({:.2}, {:.2}), Puck at ({:.2}, {:.2})",
            self.step_count,
            self.goalie_position.x,
            self.goalie_position.y,
            self.puck_position.x,
            self.puck_position.y,
        )
    }
}
