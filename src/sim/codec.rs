//! Observation/action codec
//!
//! Translates simulation state into the fixed-length observation vector and
//! turns raw learner actions into bounded goalie commands.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::SimulationState;
use crate::consts::{ACTION_LEN, LIVE_FEATURES, OBSERVATION_LEN};
use crate::error::{Result, RinkError};

/// Fixed 12-element observation.
///
/// Layout: `[goalie.x, goalie.z, puck.x, puck.z, puck_vel.x, puck_vel.z, 0, 0, 0, 0, 0, 0]`.
/// The trailing six slots are reserved and always zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation(pub [f32; OBSERVATION_LEN]);

impl Observation {
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    #[inline]
    pub fn goalie_position(&self) -> Vec2 {
        Vec2::new(self.0[0], self.0[1])
    }

    #[inline]
    pub fn puck_position(&self) -> Vec2 {
        Vec2::new(self.0[2], self.0[3])
    }

    #[inline]
    pub fn puck_velocity(&self) -> Vec2 {
        Vec2::new(self.0[4], self.0[5])
    }
}

impl AsRef<[f32]> for Observation {
    fn as_ref(&self) -> &[f32] {
        &self.0
    }
}

/// Encode the state as an observation (pure)
pub fn encode_observation(state: &SimulationState) -> Observation {
    let mut obs = [0.0; OBSERVATION_LEN];
    let live: [f32; LIVE_FEATURES] = [
        state.goalie_position.x,
        state.goalie_position.y,
        state.puck_position.x,
        state.puck_position.y,
        state.puck_velocity.x,
        state.puck_velocity.y,
    ];
    obs[..LIVE_FEATURES].copy_from_slice(&live);
    Observation(obs)
}

/// Clamp each action axis to [-1, 1]. Out-of-range input is not an error.
#[inline]
pub fn clamp_action(raw: Vec2) -> Vec2 {
    crate::clamp_symmetric(raw, 1.0)
}

/// Reject non-finite components, then clamp
pub fn validate_action(raw: [f32; ACTION_LEN]) -> Result<Vec2> {
    for (axis, value) in ["action.x", "action.z"].into_iter().zip(raw) {
        if !value.is_finite() {
            return Err(RinkError::InvalidInput {
                field: axis,
                value: value.to_string(),
            });
        }
    }
    Ok(clamp_action(Vec2::from_array(raw)))
}
