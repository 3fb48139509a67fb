//! Episode outcome classification
//!
//! Evaluated after every step, in priority order: miss, goal, save. The step
//! limit is checked afterwards and (by default) overrides whatever was found.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::state::SimulationState;
use crate::settings::RinkSettings;

/// Episode status after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Episode continues
    Active,
    /// Puck left the rink; no goal was scored against the goalie
    Miss,
    /// Puck crossed the goal line inside the goal mouth
    Goal,
    /// Goalie reached the puck inside the goal area
    Save,
    /// Step limit reached
    Timeout,
}

impl Outcome {
    pub const TERMINAL: [Outcome; 4] = [
        Outcome::Miss,
        Outcome::Goal,
        Outcome::Save,
        Outcome::Timeout,
    ];

    #[inline]
    pub fn is_terminal(self) -> bool {
        self != Outcome::Active
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Active => "active",
            Outcome::Miss => "miss",
            Outcome::Goal => "goal",
            Outcome::Save => "save",
            Outcome::Timeout => "timeout",
        }
    }

    /// Terminal reward (goalie's perspective); `None` while active
    pub fn reward(self, settings: &RinkSettings) -> Option<f32> {
        match self {
            Outcome::Active => None,
            Outcome::Miss => Some(settings.miss_reward),
            Outcome::Goal => Some(settings.goal_reward),
            Outcome::Save => Some(settings.save_reward),
            Outcome::Timeout => Some(settings.timeout_reward),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a freshly advanced state. `step_count` is the post-step count.
pub fn classify(state: &SimulationState, settings: &RinkSettings) -> Outcome {
    let outcome = classify_position(state, settings);

    if state.step_count >= settings.max_steps
        && (settings.timeout_overrides_outcome || outcome == Outcome::Active)
    {
        return Outcome::Timeout;
    }
    outcome
}

/// Spatial checks only, first match wins
fn classify_position(state: &SimulationState, settings: &RinkSettings) -> Outcome {
    let puck = state.puck_position;

    if puck.x.abs() > settings.miss_x {
        return Outcome::Miss;
    }
    if puck.y.abs() < settings.goal_mouth_half_width && puck.x > settings.goal_line_x {
        return Outcome::Goal;
    }
    let in_goal_area =
        puck.x > settings.save_area_x && puck.y.abs() < settings.save_area_half_width;
    if in_goal_area && state.separation() < settings.capture_radius {
        return Outcome::Save;
    }
    Outcome::Active
}
