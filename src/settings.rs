//! Simulation and evaluation settings
//!
//! Every tuning constant of the rink lives here so experiments can be
//! described as JSON instead of recompiling. Defaults match `consts`.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, RinkError};

/// Physical and reward constants for one environment instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RinkSettings {
    // === Dynamics ===
    /// Fixed timestep (seconds)
    pub dt: f32,
    /// Goalie displacement per unit action per step
    pub move_scale: f32,
    /// Per-step velocity multiplier, in (0, 1]
    pub friction: f32,
    /// Lower corner of the goalie's allowed area (x, z)
    pub arena_min: Vec2,
    /// Upper corner of the goalie's allowed area (x, z)
    pub arena_max: Vec2,

    // === Shot ===
    pub puck_spawn: Vec2,
    pub puck_forward_speed: f32,
    /// Lateral velocity drawn uniformly from [-spread, spread]
    pub puck_lateral_spread: f32,

    // === Shaping ===
    pub proximity_radius: f32,
    pub shaping_scale: f32,

    // === Zones ===
    pub miss_x: f32,
    pub goal_line_x: f32,
    pub goal_mouth_half_width: f32,
    pub save_area_x: f32,
    pub save_area_half_width: f32,
    pub capture_radius: f32,

    // === Terminal rewards ===
    pub miss_reward: f32,
    pub goal_reward: f32,
    pub save_reward: f32,
    pub timeout_reward: f32,

    pub max_steps: u32,
    /// When true, reaching `max_steps` replaces any outcome detected in the
    /// same step with a timeout. When false, a detected outcome wins.
    pub timeout_overrides_outcome: bool,
}

impl Default for RinkSettings {
    fn default() -> Self {
        Self {
            dt: SIM_DT,
            move_scale: MOVE_SCALE,
            friction: FRICTION,
            arena_min: Vec2::from_array(ARENA_MIN),
            arena_max: Vec2::from_array(ARENA_MAX),

            puck_spawn: Vec2::from_array(PUCK_SPAWN),
            puck_forward_speed: PUCK_FORWARD_SPEED,
            puck_lateral_spread: PUCK_LATERAL_SPREAD,

            proximity_radius: PROXIMITY_RADIUS,
            shaping_scale: SHAPING_SCALE,

            miss_x: MISS_X,
            goal_line_x: GOAL_LINE_X,
            goal_mouth_half_width: GOAL_MOUTH_HALF_WIDTH,
            save_area_x: SAVE_AREA_X,
            save_area_half_width: SAVE_AREA_HALF_WIDTH,
            capture_radius: CAPTURE_RADIUS,

            miss_reward: MISS_REWARD,
            goal_reward: GOAL_REWARD,
            save_reward: SAVE_REWARD,
            timeout_reward: TIMEOUT_REWARD,

            max_steps: MAX_STEPS,
            timeout_overrides_outcome: true,
        }
    }
}

impl RinkSettings {
    /// Parse settings from JSON (missing fields take defaults) and validate
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&json)?;
        log::info!("Loaded rink settings from {}", path.display());
        Ok(settings)
    }

    /// Reject constants that would break the simulation invariants
    pub fn validate(&self) -> Result<()> {
        let scalars = [
            ("dt", self.dt),
            ("move_scale", self.move_scale),
            ("friction", self.friction),
            ("puck_forward_speed", self.puck_forward_speed),
            ("puck_lateral_spread", self.puck_lateral_spread),
            ("proximity_radius", self.proximity_radius),
            ("shaping_scale", self.shaping_scale),
            ("miss_x", self.miss_x),
            ("goal_line_x", self.goal_line_x),
            ("goal_mouth_half_width", self.goal_mouth_half_width),
            ("save_area_x", self.save_area_x),
            ("save_area_half_width", self.save_area_half_width),
            ("capture_radius", self.capture_radius),
            ("miss_reward", self.miss_reward),
            ("goal_reward", self.goal_reward),
            ("save_reward", self.save_reward),
            ("timeout_reward", self.timeout_reward),
        ];
        if let Some((name, value)) = scalars.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(format!("{name} must be finite, got {value}")));
        }
        let vectors = [
            ("arena_min", self.arena_min),
            ("arena_max", self.arena_max),
            ("puck_spawn", self.puck_spawn),
        ];
        if let Some((name, value)) = vectors.iter().find(|(_, v)| !crate::is_finite_vec(*v)) {
            return Err(invalid(format!("{name} must be finite, got {value}")));
        }

        if self.dt <= 0.0 {
            return Err(invalid(format!("dt must be positive, got {}", self.dt)));
        }
        if self.move_scale < 0.0 {
            return Err(invalid(format!(
                "move_scale must be non-negative, got {}",
                self.move_scale
            )));
        }
        if !(self.friction > 0.0 && self.friction <= 1.0) {
            return Err(invalid(format!(
                "friction must be in (0, 1], got {}",
                self.friction
            )));
        }
        if self.arena_min.x > self.arena_max.x || self.arena_min.y > self.arena_max.y {
            return Err(invalid(format!(
                "arena_min {} exceeds arena_max {}",
                self.arena_min, self.arena_max
            )));
        }
        if self.puck_lateral_spread < 0.0 {
            return Err(invalid(format!(
                "puck_lateral_spread must be non-negative, got {}",
                self.puck_lateral_spread
            )));
        }
        if self.max_steps == 0 {
            return Err(invalid("max_steps must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Mean-reward thresholds used to label an evaluation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceThresholds {
    /// Mean above this is "performing well"
    pub performing_well: f32,
    /// Mean above this (and not above `performing_well`) is "learning"
    pub learning: f32,
}

impl Default for PerformanceThresholds {
    fn default() -> Self {
        Self {
            performing_well: 100.0,
            learning: 0.0,
        }
    }
}

/// Evaluation harness settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalSettings {
    pub episode_count: u32,
    /// Episode `i` is reset with `seed + i`
    pub seed: u64,
    /// Abandon (and discard) an episode that has not terminated after this
    /// many steps. `None` lets every episode run to its terminal outcome.
    pub abandon_after_steps: Option<u32>,
    pub thresholds: PerformanceThresholds,
}

impl Default for EvalSettings {
    fn default() -> Self {
        Self {
            episode_count: 10,
            seed: 0,
            abandon_after_steps: None,
            thresholds: PerformanceThresholds::default(),
        }
    }
}

impl EvalSettings {
    pub fn validate(&self) -> Result<()> {
        if self.episode_count == 0 {
            return Err(invalid("episode_count must be at least 1".to_string()));
        }
        let t = &self.thresholds;
        if !t.performing_well.is_finite() || !t.learning.is_finite() {
            return Err(invalid("performance thresholds must be finite".to_string()));
        }
        if t.learning > t.performing_well {
            return Err(invalid(format!(
                "learning threshold {} exceeds performing_well threshold {}",
                t.learning, t.performing_well
            )));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> RinkError {
    RinkError::InvalidSettings(msg)
}
