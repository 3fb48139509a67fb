//! Neural Rink - a headless goalie training environment
//!
//! Core modules:
//! - `sim`: Deterministic simulation (state, dynamics, outcome classifier, codec)
//! - `env`: Reset/step environment boundary consumed by learners
//! - `spaces`: Observation and action space descriptors
//! - `eval`: Fixed-policy evaluation harness and reporting
//! - `settings`: Data-driven simulation and evaluation tuning

pub mod env;
pub mod error;
pub mod eval;
pub mod settings;
pub mod sim;
pub mod spaces;

pub use env::{Environment, Info, RinkEnv, StepResult};
pub use error::{Result, RinkError};
pub use eval::{EvaluationReport, PerformanceLevel, Policy, evaluate, evaluate_parallel};
pub use settings::{EvalSettings, PerformanceThresholds, RinkSettings};
pub use sim::{Observation, Outcome, SimulationState};

use glam::Vec2;

/// Default simulation constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz)
    pub const SIM_DT: f32 = 0.02;
    /// Goalie displacement per unit of action per step
    pub const MOVE_SCALE: f32 = 0.1;
    /// Per-step multiplicative puck velocity decay
    pub const FRICTION: f32 = 0.99;

    /// Goalie crease bounds (x, z)
    pub const ARENA_MIN: [f32; 2] = [-2.0, -1.5];
    pub const ARENA_MAX: [f32; 2] = [2.0, 1.5];

    /// Puck spawn point on the far side of the rink
    pub const PUCK_SPAWN: [f32; 2] = [-5.0, 0.0];
    /// Forward (x) component of the shot
    pub const PUCK_FORWARD_SPEED: f32 = 2.0;
    /// Lateral (z) shot component is drawn from [-spread, spread]
    pub const PUCK_LATERAL_SPREAD: f32 = 0.5;

    /// Shaping reward: max(0, radius - distance) * scale
    pub const PROXIMITY_RADIUS: f32 = 10.0;
    pub const SHAPING_SCALE: f32 = 0.1;

    /// |puck.x| beyond this is a miss
    pub const MISS_X: f32 = 8.0;
    /// Goal line and half-width of the goal mouth
    pub const GOAL_LINE_X: f32 = 7.0;
    pub const GOAL_MOUTH_HALF_WIDTH: f32 = 0.5;
    /// Goal area the save must happen in
    pub const SAVE_AREA_X: f32 = 6.0;
    pub const SAVE_AREA_HALF_WIDTH: f32 = 1.0;
    /// Goalie must be within this distance of the puck to save
    pub const CAPTURE_RADIUS: f32 = 1.0;

    pub const MISS_REWARD: f32 = 50.0;
    pub const GOAL_REWARD: f32 = -200.0;
    pub const SAVE_REWARD: f32 = 200.0;
    pub const TIMEOUT_REWARD: f32 = -10.0;

    /// Step limit per episode (6 seconds at 50 Hz)
    pub const MAX_STEPS: u32 = 300;

    /// Observation vector length (6 live features, 6 reserved)
    pub const OBSERVATION_LEN: usize = 12;
    /// Number of live observation features
    pub const LIVE_FEATURES: usize = 6;
    /// Action vector length (x, z)
    pub const ACTION_LEN: usize = 2;
}

/// Clamp each component of `v` to `[-limit, limit]`
#[inline]
pub fn clamp_symmetric(v: Vec2, limit: f32) -> Vec2 {
    v.clamp(Vec2::splat(-limit), Vec2::splat(limit))
}

/// Returns true if both components are finite
#[inline]
pub fn is_finite_vec(v: Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}
