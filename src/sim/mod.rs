//! Deterministic simulation module
//!
//! All episode logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Randomness only from the caller's seeded RNG
//! - State passed in and returned by value
//! - No logging on the per-step path

pub mod codec;
pub mod outcome;
pub mod state;
pub mod tick;

pub use codec::{Observation, clamp_action, encode_observation, validate_action};
pub use outcome::{Outcome, classify};
pub use state::SimulationState;
pub use tick::{Transition, advance, shaping_reward};
