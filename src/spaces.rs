//! Observation and action space descriptors
//!
//! Lets a learner size its networks and check bounds without knowing the rink.

use serde::{Deserialize, Serialize};

use crate::consts::{ACTION_LEN, OBSERVATION_LEN};

/// Axis-aligned box of `shape` elements with per-element bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSpace {
    pub low: Vec<f32>,
    pub high: Vec<f32>,
}

impl BoxSpace {
    /// Same bounds on every element
    pub fn uniform(len: usize, low: f32, high: f32) -> Self {
        Self {
            low: vec![low; len],
            high: vec![high; len],
        }
    }

    /// Number of elements
    pub fn shape(&self) -> usize {
        self.low.len()
    }

    /// True if `values` has the right length and every element is within bounds
    pub fn contains(&self, values: &[f32]) -> bool {
        values.len() == self.shape()
            && values
                .iter()
                .zip(self.low.iter().zip(&self.high))
                .all(|(v, (lo, hi))| (*lo..=*hi).contains(v))
    }
}

/// Unbounded 12-element observation space
pub fn observation_space() -> BoxSpace {
    BoxSpace::uniform(OBSERVATION_LEN, f32::NEG_INFINITY, f32::INFINITY)
}

/// `[-1, 1]` per axis for goalie (x, z) movement
pub fn action_space() -> BoxSpace {
    BoxSpace::uniform(ACTION_LEN, -1.0, 1.0)
}
