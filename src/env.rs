//! Environment boundary consumed by learners and the evaluation harness
//!
//! `RinkEnv` wraps the pure simulation in the usual reset/step contract and
//! guards the call order: `step` needs a live episode.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::ACTION_LEN;
use crate::error::{Result, RinkError};
use crate::settings::RinkSettings;
use crate::sim::{Observation, Outcome, SimulationState, advance, encode_observation, validate_action};
use crate::spaces::{self, BoxSpace};

/// Key/value side channel. After a terminal step it holds `"result"`.
pub type Info = BTreeMap<String, String>;

/// Info key carrying the terminal outcome label
pub const RESULT_KEY: &str = "result";

/// Everything returned from one `step`
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: f32,
    pub terminated: bool,
    /// Always false: the step limit is reported as a `Timeout` termination
    pub truncated: bool,
    pub info: Info,
    pub outcome: Outcome,
}

/// Standard episodic environment contract
pub trait Environment {
    /// Start a new episode. `Some(seed)` reseeds the instance's RNG;
    /// `None` continues its current stream.
    fn reset(&mut self, seed: Option<u64>) -> Result<(Observation, Info)>;

    /// Apply one action to the live episode
    fn step(&mut self, action: [f32; ACTION_LEN]) -> Result<StepResult>;

    fn observation_space(&self) -> BoxSpace {
        spaces::observation_space()
    }

    fn action_space(&self) -> BoxSpace {
        spaces::action_space()
    }
}

/// Episode lifecycle
#[derive(Debug, Clone, Copy, PartialEq)]
enum Episode {
    /// No reset yet
    NotStarted,
    Running(SimulationState),
    /// Terminal step taken, waiting for reset
    Finished {
        state: SimulationState,
        outcome: Outcome,
    },
}

/// Single-instance goalie environment.
///
/// Owns its settings, RNG and episode state exclusively, so separate
/// instances can run on separate threads without coordination.
#[derive(Debug, Clone)]
pub struct RinkEnv {
    settings: RinkSettings,
    rng: Pcg32,
    episode: Episode,
}

impl RinkEnv {
    /// Create an environment whose RNG stream starts from `seed`
    pub fn new(settings: RinkSettings, seed: u64) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            rng: Pcg32::seed_from_u64(seed),
            episode: Episode::NotStarted,
        })
    }

    pub fn settings(&self) -> &RinkSettings {
        &self.settings
    }

    /// Current simulation state, if an episode has been started
    pub fn state(&self) -> Option<&SimulationState> {
        match &self.episode {
            Episode::NotStarted => None,
            Episode::Running(state) | Episode::Finished { state, .. } => Some(state),
        }
    }

    /// `None` before the first reset, `Active` mid-episode, terminal after
    pub fn outcome(&self) -> Option<Outcome> {
        match self.episode {
            Episode::NotStarted => None,
            Episode::Running(_) => Some(Outcome::Active),
            Episode::Finished { outcome, .. } => Some(outcome),
        }
    }

    /// One-line text view of the episode
    pub fn render(&self) -> String {
        match self.state() {
            Some(state) => state.to_string(),
            None => "Episode not started".to_string(),
        }
    }
}

impl Environment for RinkEnv {
    fn reset(&mut self, seed: Option<u64>) -> Result<(Observation, Info)> {
        if let Some(seed) = seed {
            self.rng = Pcg32::seed_from_u64(seed);
        }
        let state = SimulationState::spawn(&self.settings, &mut self.rng);
        log::debug!(
            "reset (seed {:?}): puck velocity {}",
            seed,
            state.puck_velocity
        );
        self.episode = Episode::Running(state);
        Ok((encode_observation(&state), Info::new()))
    }

    fn step(&mut self, action: [f32; ACTION_LEN]) -> Result<StepResult> {
        let state = match self.episode {
            Episode::Running(state) => state,
            Episode::NotStarted => {
                return Err(RinkError::InvalidSequence {
                    reason: "step called before reset",
                });
            }
            Episode::Finished { .. } => {
                return Err(RinkError::InvalidSequence {
                    reason: "step called after episode ended; call reset first",
                });
            }
        };
        let action = validate_action(action)?;

        let transition = advance(state, action, &self.settings);
        let outcome = transition.outcome;

        let mut info = Info::new();
        if outcome.is_terminal() {
            log::debug!(
                "episode ended: {} after {} steps",
                outcome,
                transition.state.step_count
            );
            info.insert(RESULT_KEY.to_string(), outcome.as_str().to_string());
            self.episode = Episode::Finished {
                state: transition.state,
                outcome,
            };
        } else {
            self.episode = Episode::Running(transition.state);
        }

        Ok(StepResult {
            observation: encode_observation(&transition.state),
            reward: transition.reward,
            terminated: outcome.is_terminal(),
            truncated: false,
            info,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_before_reset_fails() {
        let mut env = RinkEnv::new(RinkSettings::default(), 0).unwrap();
        assert!(matches!(
            env.step([0.0, 0.0]),
            Err(RinkError::InvalidSequence { .. })
        ));
        assert_eq!(env.outcome(), None);
        assert_eq!(env.render(), "Episode not started");
    }

    #[test]
    fn test_reset_observation_and_info() {
        let mut env = RinkEnv::new(RinkSettings::default(), 0).unwrap();
        let (obs, info) = env.reset(Some(3)).unwrap();
        assert!(info.is_empty());
        assert_eq!(obs.goalie_position(), glam::Vec2::ZERO);
        assert_eq!(obs.puck_position(), glam::Vec2::new(-5.0, 0.0));
        assert_eq!(env.outcome(), Some(Outcome::Active));
    }

    #[test]
    fn test_step_after_terminal_fails_until_reset() {
        let mut env = RinkEnv::new(
            RinkSettings {
                max_steps: 3,
                ..Default::default()
            },
            0,
        )
        .unwrap();
        env.reset(Some(1)).unwrap();
        env.step([0.0, 0.0]).unwrap();
        env.step([0.0, 0.0]).unwrap();
        let last = env.step([0.0, 0.0]).unwrap();
        assert!(last.terminated);
        assert!(!last.truncated);
        assert_eq!(last.outcome, Outcome::Timeout);
        assert_eq!(last.info.get(RESULT_KEY).map(String::as_str), Some("timeout"));

        assert!(matches!(
            env.step([0.0, 0.0]),
            Err(RinkError::InvalidSequence { .. })
        ));

        env.reset(None).unwrap();
        assert!(env.step([0.0, 0.0]).is_ok());
    }

    #[test]
    fn test_nan_action_rejected_without_touching_state() {
        let mut env = RinkEnv::new(RinkSettings::default(), 0).unwrap();
        env.reset(Some(9)).unwrap();
        let before = *env.state().unwrap();

        assert!(matches!(
            env.step([f32::NAN, 0.0]),
            Err(RinkError::InvalidInput { .. })
        ));
        assert_eq!(*env.state().unwrap(), before);
        // Episode is still live
        assert!(env.step([0.0, 0.0]).is_ok());
    }

    #[test]
    fn test_non_terminal_info_is_empty() {
        let mut env = RinkEnv::new(RinkSettings::default(), 0).unwrap();
        env.reset(Some(2)).unwrap();
        let result = env.step([0.2, 0.2]).unwrap();
        assert!(!result.terminated);
        assert!(result.info.is_empty());
        assert_eq!(result.outcome, Outcome::Active);
    }

    #[test]
    fn test_reset_none_continues_stream() {
        let settings = RinkSettings::default();
        let mut a = RinkEnv::new(settings.clone(), 11).unwrap();
        let mut b = RinkEnv::new(settings, 11).unwrap();

        let first = a.reset(None).unwrap().0;
        let second = a.reset(None).unwrap().0;
        assert_eq!(b.reset(None).unwrap().0, first);
        assert_eq!(b.reset(None).unwrap().0, second);
        assert_ne!(first.puck_velocity(), second.puck_velocity());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = RinkSettings {
            friction: 2.0,
            ..Default::default()
        };
        assert!(matches!(
            RinkEnv::new(settings, 0),
            Err(RinkError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_render() {
        let mut env = RinkEnv::new(
            RinkSettings {
                puck_lateral_spread: 0.0,
                ..Default::default()
            },
            0,
        )
        .unwrap();
        env.reset(None).unwrap();
        env.step([1.0, 0.0]).unwrap();
        assert_eq!(env.render(), "Step 1: Goalie at (0.10, 0.00), Puck at (-4.96, 0.00)");
    }
}
