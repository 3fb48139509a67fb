//! Fixed-policy evaluation harness
//!
//! Runs a deterministic policy for a number of episodes, records each
//! terminal outcome and episode reward, and labels the mean reward.

use std::fmt;
use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::consts::{ACTION_LEN, MOVE_SCALE};
use crate::env::{Environment, RinkEnv};
use crate::error::Result;
use crate::settings::{EvalSettings, PerformanceThresholds, RinkSettings};
use crate::sim::{Observation, Outcome};

/// A deterministic mapping from observation to action
pub trait Policy {
    fn act(&mut self, observation: &Observation) -> [f32; ACTION_LEN];
}

impl<F> Policy for F
where
    F: FnMut(&Observation) -> [f32; ACTION_LEN],
{
    fn act(&mut self, observation: &Observation) -> [f32; ACTION_LEN] {
        self(observation)
    }
}

/// Goalie never moves
#[derive(Debug, Clone, Copy, Default)]
pub struct IdlePolicy;

impl Policy for IdlePolicy {
    fn act(&mut self, _observation: &Observation) -> [f32; ACTION_LEN] {
        [0.0, 0.0]
    }
}

/// Steers the goalie toward where the puck will be `lead_time` seconds ahead
#[derive(Debug, Clone, Copy)]
pub struct TrackPuckPolicy {
    /// Action per unit of position error (1 / move scale closes the gap in one step)
    pub gain: f32,
    pub lead_time: f32,
}

impl Default for TrackPuckPolicy {
    fn default() -> Self {
        Self {
            gain: 1.0 / MOVE_SCALE,
            lead_time: 0.0,
        }
    }
}

impl Policy for TrackPuckPolicy {
    fn act(&mut self, observation: &Observation) -> [f32; ACTION_LEN] {
        let target = observation.puck_position() + observation.puck_velocity() * self.lead_time;
        ((target - observation.goalie_position()) * self.gain).to_array()
    }
}

/// One completed (non-abandoned) episode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub outcome: Outcome,
    /// Sum of per-step rewards
    pub reward: f32,
    pub steps: u32,
}

/// Terminal outcome tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub miss: u32,
    pub goal: u32,
    pub save: u32,
    pub timeout: u32,
}

/// Coarse label for a mean episode reward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceLevel {
    PerformingWell,
    Learning,
    NeedsMoreTraining,
}

impl PerformanceLevel {
    pub fn classify(mean_reward: f32, thresholds: &PerformanceThresholds) -> Self {
        if mean_reward > thresholds.performing_well {
            PerformanceLevel::PerformingWell
        } else if mean_reward > thresholds.learning {
            PerformanceLevel::Learning
        } else {
            PerformanceLevel::NeedsMoreTraining
        }
    }
}

impl fmt::Display for PerformanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PerformanceLevel::PerformingWell => "performing well",
            PerformanceLevel::Learning => "learning",
            PerformanceLevel::NeedsMoreTraining => "needs more training",
        })
    }
}

/// Ordered per-episode results plus their mean reward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub episodes: Vec<EpisodeRecord>,
    /// Mean of `episodes[..].reward` (0 when there are none)
    pub mean_reward: f32,
    /// Episodes abandoned by the harness; not part of `episodes` or the mean
    pub abandoned: u32,
}

impl EvaluationReport {
    pub fn new(episodes: Vec<EpisodeRecord>, abandoned: u32) -> Self {
        let mean_reward = if episodes.is_empty() {
            0.0
        } else {
            episodes.iter().map(|e| e.reward).sum::<f32>() / episodes.len() as f32
        };
        Self {
            episodes,
            mean_reward,
            abandoned,
        }
    }

    /// Concatenate two reports (e.g. from independent workers)
    pub fn merge(self, other: EvaluationReport) -> Self {
        let mut episodes = self.episodes;
        episodes.extend(other.episodes);
        Self::new(episodes, self.abandoned + other.abandoned)
    }

    pub fn outcome_counts(&self) -> OutcomeCounts {
        let mut counts = OutcomeCounts::default();
        for episode in &self.episodes {
            match episode.outcome {
                Outcome::Miss => counts.miss += 1,
                Outcome::Goal => counts.goal += 1,
                Outcome::Save => counts.save += 1,
                Outcome::Timeout => counts.timeout += 1,
                Outcome::Active => {}
            }
        }
        counts
    }

    pub fn performance(&self, thresholds: &PerformanceThresholds) -> PerformanceLevel {
        PerformanceLevel::classify(self.mean_reward, thresholds)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json_pretty()?)?;
        log::info!("Evaluation report saved to: {}", path.display());
        Ok(())
    }

    fn from_runs(runs: Vec<Option<EpisodeRecord>>) -> Self {
        let mut episodes = Vec::with_capacity(runs.len());
        let mut abandoned = 0;
        for (i, run) in runs.into_iter().enumerate() {
            match run {
                Some(record) => {
                    log::info!(
                        "Episode {}: {} (Reward: {:.1})",
                        i + 1,
                        record.outcome.as_str().to_uppercase(),
                        record.reward
                    );
                    episodes.push(record);
                }
                None => abandoned += 1,
            }
        }
        Self::new(episodes, abandoned)
    }

    fn log_summary(&self, thresholds: &PerformanceThresholds) {
        log::info!("Average test reward: {:.1}", self.mean_reward);
        log::info!("Goalie is {}", self.performance(thresholds));
    }
}

/// Run one episode to its terminal step.
///
/// Returns `None` if `abandon_after` steps pass without termination; an
/// abandoned episode is discarded, not counted as a timeout.
pub fn run_episode<E, P>(
    env: &mut E,
    policy: &mut P,
    seed: Option<u64>,
    abandon_after: Option<u32>,
) -> Result<Option<EpisodeRecord>>
where
    E: Environment + ?Sized,
    P: Policy + ?Sized,
{
    let (mut observation, _) = env.reset(seed)?;
    let mut reward = 0.0f32;
    let mut steps = 0u32;

    loop {
        if abandon_after.is_some_and(|limit| steps >= limit) {
            log::warn!("Abandoning episode after {} steps", steps);
            return Ok(None);
        }
        let result = env.step(policy.act(&observation))?;
        reward += result.reward;
        steps += 1;
        if result.terminated {
            return Ok(Some(EpisodeRecord {
                outcome: result.outcome,
                reward,
                steps,
            }));
        }
        observation = result.observation;
    }
}

/// Evaluate `policy` sequentially on `env`. Episode `i` is reset with `seed + i`.
pub fn evaluate<E, P>(env: &mut E, policy: &mut P, eval: &EvalSettings) -> Result<EvaluationReport>
where
    E: Environment + ?Sized,
    P: Policy + ?Sized,
{
    eval.validate()?;
    let runs = (0..eval.episode_count)
        .map(|i| {
            let seed = eval.seed.wrapping_add(u64::from(i));
            run_episode(&mut *env, &mut *policy, Some(seed), eval.abandon_after_steps)
        })
        .collect::<Result<Vec<_>>>()?;

    let report = EvaluationReport::from_runs(runs);
    report.log_summary(&eval.thresholds);
    Ok(report)
}

/// Evaluate with one fresh environment and policy per episode on the rayon
/// pool. Produces the same report as `evaluate` on a `RinkEnv` with the same
/// settings, because every episode is reset with its own explicit seed.
pub fn evaluate_parallel<F, P>(
    settings: &RinkSettings,
    eval: &EvalSettings,
    make_policy: F,
) -> Result<EvaluationReport>
where
    F: Fn() -> P + Sync,
    P: Policy,
{
    eval.validate()?;
    settings.validate()?;
    let runs = (0..eval.episode_count)
        .into_par_iter()
        .map(|i| {
            let seed = eval.seed.wrapping_add(u64::from(i));
            let mut env = RinkEnv::new(settings.clone(), seed)?;
            let mut policy = make_policy();
            run_episode(&mut env, &mut policy, Some(seed), eval.abandon_after_steps)
        })
        .collect::<Result<Vec<_>>>()?;

    let report = EvaluationReport::from_runs(runs);
    report.log_summary(&eval.thresholds);
    Ok(report)
}
