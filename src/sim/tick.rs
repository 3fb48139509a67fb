//! Fixed timestep simulation tick
//!
//! Pure transition: takes a state by value, returns the next one. No hidden
//! mutable state, so identical inputs always give bit-identical outputs.

use glam::Vec2;

use super::codec::clamp_action;
use super::outcome::{Outcome, classify};
use super::state::SimulationState;
use crate::settings::RinkSettings;

/// Result of advancing one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub state: SimulationState,
    /// Shaping reward, or the terminal reward when `outcome` is terminal
    pub reward: f32,
    pub outcome: Outcome,
}

/// Proximity reward: `max(0, radius - distance) * scale`
#[inline]
pub fn shaping_reward(state: &SimulationState, settings: &RinkSettings) -> f32 {
    (settings.proximity_radius - state.separation()).max(0.0) * settings.shaping_scale
}

/// Advance the state by one fixed timestep.
///
/// `action` is clamped here; callers at the boundary are expected to have
/// rejected non-finite values already.
pub fn advance(mut state: SimulationState, action: Vec2, settings: &RinkSettings) -> Transition {
    let action = clamp_action(action);

    // Goalie: move then clamp to the crease. Clamping is the only collision.
    state.goalie_position = (state.goalie_position + action * settings.move_scale)
        .clamp(settings.arena_min, settings.arena_max);

    // Puck: integrate then decay (friction only, never zeroed)
    state.puck_position += state.puck_velocity * settings.dt;
    state.puck_velocity *= settings.friction;

    let shaping = shaping_reward(&state, settings);

    state.step_count += 1;

    let outcome = classify(&state, settings);
    // Terminal reward replaces shaping, it is not added to it
    let reward = outcome.reward(settings).unwrap_or(shaping);

    Transition {
        state,
        reward,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn kickoff() -> SimulationState {
        SimulationState {
            goalie_position: Vec2::ZERO,
            puck_position: Vec2::new(-5.0, 0.0),
            puck_velocity: Vec2::new(2.0, 0.0),
            step_count: 0,
        }
    }

    #[test]
    fn test_single_step_dynamics() {
        let s = RinkSettings::default();
        let t = advance(kickoff(), Vec2::new(1.0, -0.5), &s);

        assert!((t.state.goalie_position - Vec2::new(0.1, -0.05)).length() < 1e-5);
        assert!((t.state.puck_position - Vec2::new(-4.96, 0.0)).length() < 1e-5);
        assert!((t.state.puck_velocity - Vec2::new(1.98, 0.0)).length() < 1e-5);
        assert_eq!(t.state.step_count, 1);
        assert_eq!(t.outcome, Outcome::Active);
    }

    #[test]
    fn test_shaping_reward_value() {
        let s = RinkSettings::default();
        let t = advance(kickoff(), Vec2::ZERO, &s);
        // Puck at -4.96, goalie at origin
        let expected = (10.0 - 4.96) * 0.1;
        assert!((t.reward - expected).abs() < 1e-5);
    }

    #[test]
    fn test_shaping_floor_at_zero() {
        let s = RinkSettings::default();
        let far = SimulationState {
            puck_position: Vec2::new(-7.9, 7.0),
            ..kickoff()
        };
        assert_eq!(shaping_reward(&far, &s), 0.0);
    }

    #[test]
    fn test_goalie_clamped_to_crease() {
        let s = RinkSettings::default();
        let mut state = kickoff();
        for _ in 0..100 {
            state = advance(state, Vec2::new(50.0, -50.0), &s).state;
        }
        assert_eq!(state.goalie_position, Vec2::new(2.0, -1.5));
    }

    #[test]
    fn test_terminal_reward_replaces_shaping() {
        let s = RinkSettings::default();
        // One step from the miss line, right next to the goalie
        let state = SimulationState {
            goalie_position: Vec2::new(2.0, 0.0),
            puck_position: Vec2::new(7.99, 2.0),
            puck_velocity: Vec2::new(2.0, 0.0),
            step_count: 5,
        };
        let t = advance(state, Vec2::ZERO, &s);
        assert_eq!(t.outcome, Outcome::Miss);
        assert_eq!(t.reward, 50.0);
    }

    #[test]
    fn test_last_step_is_timeout() {
        let s = RinkSettings::default();
        let state = SimulationState {
            step_count: s.max_steps - 1,
            ..kickoff()
        };
        let t = advance(state, Vec2::ZERO, &s);
        assert_eq!(t.state.step_count, s.max_steps);
        assert_eq!(t.outcome, Outcome::Timeout);
        assert_eq!(t.reward, -10.0);
    }

    #[test]
    fn test_speed_never_increases() {
        let s = RinkSettings::default();
        let mut state = SimulationState {
            puck_velocity: Vec2::new(2.0, 0.4),
            ..kickoff()
        };
        let mut speed = state.puck_velocity.length();
        for _ in 0..50 {
            state = advance(state, Vec2::ZERO, &s).state;
            let next = state.puck_velocity.length();
            assert!(next <= speed);
            speed = next;
        }
    }

    #[test]
    fn test_determinism() {
        let s = RinkSettings::default();
        let actions = [
            Vec2::new(0.5, 0.1),
            Vec2::new(-3.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::ZERO,
        ];
        let mut a = kickoff();
        let mut b = kickoff();
        for action in actions {
            let ta = advance(a, action, &s);
            let tb = advance(b, action, &s);
            assert_eq!(ta.reward.to_bits(), tb.reward.to_bits());
            a = ta.state;
            b = tb.state;
        }
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_goalie_stays_in_bounds(
            actions in proptest::collection::vec((-1e4f32..1e4, -1e4f32..1e4), 1..200)
        ) {
            let s = RinkSettings::default();
            let mut state = kickoff();
            for (x, z) in actions {
                state = advance(state, Vec2::new(x, z), &s).state;
                prop_assert!((-2.0..=2.0).contains(&state.goalie_position.x));
                prop_assert!((-1.5..=1.5).contains(&state.goalie_position.y));
            }
        }
    }
}
