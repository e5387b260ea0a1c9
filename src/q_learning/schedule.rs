//! Learning-rate and exploration schedule across trials

use serde::{Deserialize, Serialize};

/// Learning parameters in force for one trial.
///
/// Derived once at each trial boundary and passed by value into the update
/// rule and the policy, so nothing mutates them mid-trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialContext {
    /// Number of trials completed before this one
    pub trial_index: usize,
    /// Learning rate α
    pub alpha: f64,
    /// Discount factor γ
    pub gamma: f64,
    /// Exploration probability ε
    pub epsilon: f64,
}

/// Hyperbolic ε decay from fixed starting values.
///
/// `ε(t) = ε₀ / (⌊t / interval⌋ + 1)` where `t` counts completed trials, so
/// every `interval` trials the next divisor step kicks in (ε halves at the
/// first step, drops to a third at the second, and so on).
///
/// α and γ run through the schedule too but come out unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LearningSchedule {
    start_alpha: f64,
    start_gamma: f64,
    start_epsilon: f64,
    decay_interval: usize,
}

impl LearningSchedule {
    pub const DEFAULT_DECAY_INTERVAL: usize = 25;

    /// `decay_interval` of zero is treated as one.
    pub fn new(alpha: f64, gamma: f64, epsilon: f64, decay_interval: usize) -> Self {
        Self {
            start_alpha: alpha,
            start_gamma: gamma,
            start_epsilon: epsilon,
            decay_interval: decay_interval.max(1),
        }
    }

    pub fn alpha_at(&self, _trial_index: usize) -> f64 {
        self.start_alpha
    }

    pub fn gamma_at(&self, _trial_index: usize) -> f64 {
        self.start_gamma
    }

    pub fn epsilon_at(&self, trial_index: usize) -> f64 {
        // integer step first; the +1 keeps the first interval undecayed
        let step = trial_index / self.decay_interval;
        self.start_epsilon / (step as f64 + 1.0)
    }

    /// Parameters for the trial that follows `trial_index` completed trials.
    pub fn context_for(&self, trial_index: usize) -> TrialContext {
        TrialContext {
            trial_index,
            alpha: self.alpha_at(trial_index),
            gamma: self.gamma_at(trial_index),
            epsilon: self.epsilon_at(trial_index),
        }
    }

    pub fn decay_interval(&self) -> usize {
        self.decay_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> LearningSchedule {
        LearningSchedule::new(0.75, 0.5, 0.2, 25)
    }

    #[test]
    fn epsilon_halves_after_first_interval() {
        let s = schedule();
        assert_eq!(s.epsilon_at(0), 0.2);
        assert_eq!(s.epsilon_at(24), 0.2);
        assert!((s.epsilon_at(25) - s.epsilon_at(0) / 2.0).abs() < 1e-12);
        assert!((s.epsilon_at(50) - 0.2 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn epsilon_is_non_increasing() {
        let s = schedule();
        let mut previous = s.epsilon_at(0);
        for t in 1..500 {
            let current = s.epsilon_at(t);
            assert!(current <= previous, "epsilon rose at trial {t}");
            previous = current;
        }
    }

    #[test]
    fn alpha_and_gamma_hold_their_starting_values() {
        let s = schedule();
        for t in [0, 1, 25, 100, 1000] {
            let ctx = s.context_for(t);
            assert_eq!(ctx.alpha, 0.75);
            assert_eq!(ctx.gamma, 0.5);
            assert_eq!(ctx.trial_index, t);
        }
    }

    #[test]
    fn zero_interval_does_not_divide_by_zero() {
        let s = LearningSchedule::new(0.5, 0.5, 0.4, 0);
        assert_eq!(s.decay_interval(), 1);
        assert_eq!(s.epsilon_at(0), 0.4);
        assert_eq!(s.epsilon_at(1), 0.2);
    }
}
