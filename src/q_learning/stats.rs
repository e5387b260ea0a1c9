//! Per-trial statistics and run-wide success bookkeeping

use serde::{Deserialize, Serialize};

use crate::q_learning::schedule::TrialContext;

/// Record of one trial, opened at its reset and closed at the next one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialStats {
    /// 1-based trial number
    pub trial: usize,
    pub net_reward: f64,
    /// Ticks with a negative reward
    pub penalty_count: u32,
    /// Ticks taken
    pub time_taken: u32,
    /// Deadline still non-negative at the last action
    pub success: bool,
    pub alpha: f64,
    pub gamma: f64,
    pub epsilon: f64,
    /// Success percentage over every finalized trial, this one included
    pub cumulative_success_rate: f64,
}

impl TrialStats {
    /// Open a fresh record for `trial` under the given parameters.
    pub fn open(trial: usize, context: &TrialContext) -> Self {
        Self {
            trial,
            net_reward: 0.0,
            penalty_count: 0,
            time_taken: 0,
            success: false,
            alpha: context.alpha,
            gamma: context.gamma,
            epsilon: context.epsilon,
            cumulative_success_rate: 0.0,
        }
    }

    /// Account for one tick.
    pub fn record(&mut self, reward: f64, deadline: i32) {
        self.net_reward += reward;
        self.time_taken += 1;
        self.success = deadline >= 0;
        if reward < 0.0 {
            self.penalty_count += 1;
        }
    }
}

/// Aggregates that persist across the whole run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scoreboard {
    trials_completed: usize,
    success_count: usize,
    cumulative_success_rate: f64,
    history: Vec<TrialStats>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close a trial: count it, stamp the cumulative rate and archive it.
    ///
    /// Returns the archived record.
    pub fn finalize(&mut self, mut stats: TrialStats) -> TrialStats {
        self.trials_completed += 1;
        self.success_count += usize::from(stats.success);
        self.cumulative_success_rate = success_rate(self.success_count, self.trials_completed);
        stats.cumulative_success_rate = self.cumulative_success_rate;
        self.history.push(stats.clone());
        stats
    }

    pub fn trials_completed(&self) -> usize {
        self.trials_completed
    }

    pub fn success_count(&self) -> usize {
        self.success_count
    }

    /// Percentage in `[0, 100]`; zero before any trial has completed.
    pub fn cumulative_success_rate(&self) -> f64 {
        self.cumulative_success_rate
    }

    /// Archived records in trial order
    pub fn history(&self) -> &[TrialStats] {
        &self.history
    }
}

fn success_rate(successes: usize, trials: usize) -> f64 {
    if trials == 0 {
        0.0
    } else {
        successes as f64 / trials as f64 * 100.0
    }
}
