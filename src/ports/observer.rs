//! Observer port - abstraction for run observation and data collection
//!
//! Finalized [`TrialStats`] records are the only artifact the agent hands
//! outward; observers decide what to do with them (progress display, CSV,
//! metrics) without coupling the trial loop to any output format.

use crate::{
    Result,
    q_learning::{Scoreboard, Step, TrialStats},
};

/// Observer trait for monitoring a training run
///
/// # Event Sequence
///
/// 1. `on_run_start(total_trials)` - Once at the beginning
/// 2. For each trial:
///    - `on_trial_end(stats)` for the previous trial, if any
///    - `on_trial_start(trial)`
///    - `on_step(trial, step)` - For each tick
/// 3. `on_trial_end(stats)` for the last trial
/// 4. `on_run_end(scoreboard)` - Once at the end
///
/// A trial is only closed when the next one is reset, so a trial's
/// `on_trial_end` arrives just before the next trial's `on_trial_start`.
pub trait Observer: Send {
    fn on_run_start(&mut self, _total_trials: usize) -> Result<()> {
        Ok(())
    }

    /// `trial` is 1-based.
    fn on_trial_start(&mut self, _trial: usize) -> Result<()> {
        Ok(())
    }

    fn on_step(&mut self, _trial: usize, _step: &Step) -> Result<()> {
        Ok(())
    }

    /// Called with each finalized, archived trial record.
    fn on_trial_end(&mut self, _stats: &TrialStats) -> Result<()> {
        Ok(())
    }

    fn on_run_end(&mut self, _scoreboard: &Scoreboard) -> Result<()> {
        Ok(())
    }
}
