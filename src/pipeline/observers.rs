//! Observer implementations for trial runs
//!
//! Observers allow composable data collection during a run without coupling
//! the trial loop to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::Observer,
    q_learning::{Scoreboard, Step, TrialStats},
    world::reward,
};

/// Everything recorded about one trial
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub trial: usize,
    pub stats: TrialStats,
    pub steps: Vec<Step>,
}

/// Progress bar observer - Shows run progress and the running success rate
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self { progress_bar: None }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_run_start(&mut self, total_trials: usize) -> Result<()> {
        let pb = ProgressBar::new(total_trials as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} trials ({msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_trial_end(&mut self, stats: &TrialStats) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.set_position(stats.trial as u64);
            pb.set_message(format!(
                "success {:.1}%, ε {:.3}",
                stats.cumulative_success_rate, stats.epsilon
            ));
        }
        Ok(())
    }

    fn on_run_end(&mut self, scoreboard: &Scoreboard) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!(
                "success {:.1}%",
                scoreboard.cumulative_success_rate()
            ));
        }
        Ok(())
    }
}

/// Metrics observer - Tracks run-level aggregates
///
/// Illegal moves are recognised by reward alone: a step counts when its reward
/// equals `violation_reward`, which defaults to the reference world's
/// [`reward::VIOLATION`]. Environments with another reward table set theirs
/// through [`MetricsObserver::with_violation_reward`].
#[derive(Debug)]
pub struct MetricsObserver {
    total_trials: usize,
    successes: usize,
    total_reward: f64,
    total_penalties: u64,
    trial_lengths: Vec<u32>,
    violation_reward: f64,
    illegal_moves: usize,
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self {
            total_trials: 0,
            successes: 0,
            total_reward: 0.0,
            total_penalties: 0,
            trial_lengths: Vec::new(),
            violation_reward: reward::VIOLATION,
            illegal_moves: 0,
        }
    }

    /// Reward the environment gives a rejected move
    pub fn with_violation_reward(mut self, violation_reward: f64) -> Self {
        self.violation_reward = violation_reward;
        self
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_trials == 0 {
            0.0
        } else {
            100.0 * self.successes as f64 / self.total_trials as f64
        }
    }

    pub fn mean_net_reward(&self) -> f64 {
        if self.total_trials == 0 {
            0.0
        } else {
            self.total_reward / self.total_trials as f64
        }
    }

    pub fn avg_trial_length(&self) -> f64 {
        if self.trial_lengths.is_empty() {
            0.0
        } else {
            self.trial_lengths.iter().map(|&t| f64::from(t)).sum::<f64>()
                / self.trial_lengths.len() as f64
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_trials: self.total_trials,
            successes: self.successes,
            success_rate: self.success_rate(),
            mean_net_reward: self.mean_net_reward(),
            total_penalties: self.total_penalties,
            avg_trial_length: self.avg_trial_length(),
            illegal_moves: self.illegal_moves,
        }
    }
}

/// Summary of run metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_trials: usize,
    pub successes: usize,
    pub success_rate: f64,
    pub mean_net_reward: f64,
    pub total_penalties: u64,
    pub avg_trial_length: f64,
    /// Ticks that drew the traffic violation penalty
    pub illegal_moves: usize,
}

impl Observer for MetricsObserver {
    fn on_step(&mut self, _trial: usize, step: &Step) -> Result<()> {
        if step.reward == self.violation_reward {
            self.illegal_moves += 1;
        }
        Ok(())
    }

    fn on_trial_end(&mut self, stats: &TrialStats) -> Result<()> {
        self.total_trials += 1;
        self.successes += usize::from(stats.success);
        self.total_reward += stats.net_reward;
        self.total_penalties += u64::from(stats.penalty_count);
        self.trial_lengths.push(stats.time_taken);
        Ok(())
    }
}

/// CSV observer - Appends one row per finalized trial
pub struct CsvObserver {
    writer: csv::Writer<File>,
}

impl CsvObserver {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            writer: csv::Writer::from_path(path)?,
        })
    }
}

impl Observer for CsvObserver {
    fn on_trial_end(&mut self, stats: &TrialStats) -> Result<()> {
        self.writer.serialize(stats)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// JSONL observer - Exports observations to JSON Lines format
pub struct JsonlObserver {
    writer: BufWriter<File>,
    current_trial_steps: Vec<Step>,
}

impl JsonlObserver {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|e| Error::io(format!("create observations {}", path.display()), e))?;
        Ok(Self {
            writer: BufWriter::new(file),
            current_trial_steps: Vec::new(),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_trial_start(&mut self, _trial: usize) -> Result<()> {
        self.current_trial_steps.clear();
        Ok(())
    }

    fn on_step(&mut self, _trial: usize, step: &Step) -> Result<()> {
        self.current_trial_steps.push(*step);
        Ok(())
    }

    fn on_trial_end(&mut self, stats: &TrialStats) -> Result<()> {
        let observation = Observation {
            trial: stats.trial,
            stats: stats.clone(),
            steps: std::mem::take(&mut self.current_trial_steps),
        };

        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
