//! Trial pipeline: drives one agent through a sequence of trips

use std::{fs::File, path::Path};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    Error, Result,
    ports::Observer,
    q_learning::{LearningAgent, TrialStats},
    world::World,
};

/// Trial run configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrialConfig {
    /// Number of trials to run
    pub num_trials: usize,

    /// Seed for the agent's random stream
    pub seed: Option<u64>,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            num_trials: 100,
            seed: None,
        }
    }
}

/// Result of a trial run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Trials completed in this run
    pub trials: usize,

    /// Trials that finished with the deadline still non-negative
    pub successes: usize,

    /// Success percentage in `[0, 100]`
    pub success_rate: f64,

    /// Trials where the cab actually arrived
    pub destinations_reached: usize,

    /// Mean net reward per trial
    pub mean_net_reward: f64,

    /// Mean ticks per trial
    pub mean_time_taken: f64,

    /// Penalised ticks over the whole run
    pub total_penalties: u64,

    /// Distinct states in the value table at the end of the run
    pub states_seen: usize,
}

impl RunSummary {
    /// Summarize a slice of finalized trial records.
    pub fn from_history(
        history: &[TrialStats],
        destinations_reached: usize,
        states_seen: usize,
    ) -> Self {
        let trials = history.len();
        let successes = history.iter().filter(|s| s.success).count();
        let mean = |total: f64| {
            if trials > 0 {
                total / trials as f64
            } else {
                0.0
            }
        };

        Self {
            trials,
            successes,
            success_rate: 100.0 * mean(successes as f64),
            destinations_reached,
            mean_net_reward: mean(history.iter().map(|s| s.net_reward).sum()),
            mean_time_taken: mean(history.iter().map(|s| f64::from(s.time_taken)).sum()),
            total_penalties: history.iter().map(|s| u64::from(s.penalty_count)).sum(),
            states_seen,
        }
    }

    /// Save summary to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|e| Error::io(format!("create summary {}", path.display()), e))?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load summary from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::io(format!("open summary {}", path.display()), e))?;
        Ok(serde_json::from_reader(file)?)
    }
}

/// Pipeline running one learning agent through the world
pub struct TrialPipeline {
    config: TrialConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrialPipeline {
    pub fn new(config: TrialConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrialConfig {
        &self.config
    }

    /// Run `num_trials` trials.
    ///
    /// Each tick runs [`World::tick`], then the agent's update, then
    /// [`World::advance`]. The value table carries over between trials and
    /// between calls. The last trial is closed with
    /// [`LearningAgent::finish`] before returning.
    pub fn run(&mut self, agent: &mut LearningAgent, world: &mut World) -> Result<RunSummary> {
        if let Some(seed) = self.config.seed {
            agent.set_rng_seed(seed);
        }
        let first_record = agent.scoreboard().history().len();
        let mut destinations_reached = 0;

        for observer in &mut self.observers {
            observer.on_run_start(self.config.num_trials)?;
        }

        for _ in 0..self.config.num_trials {
            let destination = world.reset();
            if let Some(stats) = agent.reset(destination) {
                self.trial_ended(&stats)?;
            }

            let trial = agent.trials_started();
            for observer in &mut self.observers {
                observer.on_trial_start(trial)?;
            }

            let mut tick = 0;
            while !world.is_done() {
                world.tick();
                let step = agent.update(world, tick)?;
                world.advance();
                for observer in &mut self.observers {
                    observer.on_step(trial, &step)?;
                }
                tick += 1;
            }

            if world.reached_destination() {
                destinations_reached += 1;
            } else if world.hit_time_limit() {
                warn!(trial, ticks = tick, "hard time limit reached, trial aborted");
            }
        }

        if let Some(stats) = agent.finish() {
            self.trial_ended(&stats)?;
        }
        for observer in &mut self.observers {
            observer.on_run_end(agent.scoreboard())?;
        }

        let summary = RunSummary::from_history(
            &agent.scoreboard().history()[first_record..],
            destinations_reached,
            agent.table().len(),
        );
        info!(
            trials = summary.trials,
            success_rate = summary.success_rate,
            states = summary.states_seen,
            "run finished"
        );
        Ok(summary)
    }

    fn trial_ended(&mut self, stats: &TrialStats) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_trial_end(stats)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::q_learning::LearningSchedule;

    fn record(trial: usize, success: bool, net_reward: f64, penalties: u32) -> TrialStats {
        let context = LearningSchedule::new(0.75, 0.5, 0.2, 25).context_for(0);
        let mut stats = TrialStats::open(trial, &context);
        stats.success = success;
        stats.net_reward = net_reward;
        stats.penalty_count = penalties;
        stats.time_taken = 10;
        stats
    }

    #[test]
    fn test_summary_from_history() {
        let history = [
            record(1, true, 12.0, 1),
            record(2, false, -4.0, 3),
            record(3, true, 4.0, 0),
            record(4, false, 0.0, 2),
        ];
        let summary = RunSummary::from_history(&history, 2, 17);
        assert_eq!(summary.trials, 4);
        assert_eq!(summary.successes, 2);
        assert_eq!(summary.success_rate, 50.0);
        assert_eq!(summary.mean_net_reward, 3.0);
        assert_eq!(summary.mean_time_taken, 10.0);
        assert_eq!(summary.total_penalties, 6);
        assert_eq!(summary.destinations_reached, 2);
        assert_eq!(summary.states_seen, 17);
    }

    #[test]
    fn test_empty_summary_has_zero_rates() {
        let summary = RunSummary::from_history(&[], 0, 0);
        assert_eq!(summary.success_rate, 0.0);
        assert_eq!(summary.mean_net_reward, 0.0);
    }

    #[test]
    fn test_summary_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let summary = RunSummary::from_history(&[record(1, true, 6.5, 0)], 1, 3);
        summary.save(&path).unwrap();
        assert_eq!(RunSummary::load(&path).unwrap(), summary);
    }

    #[test]
    fn test_default_config() {
        let config = TrialConfig::default();
        assert_eq!(config.num_trials, 100);
        assert!(config.seed.is_none());
    }
}
