//! Subcommands of the `smartcab` binary

pub mod compare;
pub mod train;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::config::RunConfig;

/// Options shared by every command that runs trials.
///
/// Flags override values read from `--config`.
#[derive(Args, Debug, Clone, Default)]
pub struct RunOptions {
    /// JSON run configuration with optional agent, world and trials sections
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of trials
    #[arg(long, short = 'n')]
    pub trials: Option<usize>,

    /// Random seed for the agent, the world and the trial loop
    #[arg(long)]
    pub seed: Option<u64>,

    /// Learning rate α (0.0-1.0)
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Discount factor γ (0.0-1.0)
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Starting exploration probability ε (0.0-1.0)
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Optimistic initial value for unseen states
    #[arg(long = "q-init")]
    pub q_init: Option<f64>,

    /// Completed trials per ε decay step
    #[arg(long)]
    pub decay_interval: Option<usize>,

    /// Number of wandering dummy cars
    #[arg(long)]
    pub dummies: Option<usize>,

    /// End each trial once its deadline runs out
    #[arg(long, default_value_t = false)]
    pub enforce_deadline: bool,
}

impl RunOptions {
    /// Load `--config` (or defaults) and apply the flag overrides.
    pub fn resolve(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load(path).with_context(|| {
                format!("failed to load run configuration from {}", path.display())
            })?,
            None => RunConfig::default(),
        };

        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(trials) = self.trials {
            config.trials.num_trials = trials;
        }
        if let Some(alpha) = self.alpha {
            config.agent.alpha = alpha;
        }
        if let Some(gamma) = self.gamma {
            config.agent.gamma = gamma;
        }
        if let Some(epsilon) = self.epsilon {
            config.agent.epsilon = epsilon;
        }
        if let Some(q_init) = self.q_init {
            config.agent.initial_q_value = q_init;
        }
        if let Some(interval) = self.decay_interval {
            config.agent.decay_interval = interval;
        }
        if let Some(dummies) = self.dummies {
            config.world.dummy_agents = dummies;
        }
        if self.enforce_deadline {
            config.world.enforce_deadline = true;
        }

        config.validate()?;
        Ok(config)
    }
}
