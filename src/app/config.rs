//! Configuration types for agent creation.

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    q_learning::{LearningSchedule, PolicyMode},
};

/// Configuration for creating a learning agent.
///
/// Builder-style and serde-friendly, so the same values can come from code,
/// a JSON file or the command line.
///
/// # Examples
///
/// ```
/// use smartcab::app::AgentConfig;
///
/// let config = AgentConfig::default().with_alpha(0.5).with_seed(7);
/// assert!(config.validate().is_ok());
/// assert!(AgentConfig::default().with_gamma(1.5).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Learning rate α
    pub alpha: f64,
    /// Discount factor γ
    pub gamma: f64,
    /// Starting exploration probability ε
    pub epsilon: f64,
    /// Optimistic value for every action of a newly seen state
    pub initial_q_value: f64,
    /// Completed trials per ε decay step
    pub decay_interval: usize,
    pub policy: PolicyMode,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            alpha: 0.75,
            gamma: 0.5,
            epsilon: 0.2,
            // well above the per-move rewards so untried actions get tried
            initial_q_value: 3.0,
            decay_interval: LearningSchedule::DEFAULT_DECAY_INTERVAL,
            policy: PolicyMode::QLearning,
            seed: None,
        }
    }
}

impl AgentConfig {
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_initial_q_value(mut self, value: f64) -> Self {
        self.initial_q_value = value;
        self
    }

    pub fn with_decay_interval(mut self, interval: usize) -> Self {
        self.decay_interval = interval;
        self
    }

    pub fn with_policy(mut self, policy: PolicyMode) -> Self {
        self.policy = policy;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check parameter ranges.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] when α, γ or ε leave `[0, 1]` or
    /// `initial_q_value` is not finite; [`Error::InvalidConfiguration`] for a
    /// zero decay interval.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("alpha", self.alpha),
            ("gamma", self.gamma),
            ("epsilon", self.epsilon),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidParameter {
                    name,
                    value,
                    min: 0.0,
                    max: 1.0,
                });
            }
        }
        if !self.initial_q_value.is_finite() {
            return Err(Error::InvalidParameter {
                name: "initial_q_value",
                value: self.initial_q_value,
                min: f64::MIN,
                max: f64::MAX,
            });
        }
        if self.decay_interval == 0 {
            return Err(Error::InvalidConfiguration {
                message: "decay_interval must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn schedule(&self) -> LearningSchedule {
        LearningSchedule::new(self.alpha, self.gamma, self.epsilon, self.decay_interval)
    }

    /// Load a configuration from a JSON file. Missing fields take their
    /// defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::io(format!("open config {}", path.display()), e))?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }
}
