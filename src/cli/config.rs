//! Run configuration shared across CLI commands

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, app::AgentConfig, pipeline::TrialConfig, world::WorldConfig};

/// Everything one run needs, as read from a `--config` JSON file.
///
/// Every section and field is optional; missing values take their defaults.
///
/// ```json
/// {
///   "agent": { "alpha": 0.5, "epsilon": 0.1 },
///   "world": { "dummy_agents": 5, "enforce_deadline": true },
///   "trials": { "num_trials": 200, "seed": 7 }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub agent: AgentConfig,
    pub world: WorldConfig,
    pub trials: TrialConfig,
}

impl RunConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::io(format!("open config {}", path.display()), e))?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Use one seed for the agent, the world and the trial loop.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.agent.seed = Some(seed);
        self.world.seed = Some(seed);
        self.trials.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.agent.validate()?;
        self.world.validate()
    }
}
