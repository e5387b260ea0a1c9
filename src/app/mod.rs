//! Application layer: agent configuration and wiring.
//!
//! ```
//! use smartcab::{
//!     app::{AgentConfig, build_agent},
//!     q_learning::PolicyMode,
//! };
//!
//! let config = AgentConfig::default()
//!     .with_epsilon(0.1)
//!     .with_policy(PolicyMode::QLearning)
//!     .with_seed(42);
//! let agent = build_agent(&config)?;
//! assert_eq!(agent.rng_seed(), Some(42));
//! # Ok::<(), smartcab::Error>(())
//! ```

pub mod config;

pub use config::AgentConfig;

use crate::{Result, q_learning::LearningAgent, world::RoutePlanner};

/// Create an agent wired to the reference route planner.
pub fn build_agent(config: &AgentConfig) -> Result<LearningAgent> {
    LearningAgent::from_config(config, Box::new(RoutePlanner::new()))
}
