//! Tabular Q-learning for the driving agent
//!
//! This module holds the learning core: state encoding, the value table and
//! its update rule, ε-greedy action selection, the ε decay schedule and the
//! per-trial statistics.
//!
//! ## Update rule
//!
//! The one-step, off-policy temporal difference (Q-learning) update
//!
//! ```text
//! Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
//! ```
//!
//! is applied one tick late, once the reward for `a` and the successor `s'`
//! are known. Unseen successors count as `initial_q_value`, which is set high
//! relative to the rewards so that untried actions keep getting tried.
//!
//! ## Usage Example
//!
//! ```no_run
//! use smartcab::{
//!     q_learning::{LearningAgent, LearningSchedule, PolicyMode},
//!     world::RoutePlanner,
//! };
//!
//! let agent = LearningAgent::new(
//!     LearningSchedule::new(0.75, 0.5, 0.2, 25), // alpha, gamma, epsilon, decay interval
//!     3.0,                                       // initial_q_value
//!     Box::new(RoutePlanner::new()),
//! )
//! .with_policy(PolicyMode::QLearning)
//! .with_seed(7);
//! ```

pub mod agent;
pub mod policy;
pub mod q_table;
pub mod schedule;
pub mod state;
pub mod stats;

// Public re-exports
pub use agent::{LearningAgent, Step, Transition};
pub use policy::{PolicyMode, choose_action, random_action};
pub use q_table::{ActionValues, ValueTable};
pub use schedule::{LearningSchedule, TrialContext};
pub use state::{State, StateId};
pub use stats::{Scoreboard, TrialStats};
