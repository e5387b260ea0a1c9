//! Q-learning driving agent
//!
//! Drives the per-tick sense → learn → act loop and the per-trial parameter
//! and statistics bookkeeping. The update for an action is applied one tick
//! late: its reward is only known once the environment has resolved it, and
//! the successor state is only observed on the next sensing pass.

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Error, Result,
    app::AgentConfig,
    ports::{Environment, Planner},
    q_learning::{
        policy::{PolicyMode, choose_action},
        q_table::ValueTable,
        schedule::{LearningSchedule, TrialContext},
        state::State,
        stats::{Scoreboard, TrialStats},
    },
    types::{Action, Location},
};

/// The most recent `(state, action, reward)`, learned from on the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: State,
    pub action: Action,
    pub reward: f64,
}

/// What happened on one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Tick number supplied by the trial driver
    pub tick: usize,
    pub state: State,
    pub action: Action,
    pub reward: f64,
    /// Deadline sensed before acting
    pub deadline: i32,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Tabular Q-learning agent for the smartcab world
///
/// Holds the value table for the whole run. Each trial gets an immutable
/// [`TrialContext`] from the schedule; transition memory and the open
/// [`TrialStats`] record are reset at every trial boundary.
pub struct LearningAgent {
    table: ValueTable,
    schedule: LearningSchedule,
    context: TrialContext,
    policy: PolicyMode,
    planner: Box<dyn Planner>,
    rng: StdRng,
    rng_seed: Option<u64>,
    previous: Option<Transition>,
    trials_started: usize,
    current: Option<TrialStats>,
    scoreboard: Scoreboard,
}

impl LearningAgent {
    /// Create a new agent
    ///
    /// # Arguments
    ///
    /// * `schedule` - Starting α, γ, ε and the ε decay interval
    /// * `initial_q_value` - Optimistic value for every action of a new state
    /// * `planner` - Route planner supplying the waypoint hint
    pub fn new(
        schedule: LearningSchedule,
        initial_q_value: f64,
        planner: Box<dyn Planner>,
    ) -> Self {
        Self {
            table: ValueTable::new(initial_q_value),
            context: schedule.context_for(0),
            schedule,
            policy: PolicyMode::default(),
            planner,
            rng: build_rng(None),
            rng_seed: None,
            previous: None,
            trials_started: 0,
            current: None,
            scoreboard: Scoreboard::new(),
        }
    }

    /// Build an agent from a validated configuration.
    pub fn from_config(config: &AgentConfig, planner: Box<dyn Planner>) -> Result<Self> {
        config.validate()?;
        let agent = Self::new(config.schedule(), config.initial_q_value, planner)
            .with_policy(config.policy);
        Ok(match config.seed {
            Some(seed) => agent.with_seed(seed),
            None => agent,
        })
    }

    pub fn with_policy(mut self, policy: PolicyMode) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.set_rng_seed(seed);
        self
    }

    pub fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
    }

    /// Start a new trial heading for `destination`.
    ///
    /// Closes the trial in progress, if any, and returns its finalized
    /// record. Then derives the parameters for the new trial, opens a fresh
    /// record and forgets the previous transition.
    pub fn reset(&mut self, destination: Location) -> Option<TrialStats> {
        self.planner.route_to(destination);
        self.previous = None;

        let finished = self.close_trial();

        self.context = self
            .schedule
            .context_for(self.scoreboard.trials_completed());
        self.trials_started += 1;
        self.current = Some(TrialStats::open(self.trials_started, &self.context));
        debug!(
            trial = self.trials_started,
            %destination,
            alpha = self.context.alpha,
            gamma = self.context.gamma,
            epsilon = self.context.epsilon,
            "trial started"
        );

        finished
    }

    /// Close the trial in progress without starting another one.
    pub fn finish(&mut self) -> Option<TrialStats> {
        self.previous = None;
        self.close_trial()
    }

    fn close_trial(&mut self) -> Option<TrialStats> {
        let stats = self.scoreboard.finalize(self.current.take()?);
        info!(
            trial = stats.trial,
            net_reward = stats.net_reward,
            penalties = stats.penalty_count,
            time_taken = stats.time_taken,
            success = stats.success,
            success_rate = stats.cumulative_success_rate,
            "trial finished"
        );
        Some(stats)
    }

    /// Run one tick against `env`.
    ///
    /// # Errors
    ///
    /// [`Error::TrialNotStarted`] before the first [`reset`](Self::reset) or
    /// after [`finish`](Self::finish); otherwise any error the environment
    /// reports.
    pub fn update<E: Environment + ?Sized>(&mut self, env: &mut E, tick: usize) -> Result<Step> {
        if self.current.is_none() {
            return Err(Error::TrialNotStarted);
        }

        let waypoint = self.planner.next_waypoint(env.pose()?);
        let inputs = env.sense()?;
        let deadline = env.deadline();
        let state = State::encode(inputs, waypoint);

        match self.previous.take() {
            // first tick of the trial: nothing to learn from yet
            None => {
                self.table.create(state);
            }
            Some(prev) => self.table.apply_update(
                prev.state,
                prev.action,
                prev.reward,
                &state,
                &self.context,
            ),
        }

        let action = choose_action(
            &self.table,
            &state,
            self.context.epsilon,
            self.policy,
            &mut self.rng,
        );
        let reward = env.act(action)?;

        if let Some(stats) = self.current.as_mut() {
            stats.record(reward, deadline);
        }
        self.previous = Some(Transition {
            state,
            action,
            reward,
        });

        debug!(tick, deadline, %state, %action, reward, "tick");

        Ok(Step {
            tick,
            state,
            action,
            reward,
            deadline,
        })
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    /// Parameters of the current (or upcoming) trial
    pub fn context(&self) -> &TrialContext {
        &self.context
    }

    pub fn policy(&self) -> PolicyMode {
        self.policy
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }

    /// Record of the trial in progress
    pub fn current_stats(&self) -> Option<&TrialStats> {
        self.current.as_ref()
    }

    pub fn previous_transition(&self) -> Option<&Transition> {
        self.previous.as_ref()
    }

    pub fn trials_started(&self) -> usize {
        self.trials_started
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Heading, Inputs, Light, Pose};

    struct StraightRoad {
        light: Light,
        deadline: i32,
        reward: f64,
    }

    impl Environment for StraightRoad {
        fn sense(&self) -> Result<Inputs> {
            Ok(Inputs::clear(self.light))
        }

        fn deadline(&self) -> i32 {
            self.deadline
        }

        fn pose(&self) -> Result<Pose> {
            Ok(Pose {
                location: Location::new(0, 0),
                heading: Heading::East,
            })
        }

        fn act(&mut self, _action: Action) -> Result<f64> {
            self.deadline -= 1;
            Ok(self.reward)
        }
    }

    struct AlwaysForward;

    impl Planner for AlwaysForward {
        fn route_to(&mut self, _destination: Location) {}

        fn next_waypoint(&mut self, _pose: Pose) -> Action {
            Action::Forward
        }
    }

    fn agent() -> LearningAgent {
        LearningAgent::new(
            LearningSchedule::new(0.75, 0.5, 0.2, 25),
            3.0,
            Box::new(AlwaysForward),
        )
        .with_seed(1)
    }

    #[test]
    fn test_update_before_reset_is_rejected() {
        let mut agent = agent();
        let mut road = StraightRoad {
            light: Light::Green,
            deadline: 5,
            reward: 1.0,
        };
        assert!(matches!(
            agent.update(&mut road, 0),
            Err(Error::TrialNotStarted)
        ));
    }

    #[test]
    fn test_first_reset_returns_nothing() {
        let mut agent = agent();
        assert!(agent.reset(Location::new(3, 3)).is_none());
        assert_eq!(agent.trials_started(), 1);
        assert_eq!(agent.current_stats().map(|s| s.trial), Some(1));
    }

    #[test]
    fn test_first_tick_registers_state_without_learning() {
        let mut agent = agent();
        agent.reset(Location::new(3, 3));
        let mut road = StraightRoad {
            light: Light::Green,
            deadline: 5,
            reward: -1.0,
        };

        let step = agent.update(&mut road, 0).unwrap();

        assert_eq!(agent.table().len(), 1);
        for action in Action::ALL {
            assert_eq!(agent.table().value(&step.state, action), Some(3.0));
        }
        let prev = agent.previous_transition().unwrap();
        assert_eq!(prev.action, step.action);
        assert_eq!(prev.reward, -1.0);
    }

    #[test]
    fn test_reset_clears_transition_memory() {
        let mut agent = agent();
        agent.reset(Location::new(3, 3));
        let mut road = StraightRoad {
            light: Light::Red,
            deadline: 5,
            reward: 0.0,
        };
        agent.update(&mut road, 0).unwrap();
        assert!(agent.previous_transition().is_some());

        let finished = agent.reset(Location::new(1, 1)).unwrap();
        assert_eq!(finished.trial, 1);
        assert_eq!(finished.time_taken, 1);
        assert!(agent.previous_transition().is_none());
    }

    #[test]
    fn test_finish_closes_last_trial_once() {
        let mut agent = agent();
        agent.reset(Location::new(3, 3));
        assert!(agent.finish().is_some());
        assert!(agent.finish().is_none());
        assert_eq!(agent.scoreboard().trials_completed(), 1);
    }
}
