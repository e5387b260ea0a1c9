//! Side-by-side evaluation of action-selection policies
//!
//! Runs the same trial schedule once per [`PolicyMode`], each time with a
//! fresh agent and a fresh world built from the same configuration, so the
//! learned policy can be measured against the random baseline.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    Result,
    app::{AgentConfig, build_agent},
    pipeline::trials::{RunSummary, TrialConfig, TrialPipeline},
    q_learning::PolicyMode,
    world::{World, WorldConfig},
};

/// Outcome of one policy's run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyResult {
    pub policy: PolicyMode,
    pub summary: RunSummary,
}

/// Run every policy in [`PolicyMode::ALL`] under identical settings.
pub fn compare_policies(
    agent_config: &AgentConfig,
    world_config: &WorldConfig,
    trial_config: &TrialConfig,
) -> Result<Vec<PolicyResult>> {
    world_config.validate()?;

    PolicyMode::ALL
        .iter()
        .map(|&policy| {
            let mut agent = build_agent(&agent_config.clone().with_policy(policy))?;
            let mut world = World::new(world_config.clone())?;
            let summary = TrialPipeline::new(trial_config.clone()).run(&mut agent, &mut world)?;
            info!(
                %policy,
                success_rate = summary.success_rate,
                mean_net_reward = summary.mean_net_reward,
                "policy evaluated"
            );
            Ok(PolicyResult { policy, summary })
        })
        .collect()
}

/// Result for `policy`, if it was part of the comparison.
pub fn result_for(results: &[PolicyResult], policy: PolicyMode) -> Option<&PolicyResult> {
    results.iter().find(|r| r.policy == policy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_runs_each_policy() {
        let results = compare_policies(
            &AgentConfig::default().with_seed(3),
            &WorldConfig::default().with_seed(3),
            &TrialConfig {
                num_trials: 3,
                seed: Some(3),
            },
        )
        .unwrap();

        assert_eq!(results.len(), PolicyMode::ALL.len());
        for result in &results {
            assert_eq!(result.summary.trials, 3);
            assert!(result.summary.states_seen > 0);
        }
        assert!(result_for(&results, PolicyMode::Random).is_some());
    }

    #[test]
    fn test_invalid_world_is_rejected() {
        let world = WorldConfig {
            width: 1,
            ..WorldConfig::default()
        };
        assert!(compare_policies(&AgentConfig::default(), &world, &TrialConfig::default()).is_err());
    }
}
