//! Action selection over the value table

use std::{fmt, str::FromStr};

use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{Error, q_learning::q_table::ValueTable, q_learning::state::State, types::Action};

/// How the agent picks its moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyMode {
    /// ε-greedy over learned values
    #[default]
    QLearning,
    /// Uniformly random moves, ignoring the table (benchmark baseline)
    Random,
}

impl PolicyMode {
    pub const ALL: [PolicyMode; 2] = [PolicyMode::QLearning, PolicyMode::Random];
    pub const VARIANTS: &'static str = "q, q-learning, random";
}

impl fmt::Display for PolicyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyMode::QLearning => f.write_str("q-learning"),
            PolicyMode::Random => f.write_str("random"),
        }
    }
}

impl FromStr for PolicyMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "q" | "q-learning" | "q_learning" | "qlearning" => Ok(PolicyMode::QLearning),
            "random" => Ok(PolicyMode::Random),
            other => Err(Error::ParsePolicy {
                input: other.to_string(),
                expected: Self::VARIANTS.to_string(),
            }),
        }
    }
}

/// ε-greedy action selection with optimistic defaults.
///
/// Explores uniformly over every action when the state is unseen, when the
/// mode is [`PolicyMode::Random`] or when a uniform draw falls below
/// `epsilon`. Otherwise picks uniformly among the actions tied for the
/// highest value, so equal estimates never bias towards the first action.
pub fn choose_action<R: Rng + ?Sized>(
    table: &ValueTable,
    state: &State,
    epsilon: f64,
    mode: PolicyMode,
    rng: &mut R,
) -> Action {
    let greedy = match (mode, table.values(state)) {
        (PolicyMode::QLearning, Some(values)) if rng.random::<f64>() >= epsilon => {
            Some(values.best_actions())
        }
        _ => None,
    };

    match greedy {
        Some(best) => best.choose(rng).copied().unwrap_or_default(),
        None => random_action(rng),
    }
}

/// Uniform pick over all four actions.
pub fn random_action<R: Rng + ?Sized>(rng: &mut R) -> Action {
    Action::ALL[rng.random_range(0..Action::ALL.len())]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{
        q_learning::schedule::TrialContext,
        types::{Inputs, Light},
    };

    fn state() -> State {
        State::encode(Inputs::clear(Light::Green), Action::Forward)
    }

    fn table_preferring(action: Action) -> ValueTable {
        // one update with a big reward lifts `action` above the rest
        let mut table = ValueTable::new(0.0);
        table.create(state());
        let ctx = TrialContext {
            trial_index: 0,
            alpha: 1.0,
            gamma: 0.0,
            epsilon: 0.0,
        };
        table.apply_update(state(), action, 5.0, &state(), &ctx);
        table
    }

    #[test]
    fn test_greedy_is_deterministic_without_exploration() {
        let table = table_preferring(Action::Left);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let action = choose_action(&table, &state(), 0.0, PolicyMode::QLearning, &mut rng);
            assert_eq!(action, Action::Left);
        }
    }

    #[test]
    fn test_unseen_state_explores_every_action() {
        let table = ValueTable::new(3.0);
        let mut rng = StdRng::seed_from_u64(11);
        let seen: HashSet<Action> = (0..400)
            .map(|_| choose_action(&table, &state(), 0.0, PolicyMode::QLearning, &mut rng))
            .collect();
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_ties_are_broken_uniformly() {
        let mut table = ValueTable::new(3.0);
        table.create(state());
        let mut rng = StdRng::seed_from_u64(5);
        let mut counts = [0usize; 4];
        for _ in 0..4000 {
            let action = choose_action(&table, &state(), 0.0, PolicyMode::QLearning, &mut rng);
            counts[action.index()] += 1;
        }
        for count in counts {
            assert!(count > 800, "skewed tie breaking: {counts:?}");
        }
    }

    #[test]
    fn test_random_mode_ignores_values() {
        let table = table_preferring(Action::Right);
        let mut rng = StdRng::seed_from_u64(9);
        let seen: HashSet<Action> = (0..400)
            .map(|_| choose_action(&table, &state(), 0.0, PolicyMode::Random, &mut rng))
            .collect();
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_full_exploration_ignores_values() {
        let table = table_preferring(Action::Right);
        let mut rng = StdRng::seed_from_u64(13);
        let seen: HashSet<Action> = (0..400)
            .map(|_| choose_action(&table, &state(), 1.0, PolicyMode::QLearning, &mut rng))
            .collect();
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_seeded_choice_is_reproducible() {
        let table = ValueTable::new(3.0);
        let pick = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            choose_action(&table, &state(), 0.2, PolicyMode::QLearning, &mut rng)
        };
        assert_eq!(pick(42), pick(42));
    }

    #[test]
    fn test_parse_policy_mode() {
        assert_eq!("q".parse::<PolicyMode>().unwrap(), PolicyMode::QLearning);
        assert_eq!("Random".parse::<PolicyMode>().unwrap(), PolicyMode::Random);
        assert!(matches!(
            "greedy".parse::<PolicyMode>(),
            Err(Error::ParsePolicy { .. })
        ));
    }
}
