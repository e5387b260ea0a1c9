//! Q-table keyed by discrete driving states

use std::{
    collections::{HashMap, hash_map::Entry},
    ops::Index,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    q_learning::{
        schedule::TrialContext,
        state::{State, StateId},
    },
    types::Action,
};

/// Value estimates for the four actions of one state, in [`Action::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionValues([f64; 4]);

impl ActionValues {
    /// Every action at the same value.
    pub const fn splat(value: f64) -> Self {
        Self([value; 4])
    }

    pub fn get(&self, action: Action) -> f64 {
        self.0[action.index()]
    }

    pub fn set(&mut self, action: Action, value: f64) {
        self.0[action.index()] = value;
    }

    pub fn max(&self) -> f64 {
        self.0.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Actions whose value equals the maximum.
    pub fn best_actions(&self) -> Vec<Action> {
        let max = self.max();
        Action::ALL
            .into_iter()
            .filter(|&action| self.get(action) == max)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Action, f64)> + '_ {
        Action::ALL.into_iter().map(|action| (action, self.get(action)))
    }
}

impl Index<Action> for ActionValues {
    type Output = f64;

    fn index(&self, action: Action) -> &f64 {
        &self.0[action.index()]
    }
}

/// Q-table mapping states to per-action value estimates
///
/// States receive ids in order of first appearance. Ids are never reused and
/// entries are never removed; the `index` map and the `states` vector always
/// describe the same bijection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueTable {
    index: HashMap<State, StateId>,
    /// States in id order
    states: Vec<State>,
    /// Values in id order
    values: Vec<ActionValues>,
    /// Optimistic value for every action of a newly seen state
    initial_q_value: f64,
}

impl ValueTable {
    pub fn new(initial_q_value: f64) -> Self {
        Self {
            index: HashMap::new(),
            states: Vec::new(),
            values: Vec::new(),
            initial_q_value,
        }
    }

    pub fn initial_q_value(&self) -> f64 {
        self.initial_q_value
    }

    pub fn lookup_id(&self, state: &State) -> Option<StateId> {
        self.index.get(state).copied()
    }

    /// Register a state with every action at the optimistic value.
    ///
    /// Creating a state that is already known returns its existing id and
    /// leaves its values as they are.
    pub fn create(&mut self, state: State) -> StateId {
        match self.index.entry(state) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let id = StateId::new(self.states.len());
                entry.insert(id);
                self.states.push(state);
                self.values.push(ActionValues::splat(self.initial_q_value));
                debug!(state_id = id.value(), %state, "new state");
                id
            }
        }
    }

    pub fn values(&self, state: &State) -> Option<&ActionValues> {
        self.lookup_id(state).map(|id| &self.values[id.value()])
    }

    pub fn values_by_id(&self, id: StateId) -> Option<&ActionValues> {
        self.values.get(id.value())
    }

    /// Value of one action, or `None` for an unseen state.
    pub fn value(&self, state: &State, action: Action) -> Option<f64> {
        self.values(state).map(|values| values.get(action))
    }

    /// Best achievable value from `state`; unseen states count as maximally
    /// promising.
    pub fn best_value(&self, state: &State) -> f64 {
        self.values(state)
            .map(ActionValues::max)
            .unwrap_or(self.initial_q_value)
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// An unseen `state` has no estimate to blend with, so it is created and
    /// its `action` entry is set to `reward` directly.
    pub fn apply_update(
        &mut self,
        state: State,
        action: Action,
        reward: f64,
        next_state: &State,
        context: &TrialContext,
    ) {
        match self.lookup_id(&state) {
            Some(id) => {
                let max_next_q = self.best_value(next_state);
                let entry = &mut self.values[id.value()];
                let current_q = entry.get(action);
                let td_target = reward + context.gamma * max_next_q;
                let td_error = td_target - current_q;
                entry.set(action, current_q + context.alpha * td_error);
            }
            None => {
                let id = self.create(state);
                self.values[id.value()].set(action, reward);
            }
        }
    }

    /// Seen states in id order.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// `(id, state, values)` triples in id order.
    pub fn entries(&self) -> impl Iterator<Item = (StateId, &State, &ActionValues)> {
        self.states
            .iter()
            .zip(&self.values)
            .enumerate()
            .map(|(i, (state, values))| (StateId::new(i), state, values))
    }

    /// Number of distinct states seen
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
