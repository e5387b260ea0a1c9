//! Discrete state descriptor built from one tick of sensing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Action, Inputs, Light};

/// Canonical state seen by the agent.
///
/// Two states are equal iff every field is equal; there is no identity beyond
/// content, so the type doubles as the key of the value table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct State {
    pub light: Light,
    pub oncoming: Action,
    pub left: Action,
    pub right: Action,
    pub waypoint: Action,
}

impl State {
    /// Encode the sensed inputs and the planner's waypoint hint.
    pub const fn encode(inputs: Inputs, waypoint: Action) -> Self {
        Self {
            light: inputs.light,
            oncoming: inputs.oncoming,
            left: inputs.left,
            right: inputs.right,
            waypoint,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(lights={}, oncoming={}, left={}, right={}, waypoint={})",
            self.light, self.oncoming, self.left, self.right, self.waypoint
        )
    }
}

/// Stable handle assigned to a state the first time it is seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId(usize);

impl StateId {
    pub(crate) const fn new(value: usize) -> Self {
        Self(value)
    }

    pub const fn value(self) -> usize {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
