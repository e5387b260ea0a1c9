//! Common test utilities for the smartcab test suite.
//!
//! A scripted environment that replays fixed sensor readings and rewards, and
//! a planner that always suggests the same move.

#![allow(dead_code)]

use smartcab::{
    Result,
    ports::{Environment, Planner},
    types::{Action, Heading, Inputs, Light, Location, Pose},
};

/// One scripted tick: what the cab senses and what its move earns.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub inputs: Inputs,
    pub reward: f64,
}

impl Frame {
    pub fn new(light: Light, reward: f64) -> Self {
        Self {
            inputs: Inputs::clear(light),
            reward,
        }
    }
}

/// Environment replaying `frames` in order, repeating the last one.
pub struct ScriptedRoad {
    frames: Vec<Frame>,
    cursor: usize,
    pub deadline: i32,
    pub actions: Vec<Action>,
}

impl ScriptedRoad {
    pub fn new(frames: Vec<Frame>, deadline: i32) -> Self {
        assert!(!frames.is_empty(), "script needs at least one frame");
        Self {
            frames,
            cursor: 0,
            deadline,
            actions: Vec::new(),
        }
    }

    fn frame(&self) -> Frame {
        self.frames[self.cursor.min(self.frames.len() - 1)]
    }
}

impl Environment for ScriptedRoad {
    fn sense(&self) -> Result<Inputs> {
        Ok(self.frame().inputs)
    }

    fn deadline(&self) -> i32 {
        self.deadline
    }

    fn pose(&self) -> Result<Pose> {
        Ok(Pose {
            location: Location::new(0, 0),
            heading: Heading::North,
        })
    }

    fn act(&mut self, action: Action) -> Result<f64> {
        let reward = self.frame().reward;
        self.actions.push(action);
        self.cursor += 1;
        self.deadline -= 1;
        Ok(reward)
    }
}

/// Planner that always suggests `waypoint`.
pub struct FixedPlanner(pub Action);

impl Planner for FixedPlanner {
    fn route_to(&mut self, _destination: Location) {}

    fn next_waypoint(&mut self, _pose: Pose) -> Action {
        self.0
    }
}
