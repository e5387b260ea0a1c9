//! Traffic lights, vehicles and right-of-way rules

use serde::{Deserialize, Serialize};

use crate::types::{Action, Heading, Inputs, Light, Location, Pose};

/// Two-phase light at one intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficLight {
    /// North-south traffic has green
    pub north_south_open: bool,
    /// Ticks between switches
    pub period: u32,
    last_switch: u32,
}

impl TrafficLight {
    pub fn new(north_south_open: bool, period: u32) -> Self {
        Self {
            north_south_open,
            period: period.max(1),
            last_switch: 0,
        }
    }

    /// Switch phase once `period` ticks have passed since the last switch.
    pub fn update(&mut self, t: u32) {
        if t.saturating_sub(self.last_switch) >= self.period {
            self.north_south_open = !self.north_south_open;
            self.last_switch = t;
        }
    }

    pub fn reset(&mut self) {
        self.last_switch = 0;
    }

    /// Light as seen by traffic travelling along `heading`.
    pub fn light_for(&self, heading: Heading) -> Light {
        if self.north_south_open == heading.is_vertical() {
            Light::Green
        } else {
            Light::Red
        }
    }
}

/// A car on the grid together with the move it intends to make next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub pose: Pose,
    pub intent: Action,
}

/// Classify the traffic around `pose` into oncoming/left/right.
///
/// Cars heading the same way are ignored. The reported value is the other
/// car's intent. An oncoming left turn, a forward or left turn from the right
/// and a forward from the left are never overwritten by a later car.
pub fn sense<'a>(
    pose: Pose,
    light: Light,
    others: impl IntoIterator<Item = &'a Vehicle>,
) -> Inputs {
    let mut inputs = Inputs::clear(light);
    for other in others {
        if other.pose.location != pose.location || other.pose.heading == pose.heading {
            continue;
        }
        if other.pose.heading == pose.heading.opposite() {
            if inputs.oncoming != Action::Left {
                inputs.oncoming = other.intent;
            }
        } else if other.pose.heading == pose.heading.turn_left() {
            // approaching from our right travels towards our left
            if !matches!(inputs.right, Action::Forward | Action::Left) {
                inputs.right = other.intent;
            }
        } else if inputs.left != Action::Forward {
            inputs.left = other.intent;
        }
    }
    inputs
}

/// Right-of-way rules for `action` given what the car senses.
pub fn permitted(action: Action, inputs: &Inputs) -> bool {
    match action {
        Action::Idle => true,
        Action::Forward => inputs.light.is_green(),
        Action::Left => {
            inputs.light.is_green() && matches!(inputs.oncoming, Action::Idle | Action::Left)
        }
        Action::Right => inputs.light.is_green() || inputs.left != Action::Forward,
    }
}

/// Pose after carrying out `action` on a `width x height` torus.
pub fn drive(pose: Pose, action: Action, width: i32, height: i32) -> Pose {
    let heading = match action {
        Action::Idle => return pose,
        Action::Forward => pose.heading,
        Action::Left => pose.heading.turn_left(),
        Action::Right => pose.heading.turn_right(),
    };
    let (dx, dy) = heading.delta();
    Pose {
        location: Location::new(
            (pose.location.x + dx).rem_euclid(width),
            (pose.location.y + dy).rem_euclid(height),
        ),
        heading,
    }
}
