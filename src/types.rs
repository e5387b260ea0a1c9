//! Core value types shared by the agent, the ports and the reference world.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A move the cab can make at an intersection.
///
/// `Idle` doubles as "none" wherever an observation is action-or-none: no
/// vehicle present, no intent, or the destination has been reached.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    #[default]
    #[serde(rename = "none")]
    Idle,
    Forward,
    Left,
    Right,
}

impl Action {
    /// Every action in canonical order. Indexes into [`crate::q_learning::ActionValues`].
    pub const ALL: [Action; 4] = [Action::Idle, Action::Forward, Action::Left, Action::Right];

    /// Position of the action in [`Action::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Action::Idle => 0,
            Action::Forward => 1,
            Action::Left => 2,
            Action::Right => 3,
        }
    }

    /// Whether the action actually moves the cab.
    pub const fn is_move(self) -> bool {
        !matches!(self, Action::Idle)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Idle => "none",
            Action::Forward => "forward",
            Action::Left => "left",
            Action::Right => "right",
        };
        f.write_str(name)
    }
}

impl FromStr for Action {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "idle" => Ok(Action::Idle),
            "forward" => Ok(Action::Forward),
            "left" => Ok(Action::Left),
            "right" => Ok(Action::Right),
            other => Err(crate::Error::InvalidConfiguration {
                message: format!("unknown action '{other}'"),
            }),
        }
    }
}

/// Traffic light as seen from the cab's heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Light {
    Green,
    Red,
}

impl Light {
    pub const fn is_green(self) -> bool {
        matches!(self, Light::Green)
    }
}

impl fmt::Display for Light {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Light::Green => f.write_str("green"),
            Light::Red => f.write_str("red"),
        }
    }
}

/// Compass heading on the grid. Screen coordinates: `y` grows southwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heading {
    North,
    East,
    South,
    West,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::North, Heading::East, Heading::South, Heading::West];

    /// Unit step `(dx, dy)` for one block of travel.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Heading::North => (0, -1),
            Heading::East => (1, 0),
            Heading::South => (0, 1),
            Heading::West => (-1, 0),
        }
    }

    pub const fn turn_left(self) -> Heading {
        match self {
            Heading::North => Heading::West,
            Heading::West => Heading::South,
            Heading::South => Heading::East,
            Heading::East => Heading::North,
        }
    }

    pub const fn turn_right(self) -> Heading {
        match self {
            Heading::North => Heading::East,
            Heading::East => Heading::South,
            Heading::South => Heading::West,
            Heading::West => Heading::North,
        }
    }

    pub const fn opposite(self) -> Heading {
        self.turn_left().turn_left()
    }

    /// North-south travel (as opposed to east-west).
    pub const fn is_vertical(self) -> bool {
        matches!(self, Heading::North | Heading::South)
    }
}

/// Intersection coordinates, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Where the cab is and which way it faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pose {
    pub location: Location,
    pub heading: Heading,
}

/// Raw sensory snapshot handed over by the environment each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Inputs {
    pub light: Light,
    pub oncoming: Action,
    pub left: Action,
    pub right: Action,
}

impl Inputs {
    /// A quiet intersection: the given light and no other traffic.
    pub const fn clear(light: Light) -> Self {
        Self {
            light,
            oncoming: Action::Idle,
            left: Action::Idle,
            right: Action::Idle,
        }
    }
}
