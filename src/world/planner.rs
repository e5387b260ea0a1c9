//! Route planner: next-waypoint hints towards the destination

use crate::{
    ports::Planner,
    types::{Action, Location, Pose},
};

/// Suggested move from `pose` towards `destination`.
///
/// Closes the east-west gap first, then the north-south gap. A destination
/// straight behind the cab is approached by turning right.
pub fn waypoint(pose: Pose, destination: Location) -> Action {
    let dx = destination.x - pose.location.x;
    let dy = destination.y - pose.location.y;
    let (hx, hy) = pose.heading.delta();

    if dx == 0 && dy == 0 {
        Action::Idle
    } else if dx != 0 {
        if dx * hx > 0 {
            Action::Forward
        } else if dx * hx < 0 {
            Action::Right
        } else if dx * hy > 0 {
            Action::Left
        } else {
            Action::Right
        }
    } else if dy * hy > 0 {
        Action::Forward
    } else if dy * hy < 0 {
        Action::Right
    } else if dy * hx > 0 {
        Action::Right
    } else {
        Action::Left
    }
}

/// Planner that steers by [`waypoint`] towards the current destination.
#[derive(Debug, Clone, Default)]
pub struct RoutePlanner {
    destination: Option<Location>,
}

impl RoutePlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn destination(&self) -> Option<Location> {
        self.destination
    }
}

impl Planner for RoutePlanner {
    fn route_to(&mut self, destination: Location) {
        self.destination = Some(destination);
    }

    fn next_waypoint(&mut self, pose: Pose) -> Action {
        self.destination
            .map_or(Action::Idle, |destination| waypoint(pose, destination))
    }
}
