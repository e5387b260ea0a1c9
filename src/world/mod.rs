//! Reference grid-world traffic simulation
//!
//! A small torus of intersections with two-phase traffic lights, a handful of
//! wandering dummy cars and one primary cab driven by the learning agent
//! through the [`Environment`] port.
//!
//! One simulation tick is split in three so the trial driver can put the
//! agent in the middle:
//!
//! 1. [`World::tick`] switches lights and lets dummy cars pick their intent;
//! 2. the agent senses and acts through [`Environment`];
//! 3. [`World::advance`] moves the dummy cars and burns one tick of deadline.

pub mod planner;
pub mod traffic;

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

pub use planner::{RoutePlanner, waypoint};
pub use traffic::{TrafficLight, Vehicle};

use crate::{
    Error, Result,
    ports::Environment,
    types::{Action, Heading, Inputs, Light, Location, Pose},
};

/// Rewards handed out by the world
pub mod reward {
    /// Move that breaks right-of-way rules (the cab stays put)
    pub const VIOLATION: f64 = -1.0;
    /// Waiting at the intersection
    pub const IDLE: f64 = 0.0;
    /// Legal move along the planner's waypoint
    pub const ON_ROUTE: f64 = 2.0;
    /// Legal move elsewhere
    pub const OFF_ROUTE: f64 = -0.5;
    /// Bonus on top of the move reward for arriving
    pub const ARRIVAL: f64 = 10.0;
}

const MIN_GRID: i32 = 3;
const MIN_TRIP: i32 = 4;

// opposite corners of the smallest grid must be a full trip apart
const _: () = assert!(2 * (MIN_GRID - 1) >= MIN_TRIP);

/// Grid-world configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: i32,
    pub height: i32,
    /// Wandering cars besides the primary cab
    pub dummy_agents: usize,
    /// Deadline ticks granted per block of distance
    pub deadline_factor: i32,
    /// End a trial once the deadline reaches 0
    pub enforce_deadline: bool,
    /// Deadline at which a trial ends regardless of `enforce_deadline`
    pub hard_time_limit: i32,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 8,
            height: 6,
            dummy_agents: 3,
            deadline_factor: 5,
            enforce_deadline: false,
            hard_time_limit: -100,
            seed: None,
        }
    }
}

impl WorldConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_enforce_deadline(mut self, enforce: bool) -> Self {
        self.enforce_deadline = enforce;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.width < MIN_GRID || self.height < MIN_GRID {
            return Err(Error::GridTooSmall {
                width: self.width,
                height: self.height,
                min: MIN_GRID,
            });
        }
        if self.deadline_factor <= 0 {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "deadline_factor must be positive, got {}",
                    self.deadline_factor
                ),
            });
        }
        if self.hard_time_limit > 0 {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "hard_time_limit must not be positive, got {}",
                    self.hard_time_limit
                ),
            });
        }
        Ok(())
    }
}

/// The primary cab's trip
#[derive(Debug, Clone, Copy, PartialEq)]
struct Trip {
    pose: Pose,
    destination: Location,
    deadline: i32,
    reached: bool,
}

/// Grid world implementing [`Environment`] for one primary cab
pub struct World {
    config: WorldConfig,
    rng: StdRng,
    lights: Vec<TrafficLight>,
    dummies: Vec<Vehicle>,
    trip: Option<Trip>,
    t: u32,
}

impl World {
    pub fn new(config: WorldConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let cells = (config.width * config.height) as usize;
        let lights = (0..cells)
            .map(|_| TrafficLight::new(rng.random_bool(0.5), rng.random_range(3..=5)))
            .collect();
        Ok(Self {
            config,
            rng,
            lights,
            dummies: Vec::new(),
            trip: None,
            t: 0,
        })
    }

    /// Start a new trip: scatter the traffic, place the cab and return its
    /// destination.
    pub fn reset(&mut self) -> Location {
        self.t = 0;
        for light in &mut self.lights {
            light.reset();
        }
        self.dummies = (0..self.config.dummy_agents)
            .map(|_| Vehicle {
                pose: self.random_pose(),
                intent: Action::Idle,
            })
            .collect();

        let (start, destination) = self.random_trip();
        let deadline = manhattan(start.location, destination) * self.config.deadline_factor;
        self.trip = Some(Trip {
            pose: start,
            destination,
            deadline,
            reached: false,
        });
        destination
    }

    /// First phase of a tick: lights and dummy intents.
    pub fn tick(&mut self) {
        let t = self.t;
        for light in &mut self.lights {
            light.update(t);
        }
        for i in 0..self.dummies.len() {
            let intent = [Action::Forward, Action::Left, Action::Right]
                [self.rng.random_range(0..3)];
            self.dummies[i].intent = intent;
        }
    }

    /// Last phase of a tick: dummies move if allowed, the deadline burns down.
    pub fn advance(&mut self) {
        for i in 0..self.dummies.len() {
            let car = self.dummies[i];
            let inputs = self.inputs_at(car.pose, Some(i));
            if traffic::permitted(car.intent, &inputs) {
                self.dummies[i].pose =
                    traffic::drive(car.pose, car.intent, self.config.width, self.config.height);
            }
        }
        if let Some(trip) = self.trip.as_mut() {
            trip.deadline -= 1;
        }
        self.t += 1;
    }

    /// Whether the trip has ended: arrival, the deadline when enforced, or the
    /// hard time limit.
    pub fn is_done(&self) -> bool {
        match &self.trip {
            None => true,
            Some(trip) => {
                trip.reached
                    || (self.config.enforce_deadline && trip.deadline <= 0)
                    || trip.deadline <= self.config.hard_time_limit
            }
        }
    }

    pub fn reached_destination(&self) -> bool {
        self.trip.as_ref().is_some_and(|trip| trip.reached)
    }

    pub fn hit_time_limit(&self) -> bool {
        self.trip
            .as_ref()
            .is_some_and(|trip| !trip.reached && trip.deadline <= self.config.hard_time_limit)
    }

    pub fn destination(&self) -> Option<Location> {
        self.trip.as_ref().map(|trip| trip.destination)
    }

    /// Ticks elapsed in the current trip
    pub fn time(&self) -> u32 {
        self.t
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn dummies(&self) -> &[Vehicle] {
        &self.dummies
    }

    fn light_at(&self, location: Location, heading: Heading) -> Light {
        let index = (location.y * self.config.width + location.x) as usize;
        self.lights[index].light_for(heading)
    }

    /// What a car at `pose` senses. `skip` excludes a dummy (itself).
    fn inputs_at(&self, pose: Pose, skip: Option<usize>) -> Inputs {
        let primary = self.trip.as_ref().map(|trip| Vehicle {
            pose: trip.pose,
            intent: waypoint(trip.pose, trip.destination),
        });
        let others = self
            .dummies
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != skip)
            .map(|(_, car)| car);
        let light = self.light_at(pose.location, pose.heading);
        match (skip, primary.as_ref()) {
            (Some(_), Some(cab)) => traffic::sense(pose, light, others.chain(Some(cab))),
            _ => traffic::sense(pose, light, others),
        }
    }

    fn random_location(&mut self) -> Location {
        Location::new(
            self.rng.random_range(0..self.config.width),
            self.rng.random_range(0..self.config.height),
        )
    }

    /// Start pose and destination at least `MIN_TRIP` blocks apart.
    ///
    /// Starts are drawn from the cells that have such a destination; the
    /// corners always do on a validated grid.
    fn random_trip(&mut self) -> (Pose, Location) {
        let cells: Vec<Location> = (0..self.config.height)
            .flat_map(|y| (0..self.config.width).map(move |x| Location::new(x, y)))
            .collect();
        let starts: Vec<Location> = cells
            .iter()
            .copied()
            .filter(|&start| cells.iter().any(|&c| manhattan(start, c) >= MIN_TRIP))
            .collect();
        let start = starts[self.rng.random_range(0..starts.len())];
        let destinations: Vec<Location> = cells
            .into_iter()
            .filter(|&c| manhattan(start, c) >= MIN_TRIP)
            .collect();
        let destination = destinations[self.rng.random_range(0..destinations.len())];
        let heading = Heading::ALL[self.rng.random_range(0..Heading::ALL.len())];
        (
            Pose {
                location: start,
                heading,
            },
            destination,
        )
    }

    fn random_pose(&mut self) -> Pose {
        let location = self.random_location();
        let heading = Heading::ALL[self.rng.random_range(0..Heading::ALL.len())];
        Pose { location, heading }
    }

    fn trip(&self) -> Result<&Trip> {
        self.trip.as_ref().ok_or(Error::AgentNotPlaced)
    }
}

impl Environment for World {
    fn sense(&self) -> Result<Inputs> {
        let trip = self.trip()?;
        Ok(self.inputs_at(trip.pose, None))
    }

    fn deadline(&self) -> i32 {
        self.trip.as_ref().map_or(0, |trip| trip.deadline)
    }

    fn pose(&self) -> Result<Pose> {
        Ok(self.trip()?.pose)
    }

    fn act(&mut self, action: Action) -> Result<f64> {
        let trip = *self.trip()?;
        let inputs = self.inputs_at(trip.pose, None);

        let mut next = trip;
        let mut reward = if !traffic::permitted(action, &inputs) {
            reward::VIOLATION
        } else {
            next.pose = traffic::drive(trip.pose, action, self.config.width, self.config.height);
            if !action.is_move() {
                reward::IDLE
            } else if action == waypoint(trip.pose, trip.destination) {
                reward::ON_ROUTE
            } else {
                reward::OFF_ROUTE
            }
        };
        if next.pose.location == next.destination {
            next.reached = true;
            reward += reward::ARRIVAL;
        }
        self.trip = Some(next);
        Ok(reward)
    }
}

fn manhattan(a: Location, b: Location) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}
