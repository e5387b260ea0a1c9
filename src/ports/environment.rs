//! Environment and planner ports - what the agent senses and where it heads

use crate::{
    Result,
    types::{Action, Inputs, Location, Pose},
};

/// Environment trait - the traffic world as seen by its primary agent
///
/// # Design Philosophy
///
/// This trait represents a **port** in hexagonal architecture. The agent owns
/// no knowledge of traffic rules, rewards or deadlines; those belong to
/// whichever adapter implements this trait.
///
/// # Examples
///
/// ```no_run
/// use smartcab::{
///     ports::Environment,
///     types::{Action, Inputs, Light, Location, Heading, Pose},
/// };
///
/// struct EmptyRoad;
///
/// impl Environment for EmptyRoad {
///     fn sense(&self) -> smartcab::Result<Inputs> {
///         Ok(Inputs::clear(Light::Green))
///     }
///     fn deadline(&self) -> i32 {
///         10
///     }
///     fn pose(&self) -> smartcab::Result<Pose> {
///         Ok(Pose { location: Location::new(0, 0), heading: Heading::East })
///     }
///     fn act(&mut self, action: Action) -> smartcab::Result<f64> {
///         Ok(if action == Action::Forward { 2.0 } else { 0.0 })
///     }
/// }
/// ```
pub trait Environment: Send {
    /// Sense the agent's intersection.
    ///
    /// # Errors
    ///
    /// Returns an error when the agent is not in the world; that is a
    /// contract violation by the caller, not something the agent recovers
    /// from.
    fn sense(&self) -> Result<Inputs>;

    /// Ticks left before the deadline. Negative once it has passed.
    fn deadline(&self) -> i32;

    /// Current location and heading of the agent.
    fn pose(&self) -> Result<Pose>;

    /// Carry out `action` and return the reward it earned.
    fn act(&mut self, action: Action) -> Result<f64>;
}

/// Planner trait - supplies the next-waypoint hint
pub trait Planner: Send {
    /// Set the destination for the upcoming trial.
    fn route_to(&mut self, destination: Location);

    /// Suggested move from `pose`; [`Action::Idle`] once the destination is
    /// reached.
    fn next_waypoint(&mut self, pose: Pose) -> Action;
}

impl<P: Planner + ?Sized> Planner for Box<P> {
    fn route_to(&mut self, destination: Location) {
        (**self).route_to(destination);
    }

    fn next_waypoint(&mut self, pose: Pose) -> Action {
        (**self).next_waypoint(pose)
    }
}
