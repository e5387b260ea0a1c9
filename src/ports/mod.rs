//! Ports (trait boundaries) for the agent's collaborators.
//!
//! The learning agent only ever talks to the world through these traits. The
//! reference grid world in [`crate::world`] implements them, and tests plug in
//! scripted doubles.

pub mod environment;
pub mod observer;

pub use environment::{Environment, Planner};
pub use observer::Observer;
