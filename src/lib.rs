//! Tabular Q-learning for a simulated smartcab
//!
//! This crate provides:
//! - A Q-learning driving agent with an optimistic value table, ε-greedy
//!   action selection and per-trial learning schedules
//! - Ports separating the agent from its environment, route planner and
//!   observers
//! - A reference grid world with traffic lights and dummy cars
//! - A trial pipeline with progress, CSV, JSONL and metrics observers
//! - A policy comparison against a random driver

pub mod app;
pub mod cli;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod types;
pub mod world;

pub use error::{Error, Result};
