//! CLI infrastructure for the smartcab trainer
//!
//! This module provides the command-line interface for training the agent
//! and comparing it against the random baseline.

pub mod commands;
pub mod config;
pub mod output;

pub use config::RunConfig;
