//! Trial run pipeline
//!
//! This module provides:
//! - The trial loop driving one agent through the world
//! - Observers recording progress, metrics, CSV stats and JSONL steps
//! - Side-by-side comparison of action-selection policies

pub mod comparison;
pub mod observers;
pub mod trials;

pub use comparison::{PolicyResult, compare_policies, result_for};
pub use observers::{
    CsvObserver, JsonlObserver, MetricsObserver, MetricsSummary, Observation, ProgressObserver,
};
pub use trials::{RunSummary, TrialConfig, TrialPipeline};

pub use crate::ports::Observer;
