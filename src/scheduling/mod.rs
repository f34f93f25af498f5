//! Scheduling logic for the shift engine.
//!
//! This module contains the pure computations: shift duration with
//! overnight/24h detection, the `HH:MM` / `YYYY-MM-DD` parse boundary,
//! and the deterministic cartesian schedule generator.

mod duration;
mod generator;

pub use duration::{ShiftDuration, compute_duration, parse_date, parse_hhmm};
pub use generator::{GenerationPlan, generate_schedule};
