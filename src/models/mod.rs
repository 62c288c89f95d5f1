//! Core data models for match statistics.

mod history;
mod match_stats;
mod stats;

pub use history::*;
pub use match_stats::*;
pub use stats::*;
