//! # FACEIT Stats
//!
//! CS2 match statistics served over HTTP, computed from the FACEIT Data API.
//!
//! ## Architecture
//!
//! - **models**: Wire records, normalized match stats, and derived results
//! - **fetch**: The `StatSource` seam, the FACEIT HTTP client, and a mock
//! - **calculate**: Rounding, window averages, win rate, and goal pace
//! - **engine**: Window aggregation, last-match extraction, and history scans
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod engine;
pub mod fetch;
pub mod models;
