//! Route handlers, grouped by resource.

pub mod health;
pub mod player;
pub mod tracker;
