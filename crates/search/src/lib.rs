//! Cascade search crate - the layered beam planner.
//!
//! One layer per piece: the frontier is expanded in parallel through the
//! engine's enumerator, deduplicated by bricks, and re-selected under two
//! objectives with diversity quotas. The best state's ancestry becomes the
//! final action script.

mod collector;
mod config;
mod select;
mod solver;
mod state;

pub use config::SearchConfig;
pub use solver::{solve, Solution};
pub use state::{State, StatePtr};
