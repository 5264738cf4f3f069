//! cascade-engine - move enumeration, routing, and replay.
//!
//! Turns an incoming piece into the set of reachable landings and the
//! primitive-action routes that reach them.

pub mod movegen;
pub mod replay;
pub mod route;

pub use movegen::{find_moves, Candidate};
pub use replay::{replay_pose, replay_route, replay_script, verify_route, ReplayError};
pub use route::{route, route_naive};
